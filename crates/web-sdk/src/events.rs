//! Event schema: builds the fixed-shape record for each interaction kind.
//!
//! Builders are pure: they do not check thresholds or channel availability.
//! That is the dispatcher's job.

use brand_core::{ContactRequest, EventRecord, InteractionKind};

use crate::scoring::lead_score;

/// Scroll depths that are reported. Anything else is ignored.
pub const SCROLL_CHECKPOINTS: [u32; 4] = [25, 50, 75, 100];

/// Scroll depths below this are sent as non-interaction hits.
const INTERACTIVE_SCROLL_DEPTH: u32 = 75;

pub const DEFAULT_FILE_TYPE: &str = "PDF";
pub const DEFAULT_SHARE_METHOD: &str = "unknown";

const POSOLOGY_LABEL: &str = "Dosage Information";
const SPECIALTY_NOT_PROVIDED: &str = "specialty_not_provided";
const QR_ACCESS_LABEL: &str = "Doctor accessed via QR Code - Sucrafilm";

// Fixed engagement weights for kinds that carry no measured value.
const DOWNLOAD_VALUE: u64 = 3;
const SHARE_VALUE: u64 = 5;
const QR_ACCESS_VALUE: u64 = 2;
const COURSE_CLICK_VALUE: u64 = 4;

pub fn is_scroll_checkpoint(percentage: u32) -> bool {
    SCROLL_CHECKPOINTS.contains(&percentage)
}

pub fn posology_view(time_spent: u64) -> EventRecord {
    EventRecord::new(InteractionKind::PosologyView, POSOLOGY_LABEL)
        .with_value(time_spent)
        .with_field("time_spent", time_spent)
}

/// Build the `rep_contact` record and the generic `generate_lead`
/// conversion record. Both carry the same lead score.
pub fn rep_contact(contact: &ContactRequest, conversion_label: &str) -> (EventRecord, EventRecord) {
    let score = u64::from(lead_score(contact));
    let label = if contact.has_specialty() {
        contact.specialty.as_str()
    } else {
        SPECIALTY_NOT_PROVIDED
    };

    let specific = EventRecord::new(InteractionKind::RepContact, label)
        .with_value(score)
        .with_field("has_name", contact.has_name())
        .with_field("has_specialty", contact.has_specialty())
        .with_field("has_crm", contact.has_crm())
        .with_field("has_clinic", contact.has_clinic())
        .with_field("question_length", contact.question_length() as u64)
        .with_field("lead_score", score);

    let conversion = EventRecord::new(InteractionKind::Conversion, conversion_label).with_value(score);

    (specific, conversion)
}

pub fn download(file_name: &str, file_type: Option<&str>) -> EventRecord {
    EventRecord::new(InteractionKind::Download, file_name)
        .with_field("file_type", file_type.unwrap_or(DEFAULT_FILE_TYPE))
        .with_value(DOWNLOAD_VALUE)
}

/// `None` when `percentage` is not one of [`SCROLL_CHECKPOINTS`].
pub fn scroll_depth(percentage: u32) -> Option<EventRecord> {
    if !is_scroll_checkpoint(percentage) {
        return None;
    }
    Some(
        EventRecord::new(InteractionKind::ScrollDepth, format!("{percentage}%"))
            .with_value(u64::from(percentage))
            .with_field("non_interaction", percentage < INTERACTIVE_SCROLL_DEPTH),
    )
}

pub fn share(method: Option<&str>) -> EventRecord {
    EventRecord::new(InteractionKind::Share, method.unwrap_or(DEFAULT_SHARE_METHOD))
        .with_value(SHARE_VALUE)
}

pub fn qr_access() -> EventRecord {
    EventRecord::new(InteractionKind::QrAccess, QR_ACCESS_LABEL).with_value(QR_ACCESS_VALUE)
}

pub fn course_click(course_name: &str) -> EventRecord {
    EventRecord::new(InteractionKind::CourseClick, course_name).with_value(COURSE_CLICK_VALUE)
}

pub fn evidence_engagement(section_name: &str, time_spent: u64) -> EventRecord {
    EventRecord::new(InteractionKind::EvidenceEngagement, section_name)
        .with_value(time_spent)
        .with_field("time_spent", time_spent)
}

pub fn section_view(section_name: &str) -> EventRecord {
    EventRecord::new(InteractionKind::SectionView, section_name).with_field("non_interaction", true)
}

pub fn time_on_page(page_name: &str, seconds: u64) -> EventRecord {
    EventRecord::new(InteractionKind::TimeOnPage, page_name).with_value(seconds)
}
