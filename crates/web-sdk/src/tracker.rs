//! Analytics dispatcher: one tracking call per interaction kind.
//!
//! Every call checks the reporting channel first. A missing channel (tag
//! script blocked, server-side render, tracking disabled) turns the call
//! into a no-op; nothing here returns an error or panics.

use std::sync::Arc;

use brand_core::reporter::Reporter;
use brand_core::{AnalyticsConfig, ContactRequest, EventRecord};
use tracing::{debug, info};

use crate::events;

/// Tracks landing-page interactions and forwards them to the reporting
/// channel. Cheap to clone; clones share the same channel.
#[derive(Clone)]
pub struct BrandAnalytics {
    channel: Option<Arc<dyn Reporter>>,
    config: Arc<AnalyticsConfig>,
}

impl BrandAnalytics {
    pub fn new(channel: Option<Arc<dyn Reporter>>, config: AnalyticsConfig) -> Self {
        Self {
            channel,
            config: Arc::new(config),
        }
    }

    /// Dispatcher with default configuration reporting to `reporter`.
    pub fn with_reporter(reporter: Arc<dyn Reporter>) -> Self {
        Self::new(Some(reporter), AnalyticsConfig::default())
    }

    /// Dispatcher with no reporting channel. Every call is a no-op.
    pub fn detached() -> Self {
        Self::new(None, AnalyticsConfig::default())
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Whether calls currently reach a reporting channel.
    pub fn is_active(&self) -> bool {
        self.config.enabled && self.channel.is_some()
    }

    fn channel(&self) -> Option<&Arc<dyn Reporter>> {
        if !self.config.enabled {
            return None;
        }
        self.channel.as_ref()
    }

    fn forward(&self, reporter: &Arc<dyn Reporter>, record: EventRecord) {
        let event_name = record.event_name();
        reporter.report(event_name, record.into_properties());
        metrics::counter!("brand_analytics.events_forwarded", "event" => event_name).increment(1);
    }

    fn skipped(&self, event_name: &'static str) {
        metrics::counter!("brand_analytics.events_skipped", "event" => event_name).increment(1);
        debug!(event_name, "reporting channel unavailable, event dropped");
    }

    /// Doctor opened the dosage section and stayed `time_spent` seconds.
    pub fn track_posology_view(&self, time_spent: u64) {
        let record = events::posology_view(time_spent);
        let Some(reporter) = self.channel() else {
            return self.skipped(record.event_name());
        };
        self.forward(reporter, record);
        info!(time_spent, "posology section viewed");
    }

    /// A contact request is a hot lead: emits `rep_contact` followed by the
    /// generic `generate_lead` conversion, both carrying the lead score.
    pub fn track_rep_contact(&self, contact: &ContactRequest) {
        let (specific, conversion) = events::rep_contact(contact, &self.config.conversion_label);
        let Some(reporter) = self.channel() else {
            self.skipped(specific.event_name());
            return self.skipped(conversion.event_name());
        };
        let lead_score = specific.value.unwrap_or_default();
        self.forward(reporter, specific);
        self.forward(reporter, conversion);
        info!(
            lead_score,
            has_crm = contact.has_crm(),
            specialty = %contact.specialty,
            "representative contact requested"
        );
    }

    pub fn track_download(&self, file_name: &str, file_type: Option<&str>) {
        let record = events::download(file_name, file_type);
        let Some(reporter) = self.channel() else {
            return self.skipped(record.event_name());
        };
        self.forward(reporter, record);
        info!(file_name, "material downloaded");
    }

    /// Only the 25/50/75/100 checkpoints are reported.
    pub fn track_scroll_depth(&self, percentage: u32) {
        let Some(record) = events::scroll_depth(percentage) else {
            return;
        };
        let Some(reporter) = self.channel() else {
            return self.skipped(record.event_name());
        };
        self.forward(reporter, record);
        info!(percentage, "scroll depth reached");
    }

    pub fn track_share(&self, method: Option<&str>) {
        let record = events::share(method);
        let Some(reporter) = self.channel() else {
            return self.skipped(record.event_name());
        };
        let method = record.label.clone();
        self.forward(reporter, record);
        info!(%method, "page shared");
    }

    pub fn track_qr_access(&self) {
        let record = events::qr_access();
        let Some(reporter) = self.channel() else {
            return self.skipped(record.event_name());
        };
        self.forward(reporter, record);
        info!("page accessed via QR code");
    }

    pub fn track_course_click(&self, course_name: &str) {
        let record = events::course_click(course_name);
        let Some(reporter) = self.channel() else {
            return self.skipped(record.event_name());
        };
        self.forward(reporter, record);
        info!(course_name, "course clicked");
    }

    /// Reported only when `time_spent` exceeds the configured minimum.
    pub fn track_evidence_engagement(&self, section_name: &str, time_spent: u64) {
        if time_spent <= self.config.min_evidence_secs {
            return;
        }
        let record = events::evidence_engagement(section_name, time_spent);
        let Some(reporter) = self.channel() else {
            return self.skipped(record.event_name());
        };
        self.forward(reporter, record);
        info!(section_name, time_spent, "scientific evidence engaged");
    }

    /// Emitted by [`SectionWatch`](crate::observers::SectionWatch) on first
    /// sight of a section.
    pub fn track_section_view(&self, section_name: &str) {
        let record = events::section_view(section_name);
        let Some(reporter) = self.channel() else {
            return self.skipped(record.event_name());
        };
        self.forward(reporter, record);
        info!(section_name, "section viewed");
    }

    /// Emitted by [`PageTimer`](crate::observers::PageTimer) at unmount.
    /// Reported only when `seconds` exceeds the configured minimum.
    pub fn track_time_on_page(&self, page_name: &str, seconds: u64) {
        if seconds <= self.config.min_time_on_page_secs {
            return;
        }
        let record = events::time_on_page(page_name, seconds);
        let Some(reporter) = self.channel() else {
            return self.skipped(record.event_name());
        };
        self.forward(reporter, record);
        info!(page_name, seconds, "time on page recorded");
    }
}
