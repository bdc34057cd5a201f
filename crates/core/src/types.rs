use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Properties map forwarded to the reporting channel alongside the event name.
pub type EventProperties = Map<String, Value>;

/// Enumerated category of trackable user action. Each kind maps to exactly
/// one event name and one event category on the analytics backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    PosologyView,
    RepContact,
    Conversion,
    Download,
    ScrollDepth,
    Share,
    QrAccess,
    CourseClick,
    EvidenceEngagement,
    SectionView,
    TimeOnPage,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 11] = [
        InteractionKind::PosologyView,
        InteractionKind::RepContact,
        InteractionKind::Conversion,
        InteractionKind::Download,
        InteractionKind::ScrollDepth,
        InteractionKind::Share,
        InteractionKind::QrAccess,
        InteractionKind::CourseClick,
        InteractionKind::EvidenceEngagement,
        InteractionKind::SectionView,
        InteractionKind::TimeOnPage,
    ];

    /// Event name as the analytics backend expects it.
    pub fn event_name(self) -> &'static str {
        match self {
            InteractionKind::PosologyView => "posology_view",
            InteractionKind::RepContact => "rep_contact",
            InteractionKind::Conversion => "generate_lead",
            InteractionKind::Download => "file_download",
            InteractionKind::ScrollDepth => "scroll_depth",
            InteractionKind::Share => "share",
            InteractionKind::QrAccess => "qr_code_access",
            InteractionKind::CourseClick => "course_click",
            InteractionKind::EvidenceEngagement => "evidence_engagement",
            InteractionKind::SectionView => "section_view",
            InteractionKind::TimeOnPage => "time_on_page",
        }
    }

    /// Value of the `event_category` key.
    pub fn category(self) -> &'static str {
        match self {
            InteractionKind::PosologyView => "Medical Content",
            InteractionKind::RepContact => "Lead Generation",
            InteractionKind::Conversion => "Conversion",
            InteractionKind::Download => "Content Download",
            InteractionKind::ScrollDepth | InteractionKind::TimeOnPage => "Engagement",
            InteractionKind::Share => "Social",
            InteractionKind::QrAccess => "Brand Engagement",
            InteractionKind::CourseClick => "Education",
            InteractionKind::EvidenceEngagement => "Scientific Content",
            InteractionKind::SectionView => "Content Engagement",
        }
    }
}

/// A "talk to a representative" request submitted from the landing page.
/// Empty strings count as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub specialty: String,
    /// Medical council registration number.
    #[serde(default)]
    pub crm: String,
    #[serde(default)]
    pub clinic: String,
    pub question: String,
}

impl ContactRequest {
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    pub fn has_specialty(&self) -> bool {
        !self.specialty.is_empty()
    }

    pub fn has_crm(&self) -> bool {
        !self.crm.is_empty()
    }

    pub fn has_clinic(&self) -> bool {
        !self.clinic.is_empty()
    }

    /// Question length in UTF-16 code units, the unit the browser form
    /// reports. Characters outside the BMP (emoji) count as two.
    pub fn question_length(&self) -> usize {
        self.question.encode_utf16().count()
    }
}

/// Fixed-shape analytics record: category, label, optional numeric value,
/// plus kind-specific extra fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub kind: InteractionKind,
    pub label: String,
    pub value: Option<u64>,
    pub extra: EventProperties,
}

impl EventRecord {
    pub fn new(kind: InteractionKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            value: None,
            extra: Map::new(),
        }
    }

    pub fn with_value(mut self, value: u64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    pub fn event_name(&self) -> &'static str {
        self.kind.event_name()
    }

    /// Flatten into the properties map sent to the reporting channel.
    /// `value` is omitted for kinds that carry none (section views).
    pub fn into_properties(self) -> EventProperties {
        let mut props = Map::new();
        props.insert(
            "event_category".to_string(),
            Value::from(self.kind.category()),
        );
        props.insert("event_label".to_string(), Value::from(self.label));
        if let Some(value) = self.value {
            props.insert("value".to_string(), Value::from(value));
        }
        for (key, value) in self.extra {
            props.insert(key, value);
        }
        props
    }
}
