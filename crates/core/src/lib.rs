pub mod config;
pub mod error;
pub mod reporter;
pub mod types;

pub use config::AnalyticsConfig;
pub use error::{BrandError, BrandResult};
pub use reporter::{CaptureReporter, Reporter};
pub use types::{ContactRequest, EventProperties, EventRecord, InteractionKind};
