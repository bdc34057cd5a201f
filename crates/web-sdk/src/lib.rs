//! Landing-page interaction tracking: lead scoring, the analytics
//! dispatcher, lifecycle observers, and adaptors for the outbound payload
//! format.
//!
//! # Modules
//!
//! - [`scoring`]: Lead-quality score for contact requests
//! - [`events`]: Fixed-shape event records, one builder per interaction kind
//! - [`tracker`]: Dispatcher guarding on the reporting channel
//! - [`observers`]: Section visibility watch and page timer
//! - [`clock`]: Injectable time source for the page timer
//! - [`adaptors`]: `dataLayer` and GA4 Measurement Protocol reporters

pub mod adaptors;
pub mod clock;
pub mod events;
pub mod observers;
pub mod scoring;
pub mod tracker;

pub use adaptors::data_layer::DataLayerAdaptor;
pub use adaptors::ga::GaAdaptor;
pub use adaptors::{BufferedReporter, DataLayerReporter, GaReporter, PayloadAdaptor};
pub use clock::{Clock, ManualClock, SystemClock};
pub use observers::{
    IntersectionEntry, ObservationId, PageTimer, SectionWatch, StaticViewport, ViewportHost,
};
pub use scoring::lead_score;
pub use tracker::BrandAnalytics;
