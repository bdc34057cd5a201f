//! Adaptors for the outbound wire format of reported events.
//!
//! Each adaptor implements [`PayloadAdaptor`] to turn a reported
//! `(event_name, properties)` pair into the JSON its target expects: a
//! `gtag` command pushed onto the page's `dataLayer`, or a GA4 Measurement
//! Protocol body for server-side forwarding. [`BufferedReporter`] wraps an
//! adaptor into a [`Reporter`] that queues payloads until drained.

pub mod data_layer;
pub mod ga;

use std::sync::Mutex;

use brand_core::reporter::Reporter;
use brand_core::{BrandResult, EventProperties};
use tracing::debug;

/// Transforms a reported event into a platform-specific JSON payload.
pub trait PayloadAdaptor: Send + Sync {
    /// Platform identifier (e.g. "datalayer", "ga4").
    fn platform(&self) -> &str;

    fn transform(&self, event_name: &str, properties: EventProperties) -> serde_json::Value;

    /// Validate that the adaptor configuration is correct.
    fn validate_config(&self) -> BrandResult<()>;
}

/// Reporter that transforms each event through `A` and buffers the result.
pub struct BufferedReporter<A: PayloadAdaptor> {
    adaptor: A,
    buffer: Mutex<Vec<serde_json::Value>>,
}

impl<A: PayloadAdaptor> BufferedReporter<A> {
    pub fn new(adaptor: A) -> Self {
        Self {
            adaptor,
            buffer: Mutex::new(Vec::new()),
        }
    }

    pub fn adaptor(&self) -> &A {
        &self.adaptor
    }

    /// Number of payloads waiting to be drained.
    pub fn len(&self) -> usize {
        self.buffer.lock().expect("reporter buffer poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take every buffered payload, oldest first.
    pub fn drain(&self) -> Vec<serde_json::Value> {
        let drained = std::mem::take(&mut *self.buffer.lock().expect("reporter buffer poisoned"));
        if !drained.is_empty() {
            debug!(
                platform = self.adaptor.platform(),
                count = drained.len(),
                "drained reporter buffer"
            );
        }
        drained
    }
}

impl<A: PayloadAdaptor> Reporter for BufferedReporter<A> {
    fn report(&self, event_name: &str, properties: EventProperties) {
        let payload = self.adaptor.transform(event_name, properties);
        self.buffer
            .lock()
            .expect("reporter buffer poisoned")
            .push(payload);
    }
}

pub type DataLayerReporter = BufferedReporter<data_layer::DataLayerAdaptor>;
pub type GaReporter = BufferedReporter<ga::GaAdaptor>;
