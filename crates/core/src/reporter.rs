//! Reporting channel: the capability the tracking layer forwards events to.
//!
//! In a browser this is the page's `gtag` function. Modules accept an
//! `Option<Arc<dyn Reporter>>`; `None` models a page where the tag script
//! never loaded, and every tracking call becomes a no-op.

use crate::types::EventProperties;
use std::sync::{Arc, Mutex};

/// Fire-and-forget sink for analytics events. Implementations must not
/// block and have no way to signal failure back to the caller.
pub trait Reporter: Send + Sync {
    fn report(&self, event_name: &str, properties: EventProperties);
}

/// A single call captured by [`CaptureReporter`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReportedEvent {
    pub name: String,
    pub properties: EventProperties,
}

/// Reporter that swallows everything.
pub struct NoOpReporter;

impl Reporter for NoOpReporter {
    fn report(&self, _event_name: &str, _properties: EventProperties) {}
}

/// In-memory reporter that captures events for testing.
#[derive(Default)]
pub struct CaptureReporter {
    events: Mutex<Vec<ReportedEvent>>,
}

impl CaptureReporter {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    pub fn events(&self) -> Vec<ReportedEvent> {
        self.events.lock().expect("reporter mutex poisoned").clone()
    }

    pub fn count(&self) -> usize {
        self.events.lock().expect("reporter mutex poisoned").len()
    }

    pub fn count_named(&self, event_name: &str) -> usize {
        self.events
            .lock()
            .expect("reporter mutex poisoned")
            .iter()
            .filter(|e| e.name == event_name)
            .count()
    }

    pub fn last(&self) -> Option<ReportedEvent> {
        self.events
            .lock()
            .expect("reporter mutex poisoned")
            .last()
            .cloned()
    }

    pub fn clear(&self) {
        self.events.lock().expect("reporter mutex poisoned").clear();
    }
}

impl Reporter for CaptureReporter {
    fn report(&self, event_name: &str, properties: EventProperties) {
        self.events
            .lock()
            .expect("reporter mutex poisoned")
            .push(ReportedEvent {
                name: event_name.to_string(),
                properties,
            });
    }
}

/// Convenience: a reporter that discards every event.
pub fn noop_reporter() -> Arc<dyn Reporter> {
    Arc::new(NoOpReporter)
}

/// Convenience: create a capture reporter for tests.
pub fn capture_reporter() -> Arc<CaptureReporter> {
    Arc::new(CaptureReporter::new())
}
