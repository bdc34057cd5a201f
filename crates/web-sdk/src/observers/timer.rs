//! Page timer: measures how long a page stayed mounted and reports
//! `time_on_page` once, when it unmounts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::clock::{elapsed_secs, Clock};
use crate::tracker::BrandAnalytics;

pub struct PageTimer {
    analytics: BrandAnalytics,
    clock: Arc<dyn Clock>,
    page_name: String,
    started_at: Option<DateTime<Utc>>,
}

impl PageTimer {
    pub fn start(
        analytics: &BrandAnalytics,
        clock: Arc<dyn Clock>,
        page_name: impl Into<String>,
    ) -> Self {
        let started_at = clock.now();
        Self {
            analytics: analytics.clone(),
            clock,
            page_name: page_name.into(),
            started_at: Some(started_at),
        }
    }

    pub fn page_name(&self) -> &str {
        &self.page_name
    }

    /// Seconds since start, rounded. Zero once stopped.
    pub fn elapsed_secs(&self) -> u64 {
        self.started_at
            .map(|start| elapsed_secs(start, self.clock.now()))
            .unwrap_or(0)
    }

    /// Unmount now. Returns the elapsed seconds whether or not they were
    /// long enough to be reported.
    pub fn stop(mut self) -> u64 {
        self.finish().unwrap_or(0)
    }

    fn finish(&mut self) -> Option<u64> {
        let start = self.started_at.take()?;
        let seconds = elapsed_secs(start, self.clock.now());
        debug!(page_name = %self.page_name, seconds, "page timer stopped");
        self.analytics.track_time_on_page(&self.page_name, seconds);
        Some(seconds)
    }
}

impl Drop for PageTimer {
    fn drop(&mut self) {
        self.finish();
    }
}
