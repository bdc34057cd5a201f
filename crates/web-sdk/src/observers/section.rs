//! Section visibility tracking: reports `section_view` the first time a
//! named page section is at least half on screen.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::tracker::BrandAnalytics;

/// Opaque handle to an observable page element, as returned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId(pub String);

/// One registration with the host observer. Several watches on the same
/// element each hold their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationId(pub u64);

/// One intersection notification delivered by the host's observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub is_intersecting: bool,
    /// Visible fraction of the element, `0.0..=1.0`.
    pub intersection_ratio: f64,
}

impl IntersectionEntry {
    pub fn visible(ratio: f64) -> Self {
        Self {
            is_intersecting: ratio > 0.0,
            intersection_ratio: ratio,
        }
    }

    pub fn hidden() -> Self {
        Self {
            is_intersecting: false,
            intersection_ratio: 0.0,
        }
    }
}

/// The page the sections live on: element lookup plus an intersection
/// observer the host schedules on its own render cycle.
pub trait ViewportHost: Send + Sync {
    fn find_element(&self, id: &str) -> Option<ElementId>;

    /// Start delivering intersection entries for `element`.
    fn observe(&self, element: &ElementId, threshold: f64) -> ObservationId;

    /// Release one registration. Other registrations on the same element
    /// stay active.
    fn unobserve(&self, observation: ObservationId);
}

/// Watcher bound to one section for the lifetime of the component that
/// mounted it. Dropping the watch releases the host observer.
pub struct SectionWatch {
    analytics: BrandAnalytics,
    host: Arc<dyn ViewportHost>,
    section_name: String,
    observation: Option<ObservationId>,
    threshold: f64,
    fired: AtomicBool,
}

impl SectionWatch {
    /// Look up `section_name` and start observing it. When no such element
    /// exists the watch is inert: nothing is observed and nothing reported.
    pub fn attach(
        analytics: &BrandAnalytics,
        host: Arc<dyn ViewportHost>,
        section_name: impl Into<String>,
    ) -> Self {
        let section_name = section_name.into();
        let threshold = analytics.config().section_view_threshold;
        let observation = match host.find_element(&section_name) {
            Some(el) => Some(host.observe(&el, threshold)),
            None => {
                debug!(section_name = %section_name, "section element not found, watch inert");
                None
            }
        };

        Self {
            analytics: analytics.clone(),
            host,
            section_name,
            observation,
            threshold,
            fired: AtomicBool::new(false),
        }
    }

    pub fn section_name(&self) -> &str {
        &self.section_name
    }

    pub fn is_watching(&self) -> bool {
        self.observation.is_some()
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Host callback. Reports at most once per watch, however many times
    /// the section scrolls back into view.
    pub fn on_intersection(&self, entries: &[IntersectionEntry]) {
        if self.observation.is_none() {
            return;
        }
        let seen = entries
            .iter()
            .any(|e| e.is_intersecting && e.intersection_ratio >= self.threshold);
        if !seen || self.fired.swap(true, Ordering::AcqRel) {
            return;
        }
        self.analytics.track_section_view(&self.section_name);
    }

    /// Release the observer now instead of at drop.
    pub fn detach(self) {}
}

impl Drop for SectionWatch {
    fn drop(&mut self) {
        if let Some(observation) = self.observation.take() {
            self.host.unobserve(observation);
            debug!(section_name = %self.section_name, "section watch released");
        }
    }
}

/// Viewport with a fixed set of element ids. Counts observe/unobserve calls
/// so callers can check that every watch was released.
#[derive(Default)]
pub struct StaticViewport {
    elements: HashSet<String>,
    observing: Mutex<HashMap<ObservationId, ElementId>>,
    next_observation: AtomicU64,
    observed_total: AtomicUsize,
    released_total: AtomicUsize,
}

impl StaticViewport {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            elements: ids.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn observed_total(&self) -> usize {
        self.observed_total.load(Ordering::Relaxed)
    }

    pub fn released_total(&self) -> usize {
        self.released_total.load(Ordering::Relaxed)
    }

    /// True while at least one registration on `id` is live.
    pub fn is_observing(&self, id: &str) -> bool {
        self.observing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .any(|element| element.0 == id)
    }
}

impl ViewportHost for StaticViewport {
    fn find_element(&self, id: &str) -> Option<ElementId> {
        self.elements
            .contains(id)
            .then(|| ElementId(id.to_string()))
    }

    fn observe(&self, element: &ElementId, _threshold: f64) -> ObservationId {
        let observation = ObservationId(self.next_observation.fetch_add(1, Ordering::Relaxed));
        self.observing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(observation, element.clone());
        self.observed_total.fetch_add(1, Ordering::Relaxed);
        observation
    }

    // Runs from `SectionWatch::drop`, so a poisoned lock must not panic.
    fn unobserve(&self, observation: ObservationId) {
        let removed = self
            .observing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&observation);
        if removed.is_some() {
            self.released_total.fetch_add(1, Ordering::Relaxed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brand_core::reporter::{capture_reporter, Reporter};
    use brand_core::CaptureReporter;

    fn setup(ids: &[&str]) -> (BrandAnalytics, Arc<CaptureReporter>, Arc<StaticViewport>) {
        let reporter = capture_reporter();
        let analytics = BrandAnalytics::with_reporter(reporter.clone() as Arc<dyn Reporter>);
        let viewport = Arc::new(StaticViewport::new(ids.iter().copied()));
        (analytics, reporter, viewport)
    }

    #[test]
    fn test_first_intersection_reports_once() {
        let (analytics, reporter, viewport) = setup(&["evidencias"]);
        let watch = SectionWatch::attach(&analytics, viewport.clone(), "evidencias");
        assert!(watch.is_watching());
        assert!(viewport.is_observing("evidencias"));

        watch.on_intersection(&[IntersectionEntry::visible(0.6)]);
        watch.on_intersection(&[IntersectionEntry::hidden()]);
        watch.on_intersection(&[IntersectionEntry::visible(1.0)]);

        assert!(watch.has_fired());
        assert_eq!(reporter.count(), 1);
        let event = reporter.last().unwrap();
        assert_eq!(event.name, "section_view");
        assert_eq!(event.properties["event_label"], "evidencias");
        assert_eq!(event.properties["non_interaction"], true);
    }

    #[test]
    fn test_below_threshold_does_not_fire() {
        let (analytics, reporter, viewport) = setup(&["posologia"]);
        let watch = SectionWatch::attach(&analytics, viewport, "posologia");

        watch.on_intersection(&[IntersectionEntry::visible(0.3)]);
        assert!(!watch.has_fired());
        assert_eq!(reporter.count(), 0);

        watch.on_intersection(&[IntersectionEntry::visible(0.5)]);
        assert_eq!(reporter.count(), 1);
    }

    #[test]
    fn test_missing_element_is_inert() {
        let (analytics, reporter, viewport) = setup(&["hero"]);
        let watch = SectionWatch::attach(&analytics, viewport.clone(), "nao-existe");
        assert!(!watch.is_watching());

        watch.on_intersection(&[IntersectionEntry::visible(1.0)]);
        drop(watch);

        assert_eq!(viewport.observed_total(), 0);
        assert_eq!(viewport.released_total(), 0);
        assert_eq!(reporter.count(), 0);
    }

    #[test]
    fn test_drop_releases_observer() {
        let (analytics, _reporter, viewport) = setup(&["cursos"]);
        {
            let _watch = SectionWatch::attach(&analytics, viewport.clone(), "cursos");
            assert!(viewport.is_observing("cursos"));
        }
        assert!(!viewport.is_observing("cursos"));
        assert_eq!(viewport.observed_total(), 1);
        assert_eq!(viewport.released_total(), 1);
    }

    #[test]
    fn test_remount_rearms() {
        let (analytics, reporter, viewport) = setup(&["hero"]);

        let first = SectionWatch::attach(&analytics, viewport.clone(), "hero");
        first.on_intersection(&[IntersectionEntry::visible(0.9)]);
        first.detach();

        let second = SectionWatch::attach(&analytics, viewport.clone(), "hero");
        second.on_intersection(&[IntersectionEntry::visible(0.9)]);

        assert_eq!(reporter.count_named("section_view"), 2);
    }

    #[test]
    fn test_overlapping_watches_release_independently() {
        let (analytics, reporter, viewport) = setup(&["hero"]);

        let old = SectionWatch::attach(&analytics, viewport.clone(), "hero");
        let new = SectionWatch::attach(&analytics, viewport.clone(), "hero");
        drop(old);

        assert!(new.is_watching());
        assert!(viewport.is_observing("hero"));
        new.on_intersection(&[IntersectionEntry::visible(1.0)]);
        assert_eq!(reporter.count_named("section_view"), 1);

        drop(new);
        assert!(!viewport.is_observing("hero"));
        assert_eq!(viewport.observed_total(), 2);
        assert_eq!(viewport.released_total(), 2);
    }

    #[test]
    fn test_no_channel_still_marks_fired() {
        let viewport = Arc::new(StaticViewport::new(["hero"]));
        let watch = SectionWatch::attach(&BrandAnalytics::detached(), viewport, "hero");
        watch.on_intersection(&[IntersectionEntry::visible(1.0)]);
        assert!(watch.has_fired());
    }
}
