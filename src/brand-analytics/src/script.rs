//! Interaction scripts: one JSON object per line, replayed against the
//! dispatcher and the lifecycle observers.

use std::collections::HashMap;
use std::io::BufRead;
use std::sync::Arc;

use brand_core::{BrandError, BrandResult, ContactRequest};
use brand_web_sdk::{
    BrandAnalytics, IntersectionEntry, ManualClock, PageTimer, SectionWatch, StaticViewport,
};
use chrono::TimeDelta;
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Interaction {
    PosologyView {
        time_spent: u64,
    },
    RepContact(ContactRequest),
    Download {
        file_name: String,
        file_type: Option<String>,
    },
    ScrollDepth {
        percentage: u32,
    },
    Share {
        method: Option<String>,
    },
    QrAccess,
    CourseClick {
        course_name: String,
    },
    EvidenceEngagement {
        section_name: String,
        time_spent: u64,
    },
    MountSection {
        section: String,
    },
    SectionVisible {
        section: String,
        #[serde(default = "fully_visible")]
        ratio: f64,
    },
    UnmountSection {
        section: String,
    },
    PageVisit {
        page: String,
        seconds: u64,
    },
}

fn fully_visible() -> f64 {
    1.0
}

/// Parse a script. Blank lines and lines starting with `#` are skipped.
pub fn parse_script(reader: impl BufRead) -> BrandResult<Vec<Interaction>> {
    let mut interactions = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let interaction: Interaction =
            serde_json::from_str(trimmed).map_err(|e| BrandError::Script {
                line: idx + 1,
                reason: e.to_string(),
            })?;
        if let Interaction::PageVisit { seconds, .. } = &interaction {
            if visit_duration(*seconds).is_none() {
                return Err(BrandError::Script {
                    line: idx + 1,
                    reason: format!("page_visit seconds out of range: {seconds}"),
                });
            }
        }
        interactions.push(interaction);
    }
    Ok(interactions)
}

fn visit_duration(seconds: u64) -> Option<TimeDelta> {
    i64::try_from(seconds).ok().and_then(TimeDelta::try_seconds)
}

/// Drives one simulated page visit. Mounted section watches live until
/// unmounted or until the session is dropped.
pub struct ReplaySession {
    analytics: BrandAnalytics,
    viewport: Arc<StaticViewport>,
    clock: ManualClock,
    watches: HashMap<String, SectionWatch>,
}

impl ReplaySession {
    pub fn new(analytics: BrandAnalytics, sections: Vec<String>) -> Self {
        Self {
            analytics,
            viewport: Arc::new(StaticViewport::new(sections)),
            clock: ManualClock::default(),
            watches: HashMap::new(),
        }
    }

    pub fn viewport(&self) -> &StaticViewport {
        &self.viewport
    }

    pub fn apply(&mut self, interaction: Interaction) {
        debug!(?interaction, "replaying interaction");
        match interaction {
            Interaction::PosologyView { time_spent } => self.analytics.track_posology_view(time_spent),
            Interaction::RepContact(contact) => self.analytics.track_rep_contact(&contact),
            Interaction::Download { file_name, file_type } => {
                self.analytics.track_download(&file_name, file_type.as_deref())
            }
            Interaction::ScrollDepth { percentage } => self.analytics.track_scroll_depth(percentage),
            Interaction::Share { method } => self.analytics.track_share(method.as_deref()),
            Interaction::QrAccess => self.analytics.track_qr_access(),
            Interaction::CourseClick { course_name } => self.analytics.track_course_click(&course_name),
            Interaction::EvidenceEngagement {
                section_name,
                time_spent,
            } => self
                .analytics
                .track_evidence_engagement(&section_name, time_spent),
            Interaction::MountSection { section } => {
                // Release the previous watch before the new one registers.
                self.watches.remove(&section);
                let watch = SectionWatch::attach(&self.analytics, self.viewport.clone(), section.as_str());
                self.watches.insert(section, watch);
            }
            Interaction::SectionVisible { section, ratio } => match self.watches.get(&section) {
                Some(watch) => watch.on_intersection(&[IntersectionEntry::visible(ratio)]),
                None => warn!(section = %section, "section not mounted, visibility ignored"),
            },
            Interaction::UnmountSection { section } => {
                if self.watches.remove(&section).is_none() {
                    warn!(section = %section, "section not mounted");
                }
            }
            Interaction::PageVisit { page, seconds } => {
                let timer = PageTimer::start(&self.analytics, Arc::new(self.clock.clone()), page);
                match visit_duration(seconds) {
                    Some(by) => self.clock.advance(by),
                    None => {
                        warn!(seconds, "page visit too long, clamping");
                        self.clock.advance(TimeDelta::MAX);
                    }
                }
                timer.stop();
            }
        }
    }

    /// Unmount every section still mounted.
    pub fn finish(&mut self) {
        self.watches.clear();
    }
}
