//! Google Analytics 4 (GA4) Measurement Protocol adaptor: wraps reported
//! events into GA4 request bodies for server-side forwarding.

use brand_core::config::GaSettings;
use brand_core::{BrandError, BrandResult, EventProperties};
use chrono::Utc;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use super::PayloadAdaptor;

pub struct GaAdaptor {
    settings: GaSettings,
    client_id: String,
}

impl GaAdaptor {
    /// Adaptor with a fresh random client id.
    pub fn new(settings: GaSettings) -> Self {
        Self::with_client_id(settings, Uuid::new_v4().to_string())
    }

    pub fn with_client_id(settings: GaSettings, client_id: impl Into<String>) -> Self {
        Self {
            settings,
            client_id: client_id.into(),
        }
    }

    pub fn settings(&self) -> &GaSettings {
        &self.settings
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }
}

impl PayloadAdaptor for GaAdaptor {
    fn platform(&self) -> &str {
        "ga4"
    }

    fn transform(&self, event_name: &str, properties: EventProperties) -> serde_json::Value {
        let mut params = properties;
        if self.settings.debug_mode {
            params.insert("debug_mode".to_string(), json!(true));
        }

        debug!(
            event_name,
            measurement_id = %self.settings.measurement_id,
            "GA4 event transformed"
        );

        json!({
            "client_id": self.client_id,
            "timestamp_micros": Utc::now().timestamp_micros().to_string(),
            "events": [{
                "name": event_name,
                "params": params,
            }],
        })
    }

    fn validate_config(&self) -> BrandResult<()> {
        if self.settings.measurement_id.is_empty() {
            return Err(BrandError::Adaptor(
                "GA4 measurement_id must not be empty".into(),
            ));
        }
        if !self.settings.measurement_id.starts_with("G-") {
            return Err(BrandError::Adaptor(format!(
                "GA4 measurement_id must start with 'G-', got '{}'",
                self.settings.measurement_id
            )));
        }
        if self.settings.api_secret.is_empty() {
            return Err(BrandError::Adaptor("GA4 api_secret must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptors::GaReporter;
    use crate::tracker::BrandAnalytics;
    use brand_core::reporter::Reporter;
    use std::sync::Arc;

    fn test_settings() -> GaSettings {
        GaSettings {
            measurement_id: "G-TEST12345".into(),
            api_secret: "secret-abc".into(),
            debug_mode: false,
        }
    }

    #[test]
    fn test_transform_wraps_event() {
        let adaptor = GaAdaptor::with_client_id(test_settings(), "anon-xyz");
        let mut props = EventProperties::new();
        props.insert("event_label".into(), json!("Dosage Information"));
        props.insert("value".into(), json!(30));

        let payload = adaptor.transform("posology_view", props);
        assert_eq!(payload["client_id"], "anon-xyz");
        assert!(payload["timestamp_micros"].is_string());

        let events = payload["events"].as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["name"], "posology_view");
        assert_eq!(events[0]["params"]["value"], 30);
        assert!(events[0]["params"].get("debug_mode").is_none());
    }

    #[test]
    fn test_debug_mode() {
        let adaptor = GaAdaptor::new(GaSettings {
            debug_mode: true,
            ..test_settings()
        });
        let payload = adaptor.transform("share", EventProperties::new());
        assert_eq!(payload["events"][0]["params"]["debug_mode"], true);
    }

    #[test]
    fn test_random_client_ids_differ() {
        let a = GaAdaptor::new(test_settings());
        let b = GaAdaptor::new(test_settings());
        assert_ne!(a.client_id(), b.client_id());
    }

    #[test]
    fn test_validate_config() {
        assert!(GaAdaptor::new(test_settings()).validate_config().is_ok());

        let bad = GaAdaptor::new(GaSettings {
            measurement_id: "".into(),
            ..test_settings()
        });
        assert!(bad.validate_config().is_err());

        let bad2 = GaAdaptor::new(GaSettings {
            measurement_id: "UA-12345".into(),
            ..test_settings()
        });
        assert!(bad2.validate_config().is_err());

        let bad3 = GaAdaptor::new(GaSettings {
            api_secret: "".into(),
            ..test_settings()
        });
        assert!(bad3.validate_config().is_err());
    }

    #[test]
    fn test_contact_flow_through_ga_reporter() {
        let reporter = Arc::new(GaReporter::new(GaAdaptor::with_client_id(
            test_settings(),
            "anon-1",
        )));
        let analytics = BrandAnalytics::with_reporter(reporter.clone() as Arc<dyn Reporter>);
        analytics.track_rep_contact(&brand_core::ContactRequest {
            crm: "12345".into(),
            question: "Pode ser usado na gestação?".into(),
            ..Default::default()
        });

        let payloads = reporter.drain();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0]["events"][0]["name"], "rep_contact");
        assert_eq!(payloads[0]["events"][0]["params"]["lead_score"], 25);
        assert_eq!(payloads[1]["events"][0]["name"], "generate_lead");
        assert_eq!(payloads[1]["events"][0]["params"]["value"], 25);
    }
}
