//! `dataLayer` adaptor: renders each event as the `gtag('event', ...)`
//! command that `gtag.js` queues on the page's data layer.

use brand_core::config::DataLayerSettings;
use brand_core::{BrandError, BrandResult, EventProperties};
use serde_json::json;

use super::PayloadAdaptor;

pub struct DataLayerAdaptor {
    settings: DataLayerSettings,
}

impl DataLayerAdaptor {
    pub fn new(settings: DataLayerSettings) -> Self {
        Self { settings }
    }

    /// Name of the global array the commands are pushed onto.
    pub fn data_layer_name(&self) -> &str {
        &self.settings.name
    }
}

impl Default for DataLayerAdaptor {
    fn default() -> Self {
        Self::new(DataLayerSettings::default())
    }
}

impl PayloadAdaptor for DataLayerAdaptor {
    fn platform(&self) -> &str {
        "datalayer"
    }

    fn transform(&self, event_name: &str, properties: EventProperties) -> serde_json::Value {
        json!(["event", event_name, properties])
    }

    fn validate_config(&self) -> BrandResult<()> {
        let name = &self.settings.name;
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$');
        let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
        if !valid_start || !valid_rest {
            return Err(BrandError::Adaptor(format!(
                "data layer name must be a JavaScript identifier, got '{name}'"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptors::DataLayerReporter;
    use brand_core::reporter::Reporter;
    use serde_json::Map;

    #[test]
    fn test_transform_is_gtag_command() {
        let adaptor = DataLayerAdaptor::default();
        let mut props = Map::new();
        props.insert("event_category".into(), json!("Social"));
        props.insert("event_label".into(), json!("whatsapp"));
        props.insert("value".into(), json!(5));

        let payload = adaptor.transform("share", props);
        assert_eq!(payload[0], "event");
        assert_eq!(payload[1], "share");
        assert_eq!(payload[2]["event_label"], "whatsapp");
        assert_eq!(payload[2]["value"], 5);
    }

    #[test]
    fn test_reporter_buffers_until_drained() {
        let reporter = DataLayerReporter::new(DataLayerAdaptor::default());
        reporter.report("qr_code_access", Map::new());
        reporter.report("share", Map::new());
        assert_eq!(reporter.len(), 2);

        let drained = reporter.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0][1], "qr_code_access");
        assert!(reporter.is_empty());
    }

    #[test]
    fn test_validate_config() {
        assert!(DataLayerAdaptor::default().validate_config().is_ok());
        assert!(DataLayerAdaptor::new(DataLayerSettings {
            name: "$gtmLayer_2".into()
        })
        .validate_config()
        .is_ok());

        for bad in ["", "2layer", "data-layer", "data layer"] {
            let adaptor = DataLayerAdaptor::new(DataLayerSettings { name: bad.into() });
            assert!(adaptor.validate_config().is_err(), "accepted {bad:?}");
        }
    }
}
