use serde::Deserialize;
use std::path::Path;

use crate::error::BrandResult;

/// Root tracking configuration. Loaded from environment variables with the
/// prefix `BRAND_ANALYTICS__` and an optional TOML config file.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Master switch. When false every tracking call behaves as if the
    /// reporting channel were missing.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// `event_label` of the generic conversion event sent after a contact.
    #[serde(default = "default_conversion_label")]
    pub conversion_label: String,
    /// Fraction of a section that must be visible to count as viewed.
    #[serde(default = "default_section_view_threshold")]
    pub section_view_threshold: f64,
    /// Time on page must exceed this many seconds to be reported.
    #[serde(default = "default_min_time_on_page_secs")]
    pub min_time_on_page_secs: u64,
    /// Evidence engagement must exceed this many seconds to be reported.
    #[serde(default = "default_min_evidence_secs")]
    pub min_evidence_secs: u64,
    #[serde(default)]
    pub ga: GaSettings,
    #[serde(default)]
    pub data_layer: DataLayerSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GaSettings {
    /// GA4 Measurement ID, e.g. "G-XXXXXXXXXX".
    #[serde(default)]
    pub measurement_id: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default)]
    pub debug_mode: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataLayerSettings {
    #[serde(default = "default_data_layer_name")]
    pub name: String,
}

fn default_enabled() -> bool {
    true
}
fn default_conversion_label() -> String {
    "whatsapp_contact_sucrafilm".to_string()
}
fn default_section_view_threshold() -> f64 {
    0.5
}
fn default_min_time_on_page_secs() -> u64 {
    10
}
fn default_min_evidence_secs() -> u64 {
    5
}
fn default_data_layer_name() -> String {
    "dataLayer".to_string()
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            conversion_label: default_conversion_label(),
            section_view_threshold: default_section_view_threshold(),
            min_time_on_page_secs: default_min_time_on_page_secs(),
            min_evidence_secs: default_min_evidence_secs(),
            ga: GaSettings::default(),
            data_layer: DataLayerSettings::default(),
        }
    }
}

impl Default for DataLayerSettings {
    fn default() -> Self {
        Self {
            name: default_data_layer_name(),
        }
    }
}

impl AnalyticsConfig {
    /// Load configuration from environment variables and an optional config
    /// file. Environment values override the file.
    pub fn load(file: Option<&Path>) -> BrandResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let config = builder
            .add_source(
                config::Environment::with_prefix("BRAND_ANALYTICS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalyticsConfig::default();
        assert!(config.enabled);
        assert_eq!(config.conversion_label, "whatsapp_contact_sucrafilm");
        assert_eq!(config.section_view_threshold, 0.5);
        assert_eq!(config.min_time_on_page_secs, 10);
        assert_eq!(config.min_evidence_secs, 5);
        assert_eq!(config.data_layer.name, "dataLayer");
        assert!(config.ga.measurement_id.is_empty());
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: AnalyticsConfig =
            serde_json::from_str(r#"{"min_evidence_secs": 8, "ga": {"debug_mode": true}}"#)
                .unwrap();
        assert_eq!(config.min_evidence_secs, 8);
        assert!(config.ga.debug_mode);
        assert_eq!(config.min_time_on_page_secs, 10);
        assert_eq!(config.data_layer.name, "dataLayer");
    }

    #[test]
    fn test_load_from_toml_file() {
        let path = std::env::temp_dir().join(format!(
            "brand-analytics-config-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "conversion_label = \"site_contact\"\n\n[ga]\nmeasurement_id = \"G-ABC123\"\n",
        )
        .unwrap();

        let config = AnalyticsConfig::load(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.conversion_label, "site_contact");
        assert_eq!(config.ga.measurement_id, "G-ABC123");
        assert_eq!(config.section_view_threshold, 0.5);
    }
}
