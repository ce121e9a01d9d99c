//! Panel configuration file.
//!
//! One [`PanelConfig`] describes a whole panel: where the LED service lives,
//! which LEDs to show, which charts are available and how writes are encoded.
//! It is resolved once at startup from the TOML file, then the URL override
//! (`--url` / `LEDPANEL_URL`), then validated.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use ledpanel_core::{
    ClientConfig, DEFAULT_BASE_URL, Endpoints, HistoryOrder, StateEncoding, WriteMethod,
};
use ledpanel_types::{ChartKind, LedId};

/// Output formats accepted in the `format` key.
const FORMATS: [&str; 3] = ["text", "json", "csv"];

/// Panel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Base URL of the LED service.
    pub base_url: String,
    /// LED identifiers shown on the panel, in display order.
    pub leds: Vec<u32>,
    /// Chart kinds the panel offers.
    pub charts: Vec<ChartKind>,
    /// Endpoint paths.
    pub endpoints: Endpoints,
    /// HTTP method for state writes.
    pub write_method: WriteMethod,
    /// Body encoding for state writes.
    pub state_encoding: StateEncoding,
    /// Order in which the service returns history.
    pub history_order: HistoryOrder,
    /// Per-request timeout in seconds. Unset waits indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// Disable colored output.
    pub no_color: bool,
    /// Default output format (`text`, `json` or `csv`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            leds: vec![1, 2, 3],
            charts: ChartKind::ALL.to_vec(),
            endpoints: Endpoints::default(),
            write_method: WriteMethod::default(),
            state_encoding: StateEncoding::default(),
            history_order: HistoryOrder::default(),
            timeout_secs: None,
            no_color: false,
            format: None,
        }
    }
}

impl PanelConfig {
    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Load configuration from a file, or the defaults if it does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return every problem found.
    ///
    /// This checks:
    /// - The base URL is a non-empty `http://` or `https://` URL
    /// - At least one LED is listed, with no zero or duplicate ids
    /// - Every endpoint path starts with `/`
    /// - The timeout, when set, is positive
    /// - The default format, when set, is known
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        let url = self.base_url.trim();
        if url.is_empty() {
            errors.push(ValidationError::new("base_url", "must not be empty"));
        } else if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(ValidationError::new(
                "base_url",
                format!("must start with http:// or https://, got '{}'", url),
            ));
        }

        if self.leds.is_empty() {
            errors.push(ValidationError::new("leds", "at least one LED is required"));
        }
        let mut seen = HashSet::new();
        for (i, id) in self.leds.iter().enumerate() {
            if *id == 0 {
                errors.push(ValidationError::new(
                    format!("leds[{}]", i),
                    "LED ids start at 1",
                ));
            } else if !seen.insert(*id) {
                errors.push(ValidationError::new(
                    format!("leds[{}]", i),
                    format!("duplicate LED id {}", id),
                ));
            }
        }

        for (name, path) in [
            ("history", &self.endpoints.history),
            ("write", &self.endpoints.write),
            ("reports", &self.endpoints.reports),
            ("time_totals", &self.endpoints.time_totals),
            ("state_line", &self.endpoints.state_line),
        ] {
            if !path.starts_with('/') {
                errors.push(ValidationError::new(
                    format!("endpoints.{}", name),
                    format!("must start with '/', got '{}'", path),
                ));
            }
        }

        if self.timeout_secs == Some(0) {
            errors.push(ValidationError::new(
                "timeout_secs",
                "must be greater than zero",
            ));
        }

        if let Some(format) = &self.format
            && !FORMATS.contains(&format.to_ascii_lowercase().as_str())
        {
            errors.push(ValidationError::new(
                "format",
                format!("unknown format '{}' (expected text, json or csv)", format),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Resolve the configuration used for a run.
    ///
    /// Reads `path` (or the default path; a missing file yields defaults),
    /// applies the URL override, then validates.
    pub fn resolve(path: Option<&Path>, url: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::load_or_default(default_config_path())?,
        };
        if let Some(url) = url {
            config = config.with_url_override(url);
        }
        config.validate()?;
        Ok(config)
    }

    /// Replace the base URL.
    #[must_use]
    pub fn with_url_override(mut self, url: &str) -> Self {
        self.base_url = url.trim().to_string();
        self
    }

    /// LED ids in panel order, skipping invalid entries.
    pub fn led_ids(&self) -> Vec<LedId> {
        self.leds
            .iter()
            .filter_map(|id| LedId::new(*id).ok())
            .collect()
    }

    /// Whether a chart kind is enabled.
    pub fn chart_enabled(&self, kind: ChartKind) -> bool {
        self.charts.contains(&kind)
    }

    /// Client settings derived from this configuration.
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.base_url.clone())
            .endpoints(self.endpoints.clone())
            .write_method(self.write_method)
            .state_encoding(self.state_encoding)
            .history_order(self.history_order);
        match self.timeout_secs {
            Some(secs) => config.timeout(Duration::from_secs(secs)),
            None => config,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),
    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field path (e.g., `base_url` or `leds[2]`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ledpanel")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(result: Result<(), ConfigError>) -> Vec<String> {
        match result {
            Err(ConfigError::Validation(errors)) => errors.into_iter().map(|e| e.field).collect(),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(()) => Vec::new(),
        }
    }

    #[test]
    fn test_default_config_validates() {
        let config = PanelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.led_ids().len(), 3);
        assert!(ChartKind::ALL.iter().all(|k| config.chart_enabled(*k)));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
            base_url = "http://panel.local:8080"
            leds = [4, 5]
            charts = ["bar"]
            write_method = "post"
            state_encoding = "int"

            [endpoints]
            write = "/api/led/{id}"
        "#;
        let config: PanelConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.leds, vec![4, 5]);
        assert_eq!(config.charts, vec![ChartKind::OnTimeTotals]);
        assert!(!config.chart_enabled(ChartKind::StateTimeline));
        assert_eq!(config.write_method, WriteMethod::Post);
        assert_eq!(config.state_encoding, StateEncoding::Int);
        assert_eq!(config.endpoints.write, "/api/led/{id}");
        assert_eq!(config.endpoints.history, "/historial");
        assert_eq!(config.history_order, HistoryOrder::NewestFirst);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_history_order_key() {
        let config: PanelConfig = toml::from_str(r#"history_order = "oldest_first""#).unwrap();
        assert_eq!(config.history_order, HistoryOrder::OldestFirst);
    }

    #[test]
    fn test_invalid_url() {
        let config = PanelConfig::default().with_url_override("ftp://x");
        assert_eq!(fields(config.validate()), vec!["base_url"]);

        let config = PanelConfig::default().with_url_override("  ");
        assert_eq!(fields(config.validate()), vec!["base_url"]);
    }

    #[test]
    fn test_led_validation() {
        let config = PanelConfig {
            leds: vec![1, 0, 1],
            ..Default::default()
        };
        assert_eq!(fields(config.validate()), vec!["leds[1]", "leds[2]"]);

        let config = PanelConfig {
            leds: vec![],
            ..Default::default()
        };
        assert_eq!(fields(config.validate()), vec!["leds"]);
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = PanelConfig {
            base_url: String::new(),
            timeout_secs: Some(0),
            format: Some("xml".to_string()),
            ..Default::default()
        };
        config.endpoints.reports = "reportes".to_string();
        assert_eq!(
            fields(config.validate()),
            vec!["base_url", "endpoints.reports", "timeout_secs", "format"]
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigError::Validation(vec![
            ValidationError::new("base_url", "must not be empty"),
            ValidationError::new("leds", "at least one LED is required"),
        ]);
        assert_eq!(
            err.to_string(),
            "Configuration validation failed:\n  - base_url: must not be empty\n  - leds: at least one LED is required"
        );
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = PanelConfig {
            base_url: "https://leds.example.com".to_string(),
            leds: vec![7],
            timeout_secs: Some(5),
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = PanelConfig::load(&path).unwrap();
        assert!(loaded.validate().is_ok());
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_errors() {
        let result = PanelConfig::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("invalid.toml");
        std::fs::write(&path, "this is not valid { toml").unwrap();
        assert!(matches!(
            PanelConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = PanelConfig::load_or_default(temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, PanelConfig::default());
    }

    #[test]
    fn test_resolve_applies_url_override_before_validation() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, r#"base_url = "not a url""#).unwrap();

        assert!(PanelConfig::resolve(Some(&path), None).is_err());
        let config = PanelConfig::resolve(Some(&path), Some("http://10.0.0.2:3000")).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:3000");
    }

    #[test]
    fn test_client_config() {
        let config = PanelConfig {
            timeout_secs: Some(3),
            write_method: WriteMethod::Post,
            ..Default::default()
        };
        let client = config.client_config();
        assert_eq!(client.base_url, "http://localhost:3000");
        assert_eq!(client.write_method, WriteMethod::Post);
        assert_eq!(client.timeout, Some(Duration::from_secs(3)));
        assert_eq!(PanelConfig::default().client_config().timeout, None);
    }

    #[test]
    fn test_default_config_path() {
        let path = default_config_path();
        assert!(path.ends_with("ledpanel/config.toml"));
    }
}
