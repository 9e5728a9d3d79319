//! # Settings
//!
//! Application-level settings for a calculator host: which built-in
//! calculators to register, how narrative numbers are formatted, and how
//! logging is configured. Every section has defaults, so an empty TOML file
//! (or no file at all) yields a working configuration.
//!
//! ## TOML Example
//!
//! ```toml
//! [registry]
//! enabled = ["brrrr", "mortgage-points"]
//!
//! [report]
//! currencySymbol = "$"
//! currencyDecimals = 0
//!
//! [logging]
//! filter = "fincalc_core=debug"
//! format = "json"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::format::NumberFormat;

/// Environment variable that overrides `logging.filter`
pub const LOG_ENV_VAR: &str = "FINCALC_LOG";

/// Root settings container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Which calculators the registry should load
    pub registry: RegistrySettings,

    /// Number formatting for narrative text
    pub report: NumberFormat,

    /// Log filter and output format
    pub logging: LoggingSettings,
}

impl Settings {
    /// Parse settings from a TOML document
    pub fn from_toml_str(source: &str) -> CalcResult<Self> {
        toml::from_str(source).map_err(|e| CalcError::config("toml", e.to_string()))
    }

    /// Load settings from a TOML file
    pub fn load(path: &Path) -> CalcResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| CalcError::config(path.display().to_string(), e.to_string()))?;
        let settings: Settings = toml::from_str(&source)
            .map_err(|e| CalcError::config(path.display().to_string(), e.to_string()))?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Apply environment overrides (`FINCALC_LOG`)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(filter) = std::env::var(LOG_ENV_VAR) {
            if !filter.trim().is_empty() {
                self.logging.filter = filter;
            }
        }
        self
    }
}

/// Registry settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Calculator ids to register; empty means all built-ins
    pub enabled: Vec<String>,
}

impl RegistrySettings {
    /// Whether the calculator with `id` should be registered
    pub fn is_enabled(&self, id: &str) -> bool {
        self.enabled.is_empty() || self.enabled.iter().any(|enabled| enabled == id)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing_subscriber::EnvFilter` directive string
    pub filter: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.report.currency_symbol, "$");
        assert_eq!(settings.logging.filter, "warn");
        assert!(settings.registry.is_enabled("brrrr"));
    }

    #[test]
    fn test_partial_toml() {
        let settings = Settings::from_toml_str(
            r#"
            [registry]
            enabled = ["brrrr"]

            [report]
            currencySymbol = "€"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert!(settings.registry.is_enabled("brrrr"));
        assert!(!settings.registry.is_enabled("usda-loan"));
        assert_eq!(settings.report.currency_symbol, "€");
        assert_eq!(settings.report.currency_decimals, 0);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.logging.filter, "warn");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = Settings::from_toml_str("[registry\nenabled = 3").unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }
}
