//! Environment-based Configuration
//!
//! # Environment Variables
//!
//! - `TRANSCODER_LOG_LEVEL` - Logging level (trace, debug, info, warn, error; default: info)
//! - `TRANSCODER_LOG_FORMAT` - "pretty" or "json" (default: "pretty")
//! - `TRANSCODER_FIELD_CHECK` - "width" or "modulus" (default: "width")
//!
//! `width` only enforces the 256-bit bound on field elements. `modulus` also
//! rejects coordinates not below the BN254 base field and public inputs not
//! below the BN254 scalar field.

use std::env;

use thiserror::Error;
use tracing::info;

use super::logging::{EventCategory, LogEvent, LogFormat, LogLevel};
use crate::field::FieldCheck;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Transcoder configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscoderConfig {
    /// Log level
    pub log_level: LogLevel,

    /// Log output format
    pub log_format: LogFormat,

    /// Field element validation
    pub field_check: FieldCheck,
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Pretty,
            field_check: FieldCheck::Width,
        }
    }
}

impl TranscoderConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_level = lookup("TRANSCODER_LOG_LEVEL")
            .map(|v| LogLevel::from(v.as_str()))
            .unwrap_or(defaults.log_level);

        let log_format = match lookup("TRANSCODER_LOG_FORMAT") {
            Some(v) => v.parse()?,
            None => defaults.log_format,
        };

        let field_check = match lookup("TRANSCODER_FIELD_CHECK") {
            Some(v) => v.parse()?,
            None => defaults.field_check,
        };

        Ok(Self {
            log_level,
            log_format,
            field_check,
        })
    }

    /// Configuration summary as a structured event
    pub fn summary_event(&self) -> LogEvent {
        let log_format = match self.log_format {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        };
        let field_check = match self.field_check {
            FieldCheck::Width => "width",
            FieldCheck::Modulus => "modulus",
        };

        LogEvent::new(LogLevel::Info, EventCategory::System, "transcoder configured").with_data(
            serde_json::json!({
                "log_level": self.log_level.as_str(),
                "log_format": log_format,
                "field_check": field_check,
            }),
        )
    }

    /// Log configuration summary
    pub fn log_summary(&self) {
        info!(target: "transcoder::config", "{}", self.summary_event().to_json());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = TranscoderConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TranscoderConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = TranscoderConfig::from_lookup(lookup(&[
            ("TRANSCODER_LOG_LEVEL", "debug"),
            ("TRANSCODER_LOG_FORMAT", "json"),
            ("TRANSCODER_FIELD_CHECK", "modulus"),
        ]))
        .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.field_check, FieldCheck::Modulus);
    }

    #[test]
    fn test_summary_event() {
        let config = TranscoderConfig {
            field_check: FieldCheck::Modulus,
            ..TranscoderConfig::default()
        };

        let json = config.summary_event().to_json();
        assert!(json.contains("\"system\""));
        assert!(json.contains("\"field_check\":\"modulus\""));
        assert!(json.contains("\"log_level\":\"info\""));
    }

    #[test]
    fn test_invalid_values() {
        assert!(TranscoderConfig::from_lookup(lookup(&[("TRANSCODER_FIELD_CHECK", "none")])).is_err());
        assert!(TranscoderConfig::from_lookup(lookup(&[("TRANSCODER_LOG_FORMAT", "xml")])).is_err());
    }
}
