//! Structured Logging
//!
//! Provides structured logging with:
//! - Pretty output for local use, JSON output for log aggregation
//! - Structured transcode/decode events with timings
//!
//! Logs go to stderr so encoded output on stdout stays clean. Library
//! code only emits `tracing` events; installing a subscriber is left to
//! the binary.
//!
//! # Usage
//!
//! ```no_run
//! use proof_transcoder::common::logging::{init_logging, LogFormat, LogLevel};
//!
//! init_logging(LogLevel::Info, LogFormat::Json).unwrap();
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use super::config::{ConfigError, TranscoderConfig};

// ============================================================================
// Log Levels
// ============================================================================

/// Application log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "trace" => LogLevel::Trace,
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::InvalidValue(
                "TRANSCODER_LOG_FORMAT".to_string(),
                format!("unknown log format: {} (use 'pretty' or 'json')", s),
            )),
        }
    }
}

// ============================================================================
// Structured Event Types
// ============================================================================

/// Event categories for structured logging
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// Proof + public inputs encoded into an instruction
    Transcode,
    /// Instruction buffer decoded
    Decode,
    /// Artifact reads and writes
    Io,
    /// Startup, configuration
    System,
}

/// Structured log event
#[derive(Debug, Serialize)]
pub struct LogEvent {
    /// Event timestamp (ISO 8601)
    pub timestamp: String,
    pub level: String,
    pub category: EventCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_us: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

/// Error details for error events
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl LogEvent {
    pub fn new(level: LogLevel, category: EventCategory, message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level: level.as_str().to_uppercase(),
            category,
            message: message.into(),
            data: None,
            duration_us: None,
            error: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_duration(mut self, duration_us: u64) -> Self {
        self.duration_us = Some(duration_us);
        self
    }

    pub fn with_error(mut self, code: impl Into<String>, message: impl Into<String>) -> Self {
        self.error = Some(ErrorDetails {
            code: code.into(),
            message: message.into(),
        });
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                "{{\"error\": \"failed to serialize log\", \"message\": {:?}}}",
                self.message
            )
        })
    }
}

// ============================================================================
// Event Helpers
// ============================================================================

/// Log the outcome of encoding a verification request
pub fn log_transcode_event(
    input_count: usize,
    encoded_len: usize,
    duration_us: u64,
    error: Option<(&str, &str)>,
) {
    let level = if error.is_none() { LogLevel::Info } else { LogLevel::Error };
    let mut event = LogEvent::new(level, EventCategory::Transcode, "verify request encoded")
        .with_duration(duration_us)
        .with_data(serde_json::json!({
            "input_count": input_count,
            "encoded_len": encoded_len,
        }));

    if let Some((code, message)) = error {
        event = event.with_error(code, message);
        tracing::error!(target: "transcoder::request", "{}", event.to_json());
    } else {
        tracing::info!(target: "transcoder::request", "{}", event.to_json());
    }
}

/// Log the outcome of decoding instruction data
pub fn log_decode_event(buffer_len: usize, error: Option<(&str, &str)>) {
    let level = if error.is_none() { LogLevel::Info } else { LogLevel::Warn };
    let mut event = LogEvent::new(level, EventCategory::Decode, "instruction decoded")
        .with_data(serde_json::json!({ "buffer_len": buffer_len }));

    if let Some((code, message)) = error {
        event = event.with_error(code, message);
        tracing::warn!(target: "transcoder::request", "{}", event.to_json());
    } else {
        tracing::info!(target: "transcoder::request", "{}", event.to_json());
    }
}

/// Log a successful artifact read or write
pub fn log_io_event(action: &str, path: &Path, bytes: usize) {
    let event = io_event(action, path, bytes);
    tracing::debug!(target: "transcoder::io", "{}", event.to_json());
}

fn io_event(action: &str, path: &Path, bytes: usize) -> LogEvent {
    LogEvent::new(LogLevel::Debug, EventCategory::Io, format!("artifact {}", action)).with_data(
        serde_json::json!({
            "path": path.display().to_string(),
            "bytes": bytes,
        }),
    )
}

// ============================================================================
// Initialization
// ============================================================================

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(level: LogLevel, format: LogFormat) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.as_str();
        EnvFilter::new(format!("proof_transcoder={},transcoder={}", level, level))
    });

    match format {
        LogFormat::Json => {
            let subscriber = tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_span_events(FmtSpan::CLOSE),
            );

            subscriber
                .try_init()
                .map_err(|e| LoggingError::InitFailed(e.to_string()))?;
        }
        LogFormat::Pretty => {
            let subscriber = tracing_subscriber::registry().with(filter).with(
                fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            );

            subscriber
                .try_init()
                .map_err(|e| LoggingError::InitFailed(e.to_string()))?;
        }
    }

    Ok(())
}

/// Initialize logging from TranscoderConfig
pub fn init_from_config(config: &TranscoderConfig) -> Result<(), LoggingError> {
    init_logging(config.log_level, config.log_format)
}

/// Logging errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to initialize logging: {0}")]
    InitFailed(String),
}
