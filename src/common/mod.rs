//! Common Infrastructure Module
//!
//! This module contains:
//! - Configuration loading from environment variables
//! - Structured logging setup
//! - Common error types

pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use config::{ConfigError, TranscoderConfig};
pub use error::{Result, TranscoderError};
pub use logging::{
    init_from_config, init_logging, log_decode_event, log_io_event, log_transcode_event, ErrorDetails,
    EventCategory, LogEvent, LogFormat, LogLevel, LoggingError,
};
