//! Common Error Types
//!
//! Every module keeps its own error enum; this root type wraps them so
//! callers can use a single `Result`.

use thiserror::Error;

use crate::field::EncodingError;
use crate::instruction::{DecodeError, InstructionError};
use crate::proof::MalformedProofError;

/// Root error type for the transcoder
#[derive(Debug, Error)]
pub enum TranscoderError {
    /// Field element parsing or width errors
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Proof document does not have the expected shape
    #[error("malformed proof: {0}")]
    MalformedProof(#[from] MalformedProofError),

    /// Instruction buffer could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Instruction fields are invalid
    #[error("instruction error: {0}")]
    Instruction(#[from] InstructionError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),

    /// Logging errors
    #[error("logging error: {0}")]
    Logging(#[from] super::logging::LoggingError),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Hex errors
    #[error("hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscoderError {
    /// Check if the error was caused by the supplied proof, signals or buffer
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            TranscoderError::Encoding(_)
                | TranscoderError::MalformedProof(_)
                | TranscoderError::Decode(_)
                | TranscoderError::Instruction(_)
                | TranscoderError::Json(_)
                | TranscoderError::Hex(_)
        )
    }

    /// Get error code for structured logs
    pub fn error_code(&self) -> &'static str {
        match self {
            TranscoderError::Encoding(_) => "ENCODING_ERROR",
            TranscoderError::MalformedProof(_) => "MALFORMED_PROOF",
            TranscoderError::Decode(_) => "DECODE_ERROR",
            TranscoderError::Instruction(_) => "INSTRUCTION_ERROR",
            TranscoderError::Config(_) => "CONFIG_ERROR",
            TranscoderError::Logging(_) => "LOGGING_ERROR",
            TranscoderError::Json(_) => "JSON_ERROR",
            TranscoderError::Hex(_) => "HEX_ERROR",
            TranscoderError::Io(_) => "IO_ERROR",
        }
    }
}

/// Result type alias using TranscoderError
pub type Result<T> = std::result::Result<T, TranscoderError>;
