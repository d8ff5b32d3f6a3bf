//! Prover Artifacts
//!
//! Reads snarkjs `proof.json` / `public.json` files and writes encoded
//! instruction data. Only the CLI and callers touch the filesystem; the
//! encoding modules stay pure.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde_json::Value;
use crate::common::config::ConfigError;
use crate::common::error::Result;
use crate::common::logging::log_io_event;

/// Output encoding for instruction data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Binary,
    #[default]
    Hex,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binary" | "bin" => Ok(OutputFormat::Binary),
            "hex" => Ok(OutputFormat::Hex),
            _ => Err(ConfigError::InvalidValue(
                "format".to_string(),
                format!("unknown output format: {} (use 'binary' or 'hex')", s),
            )),
        }
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)?;
    let value = serde_json::from_str(&text)?;
    log_io_event("read", path, text.len());
    Ok(value)
}

/// Load a snarkjs `proof.json`
pub fn load_proof(path: impl AsRef<Path>) -> Result<Value> {
    read_json(path.as_ref())
}

/// Load a snarkjs `public.json`
pub fn load_public_signals(path: impl AsRef<Path>) -> Result<Value> {
    read_json(path.as_ref())
}

/// Render instruction data in the given format
pub fn render(data: &[u8], format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Binary => data.to_vec(),
        OutputFormat::Hex => hex::encode(data).into_bytes(),
    }
}

/// Write instruction data to a file
pub fn write_instruction(path: impl AsRef<Path>, data: &[u8], format: OutputFormat) -> Result<()> {
    let path = path.as_ref();
    let rendered = render(data, format);
    fs::write(path, &rendered)?;
    log_io_event("written", path, rendered.len());
    Ok(())
}

/// Read instruction data from a file, accepting raw bytes or hex text
pub fn read_instruction(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    log_io_event("read", path, bytes.len());

    match std::str::from_utf8(&bytes) {
        Ok(text) if looks_like_hex(strip_hex_prefix(text)) => decode_hex(text),
        _ => Ok(bytes),
    }
}

/// Decode hex text, with optional surrounding whitespace and `0x` prefix
pub fn decode_hex(text: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(strip_hex_prefix(text))?)
}

fn strip_hex_prefix(text: &str) -> &str {
    let text = text.trim();
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}

// Raw instruction data starts with opcode byte 0x00, never a hex digit.
fn looks_like_hex(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_hexdigit())
}
