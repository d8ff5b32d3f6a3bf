//! Field Element Codec
//!
//! Converts snarkjs decimal-string field elements to and from fixed-width
//! byte arrays.
//!
//! # Bounds
//!
//! A [`FieldElement`] is an unsigned integer of at most 256 bits. Its
//! canonical wire form is exactly 32 bytes, zero-padded, in either byte
//! order. Encoding into a narrower width fails instead of truncating.
//!
//! Curve moduli are only enforced when asked for through [`FieldCheck`]:
//! - BN254 base field `p` for G1/G2 coordinates
//! - BN254 scalar field `r` for public inputs

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use num_traits::Zero;
use thiserror::Error;

use crate::common::config::ConfigError;

// ============================================================================
// Constants
// ============================================================================

/// Size of one encoded field element
pub const FIELD_ELEMENT_SIZE: usize = 32;

/// Largest representable value is 2^256 - 1
pub const MAX_BITS: u64 = 256;

/// BN254 base field modulus p (Fq), big-endian
pub const BN254_BASE_MODULUS: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x97, 0x81, 0x6a, 0x91, 0x68, 0x71, 0xca, 0x8d, 0x3c, 0x20, 0x8c, 0x16, 0xd8, 0x7c, 0xfd, 0x47,
];

/// BN254 scalar field modulus r (Fr), big-endian
pub const BN254_SCALAR_MODULUS: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91, 0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00, 0x00, 0x01,
];

// ============================================================================
// Errors
// ============================================================================

/// Numeric value cannot be represented in the requested encoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("invalid decimal string: {0:?}")]
    InvalidDecimal(String),

    #[error("value needs {needed} bytes, exceeds width of {width}")]
    Overflow { needed: usize, width: usize },

    #[error("value is not below the {modulus} modulus")]
    NotInField { modulus: Modulus },
}

// ============================================================================
// Encoding Parameters
// ============================================================================

/// Byte order of an encoded field element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

/// Prime moduli a field element can be checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modulus {
    /// Fq - curve point coordinates
    Bn254Base,
    /// Fr - scalars and public inputs
    Bn254Scalar,
}

impl Modulus {
    /// Big-endian bytes of the modulus
    pub fn be_bytes(&self) -> &'static [u8; 32] {
        match self {
            Modulus::Bn254Base => &BN254_BASE_MODULUS,
            Modulus::Bn254Scalar => &BN254_SCALAR_MODULUS,
        }
    }

    pub fn value(&self) -> BigUint {
        BigUint::from_bytes_be(self.be_bytes())
    }
}

impl fmt::Display for Modulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modulus::Bn254Base => write!(f, "BN254 base field"),
            Modulus::Bn254Scalar => write!(f, "BN254 scalar field"),
        }
    }
}

/// How strictly field elements are validated before encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldCheck {
    /// Only the 256-bit width bound
    #[default]
    Width,
    /// Width bound plus the BN254 modulus of the element's role
    Modulus,
}

impl FieldCheck {
    /// Validate `value` for a slot bounded by `modulus`
    pub fn apply(&self, value: &FieldElement, modulus: Modulus) -> Result<(), EncodingError> {
        match self {
            FieldCheck::Width => Ok(()),
            FieldCheck::Modulus => value.check_modulus(modulus),
        }
    }
}

impl FromStr for FieldCheck {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "width" => Ok(FieldCheck::Width),
            "modulus" | "strict" => Ok(FieldCheck::Modulus),
            _ => Err(ConfigError::InvalidValue(
                "TRANSCODER_FIELD_CHECK".to_string(),
                format!("unknown field check: {} (use 'width' or 'modulus')", s),
            )),
        }
    }
}

// ============================================================================
// Field Element
// ============================================================================

/// Unsigned integer of at most 256 bits
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FieldElement(BigUint);

impl FieldElement {
    /// Parse an unsigned decimal string (ASCII digits only)
    pub fn from_decimal(s: &str) -> Result<Self, EncodingError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EncodingError::InvalidDecimal(s.to_string()));
        }

        let value = BigUint::parse_bytes(s.as_bytes(), 10)
            .ok_or_else(|| EncodingError::InvalidDecimal(s.to_string()))?;

        Self::bounded(value)
    }

    /// Interpret `bytes` as an unsigned integer in the given byte order
    pub fn from_bytes(bytes: &[u8], endianness: Endianness) -> Result<Self, EncodingError> {
        let value = match endianness {
            Endianness::Little => BigUint::from_bytes_le(bytes),
            Endianness::Big => BigUint::from_bytes_be(bytes),
        };

        Self::bounded(value)
    }

    pub fn from_u64(value: u64) -> Self {
        Self(BigUint::from(value))
    }

    fn bounded(value: BigUint) -> Result<Self, EncodingError> {
        if value.bits() > MAX_BITS {
            return Err(EncodingError::Overflow {
                needed: byte_len(&value),
                width: FIELD_ELEMENT_SIZE,
            });
        }
        Ok(Self(value))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Minimal number of bytes needed to hold the value (0 for zero)
    pub fn byte_len(&self) -> usize {
        byte_len(&self.0)
    }

    pub fn to_decimal(&self) -> String {
        self.0.to_str_radix(10)
    }

    /// Little-endian encoding, zero-padded to `width` bytes
    pub fn to_bytes_le(&self, width: usize) -> Result<Vec<u8>, EncodingError> {
        let needed = self.byte_len();
        if needed > width {
            return Err(EncodingError::Overflow { needed, width });
        }

        let mut out = vec![0u8; width];
        if needed > 0 {
            let le = self.0.to_bytes_le();
            out[..le.len()].copy_from_slice(&le);
        }
        Ok(out)
    }

    /// Big-endian encoding: the byte-reverse of [`Self::to_bytes_le`]
    pub fn to_bytes_be(&self, width: usize) -> Result<Vec<u8>, EncodingError> {
        let mut out = self.to_bytes_le(width)?;
        out.reverse();
        Ok(out)
    }

    /// Canonical 32-byte little-endian form
    pub fn to_le32(&self) -> [u8; FIELD_ELEMENT_SIZE] {
        let mut out = [0u8; FIELD_ELEMENT_SIZE];
        // bits() <= 256 is enforced on construction
        let le = self.0.to_bytes_le();
        out[..le.len()].copy_from_slice(&le);
        out
    }

    /// Canonical 32-byte big-endian form
    pub fn to_be32(&self) -> [u8; FIELD_ELEMENT_SIZE] {
        let mut out = self.to_le32();
        out.reverse();
        out
    }

    /// Fails unless the value is strictly below `modulus`
    pub fn check_modulus(&self, modulus: Modulus) -> Result<(), EncodingError> {
        if self.0 >= modulus.value() {
            return Err(EncodingError::NotInField { modulus });
        }
        Ok(())
    }
}

fn byte_len(value: &BigUint) -> usize {
    value.bits().div_ceil(8) as usize
}

impl FromStr for FieldElement {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_decimal(s)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

// ============================================================================
// Codec Functions
// ============================================================================

/// Parse an unsigned decimal string into a field element
pub fn from_decimal(s: &str) -> Result<FieldElement, EncodingError> {
    FieldElement::from_decimal(s)
}

/// Little-endian, zero-padded to `width` bytes
pub fn to_bytes_le(value: &FieldElement, width: usize) -> Result<Vec<u8>, EncodingError> {
    value.to_bytes_le(width)
}

/// Big-endian, zero-padded to `width` bytes
pub fn to_bytes_be(value: &FieldElement, width: usize) -> Result<Vec<u8>, EncodingError> {
    value.to_bytes_be(width)
}
