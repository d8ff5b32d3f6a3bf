//! snarkjs `proof.json` parsing
//!
//! ```json
//! {
//!   "pi_a": ["<x>", "<y>", "1"],
//!   "pi_b": [["<x_c0>", "<x_c1>"], ["<y_c0>", "<y_c1>"], ["1", "0"]],
//!   "pi_c": ["<x>", "<y>", "1"],
//!   "protocol": "groth16",
//!   "curve": "bn128"
//! }
//! ```
//!
//! The trailing projective `z` entries are optional and ignored. Shape is
//! checked for the whole document before any number is parsed.

use serde_json::{Map, Value};
use thiserror::Error;

use super::types::{Fq2, G1Point, G2Point, Proof};
use crate::field::{EncodingError, FieldElement};

/// Proof JSON missing required fields or with incorrect nesting/arity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedProofError {
    #[error("proof is not a JSON object")]
    NotAnObject,

    #[error("missing proof field `{0}`")]
    MissingField(&'static str),

    #[error("`{0}` is not an array")]
    NotAnArray(String),

    #[error("`{path}` has {actual} elements, expected {expected}")]
    WrongArity {
        path: String,
        expected: &'static str,
        actual: usize,
    },

    #[error("`{0}` is not a string")]
    NotAString(String),

    #[error("unsupported proof protocol: {0}")]
    UnsupportedProtocol(String),

    #[error("unsupported curve: {0}")]
    UnsupportedCurve(String),
}

/// Proof coordinates as decimal strings, borrowed from the JSON document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawProof<'a> {
    pub a: [&'a str; 2],
    /// `[[x_c0, x_c1], [y_c0, y_c1]]`
    pub b: [[&'a str; 2]; 2],
    pub c: [&'a str; 2],
}

impl<'a> RawProof<'a> {
    /// Check the document shape and borrow its coordinates
    pub fn from_json(value: &'a Value) -> Result<Self, MalformedProofError> {
        let obj = value.as_object().ok_or(MalformedProofError::NotAnObject)?;

        check_metadata(obj)?;

        Ok(Self {
            a: g1(required(obj, "pi_a")?, "pi_a")?,
            b: g2(required(obj, "pi_b")?, "pi_b")?,
            c: g1(required(obj, "pi_c")?, "pi_c")?,
        })
    }

    /// Parse every coordinate into a field element
    pub fn to_proof(&self) -> Result<Proof, EncodingError> {
        Ok(Proof {
            a: parse_g1(&self.a)?,
            b: G2Point {
                x: parse_fq2(&self.b[0])?,
                y: parse_fq2(&self.b[1])?,
            },
            c: parse_g1(&self.c)?,
        })
    }
}

fn parse_g1(coords: &[&str; 2]) -> Result<G1Point, EncodingError> {
    Ok(G1Point {
        x: FieldElement::from_decimal(coords[0])?,
        y: FieldElement::from_decimal(coords[1])?,
    })
}

fn parse_fq2(coords: &[&str; 2]) -> Result<Fq2, EncodingError> {
    Ok(Fq2 {
        c0: FieldElement::from_decimal(coords[0])?,
        c1: FieldElement::from_decimal(coords[1])?,
    })
}

// ============================================================================
// Shape Helpers
// ============================================================================

fn check_metadata(obj: &Map<String, Value>) -> Result<(), MalformedProofError> {
    if let Some(protocol) = obj.get("protocol") {
        if protocol.as_str() != Some("groth16") {
            return Err(MalformedProofError::UnsupportedProtocol(protocol.to_string()));
        }
    }

    if let Some(curve) = obj.get("curve") {
        let supported = curve
            .as_str()
            .map(|c| matches!(c.to_lowercase().as_str(), "bn128" | "bn254"))
            .unwrap_or(false);
        if !supported {
            return Err(MalformedProofError::UnsupportedCurve(curve.to_string()));
        }
    }

    Ok(())
}

fn required<'a>(
    obj: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a Value, MalformedProofError> {
    obj.get(name).ok_or(MalformedProofError::MissingField(name))
}

fn array<'a>(value: &'a Value, path: &str) -> Result<&'a [Value], MalformedProofError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| MalformedProofError::NotAnArray(path.to_string()))
}

fn string<'a>(value: &'a Value, path: String) -> Result<&'a str, MalformedProofError> {
    value.as_str().ok_or(MalformedProofError::NotAString(path))
}

/// `[x, y]` or `[x, y, z]`
fn g1<'a>(value: &'a Value, name: &str) -> Result<[&'a str; 2], MalformedProofError> {
    let items = array(value, name)?;
    if !(2..=3).contains(&items.len()) {
        return Err(MalformedProofError::WrongArity {
            path: name.to_string(),
            expected: "2 or 3",
            actual: items.len(),
        });
    }

    Ok([
        string(&items[0], format!("{}[0]", name))?,
        string(&items[1], format!("{}[1]", name))?,
    ])
}

/// `[c0, c1]`
fn fq2<'a>(value: &'a Value, path: &str) -> Result<[&'a str; 2], MalformedProofError> {
    let items = pair(value, path)?;

    Ok([
        string(&items[0], format!("{}[0]", path))?,
        string(&items[1], format!("{}[1]", path))?,
    ])
}

fn pair<'a>(value: &'a Value, path: &str) -> Result<&'a [Value], MalformedProofError> {
    let items = array(value, path)?;
    if items.len() != 2 {
        return Err(MalformedProofError::WrongArity {
            path: path.to_string(),
            expected: "2",
            actual: items.len(),
        });
    }
    Ok(items)
}

/// `[x, y]` or `[x, y, z]` where each coordinate is an `[c0, c1]` pair
fn g2<'a>(value: &'a Value, name: &str) -> Result<[[&'a str; 2]; 2], MalformedProofError> {
    let items = array(value, name)?;
    if !(2..=3).contains(&items.len()) {
        return Err(MalformedProofError::WrongArity {
            path: name.to_string(),
            expected: "2 or 3",
            actual: items.len(),
        });
    }

    let x = fq2(&items[0], &format!("{}[0]", name))?;
    let y = fq2(&items[1], &format!("{}[1]", name))?;
    if let Some(z) = items.get(2) {
        pair(z, &format!("{}[2]", name))?;
    }

    Ok([x, y])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "pi_a": ["1", "2", "1"],
            "pi_b": [["3", "4"], ["5", "6"], ["1", "0"]],
            "pi_c": ["7", "8", "1"],
            "protocol": "groth16",
            "curve": "bn128"
        })
    }

    #[test]
    fn test_parses_snarkjs_shape() {
        let value = sample();
        let raw = RawProof::from_json(&value).unwrap();

        assert_eq!(raw.a, ["1", "2"]);
        assert_eq!(raw.b, [["3", "4"], ["5", "6"]]);
        assert_eq!(raw.c, ["7", "8"]);

        let proof = raw.to_proof().unwrap();
        assert_eq!(proof.b.x.c1, FieldElement::from_u64(4));
        assert_eq!(proof.b.y.c0, FieldElement::from_u64(5));
    }

    #[test]
    fn test_affine_form_without_z() {
        let value = json!({
            "pi_a": ["1", "2"],
            "pi_b": [["3", "4"], ["5", "6"]],
            "pi_c": ["7", "8"]
        });
        assert!(RawProof::from_json(&value).is_ok());
    }

    #[test]
    fn test_missing_fields() {
        for name in ["pi_a", "pi_b", "pi_c"] {
            let mut value = sample();
            value.as_object_mut().unwrap().remove(name);
            assert_eq!(
                RawProof::from_json(&value),
                Err(MalformedProofError::MissingField(name))
            );
        }
    }

    #[test]
    fn test_wrong_arity() {
        let mut value = sample();
        value["pi_a"] = json!(["1"]);
        assert!(matches!(
            RawProof::from_json(&value),
            Err(MalformedProofError::WrongArity { actual: 1, .. })
        ));

        let mut value = sample();
        value["pi_c"] = json!(["1", "2", "3", "4"]);
        assert!(matches!(
            RawProof::from_json(&value),
            Err(MalformedProofError::WrongArity { actual: 4, .. })
        ));

        let mut value = sample();
        value["pi_b"] = json!([["3", "4", "9"], ["5", "6"]]);
        assert_eq!(
            RawProof::from_json(&value),
            Err(MalformedProofError::WrongArity {
                path: "pi_b[0]".to_string(),
                expected: "2",
                actual: 3,
            })
        );

        let mut value = sample();
        value["pi_b"] = json!([["3", "4"], ["5", "6"], ["1"]]);
        assert!(RawProof::from_json(&value).is_err());
    }

    #[test]
    fn test_wrong_nesting() {
        let mut value = sample();
        value["pi_b"] = json!(["3", "4"]);
        assert_eq!(
            RawProof::from_json(&value),
            Err(MalformedProofError::NotAnArray("pi_b[0]".to_string()))
        );

        let mut value = sample();
        value["pi_a"] = json!([1, 2, 1]);
        assert_eq!(
            RawProof::from_json(&value),
            Err(MalformedProofError::NotAString("pi_a[0]".to_string()))
        );

        assert_eq!(
            RawProof::from_json(&json!(["1", "2"])),
            Err(MalformedProofError::NotAnObject)
        );
    }

    #[test]
    fn test_metadata_checks() {
        let mut value = sample();
        value["protocol"] = json!("plonk");
        assert!(matches!(
            RawProof::from_json(&value),
            Err(MalformedProofError::UnsupportedProtocol(_))
        ));

        let mut value = sample();
        value["curve"] = json!("bls12381");
        assert!(matches!(
            RawProof::from_json(&value),
            Err(MalformedProofError::UnsupportedCurve(_))
        ));

        let mut value = sample();
        value["curve"] = json!("BN254");
        assert!(RawProof::from_json(&value).is_ok());
    }

    #[test]
    fn test_bad_decimal_is_encoding_error() {
        let mut value = sample();
        value["pi_c"] = json!(["7", "0x08"]);
        let raw = RawProof::from_json(&value).unwrap();
        assert!(matches!(raw.to_proof(), Err(EncodingError::InvalidDecimal(_))));
    }
}
