//! Public Input Encoder
//!
//! Public signals are bound positionally to the circuit's declared public
//! outputs, so the order of `public.json` is kept as-is. Each signal becomes
//! one 32-byte big-endian block.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::common::error::Result;
use crate::field::{EncodingError, Endianness, FieldCheck, FieldElement, Modulus, FIELD_ELEMENT_SIZE};
use crate::instruction::InstructionError;

/// Encodes public signals into verifier input blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicInputEncoder {
    field_check: FieldCheck,
}

impl PublicInputEncoder {
    pub fn new(field_check: FieldCheck) -> Self {
        Self { field_check }
    }

    /// One big-endian block per signal, in input order
    pub fn encode<S: AsRef<str>>(
        &self,
        signals: &[S],
    ) -> std::result::Result<Vec<[u8; FIELD_ELEMENT_SIZE]>, EncodingError> {
        signals
            .iter()
            .map(|signal| {
                let value = FieldElement::from_decimal(signal.as_ref())?;
                self.field_check.apply(&value, Modulus::Bn254Scalar)?;
                Ok(value.to_be32())
            })
            .collect()
    }

    /// Blocks concatenated into the `inputs` byte sequence
    pub fn encode_flat<S: AsRef<str>>(&self, signals: &[S]) -> std::result::Result<Vec<u8>, EncodingError> {
        let blocks = self.encode(signals)?;
        debug!(target: "transcoder::inputs", count = blocks.len(), "public inputs encoded");
        Ok(blocks.concat())
    }

    /// Encode a snarkjs `public.json` document (array of decimal strings)
    pub fn encode_json(&self, value: &Value) -> Result<Vec<u8>> {
        let signals = Vec::<String>::deserialize(value)?;
        Ok(self.encode_flat(&signals)?)
    }

    /// Split a flat `inputs` buffer back into field elements
    pub fn decode(inputs: &[u8]) -> Result<Vec<FieldElement>> {
        if inputs.len() % FIELD_ELEMENT_SIZE != 0 {
            return Err(InstructionError::MisalignedInputs(inputs.len()).into());
        }

        let mut values = Vec::with_capacity(inputs.len() / FIELD_ELEMENT_SIZE);
        for block in inputs.chunks_exact(FIELD_ELEMENT_SIZE) {
            values.push(FieldElement::from_bytes(block, Endianness::Big)?);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::TranscoderError;
    use serde_json::json;

    #[test]
    fn test_single_signal() {
        let blocks = PublicInputEncoder::default().encode(&["12"]).unwrap();

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0][31], 0x0c);
        assert!(blocks[0][..31].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_order_is_preserved() {
        let flat = PublicInputEncoder::default()
            .encode_flat(&["3", "1", "2"])
            .unwrap();

        assert_eq!(flat.len(), 96);
        assert_eq!([flat[31], flat[63], flat[95]], [3, 1, 2]);
    }

    #[test]
    fn test_empty_signals() {
        let flat = PublicInputEncoder::default().encode_flat::<&str>(&[]).unwrap();
        assert!(flat.is_empty());
    }

    #[test]
    fn test_invalid_signal_fails_whole_batch() {
        let result = PublicInputEncoder::default().encode(&["1", "two", "3"]);
        assert!(matches!(result, Err(EncodingError::InvalidDecimal(_))));
    }

    #[test]
    fn test_scalar_modulus_check() {
        let r = "21888242871839275222246405745257275088548364400416034343698204186575808495617";

        assert!(PublicInputEncoder::new(FieldCheck::Width).encode(&[r]).is_ok());
        assert_eq!(
            PublicInputEncoder::new(FieldCheck::Modulus).encode(&[r]),
            Err(EncodingError::NotInField { modulus: Modulus::Bn254Scalar })
        );
    }

    #[test]
    fn test_encode_json() {
        let flat = PublicInputEncoder::default()
            .encode_json(&json!(["12", "7"]))
            .unwrap();
        assert_eq!(flat.len(), 64);

        let err = PublicInputEncoder::default()
            .encode_json(&json!([12]))
            .unwrap_err();
        assert!(matches!(err, TranscoderError::Json(_)));
    }

    #[test]
    fn test_decode() {
        let flat = PublicInputEncoder::default().encode_flat(&["12", "0"]).unwrap();
        let values = PublicInputEncoder::decode(&flat).unwrap();
        assert_eq!(values, vec![FieldElement::from_u64(12), FieldElement::from_u64(0)]);

        assert!(matches!(
            PublicInputEncoder::decode(&flat[..40]),
            Err(TranscoderError::Instruction(InstructionError::MisalignedInputs(40)))
        ));
    }
}
