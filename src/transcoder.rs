//! Transcoder
//!
//! Wires the proof transcoder, public input encoder and instruction codec
//! behind one configured entry point.

use std::time::Instant;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::common::config::TranscoderConfig;
use crate::common::error::{Result, TranscoderError};
use crate::common::logging::{log_decode_event, log_transcode_event};
use crate::field::{FieldCheck, FieldElement};
use crate::inputs::PublicInputEncoder;
use crate::instruction::VerifyInstruction;
use crate::proof::{G1Point, G2Point, ProofTranscoder};

/// Builds and inspects verify instructions
#[derive(Debug, Clone, Copy, Default)]
pub struct Transcoder {
    proofs: ProofTranscoder,
    inputs: PublicInputEncoder,
}

impl Transcoder {
    pub fn new(field_check: FieldCheck) -> Self {
        Self {
            proofs: ProofTranscoder::new(field_check),
            inputs: PublicInputEncoder::new(field_check),
        }
    }

    pub fn from_config(config: &TranscoderConfig) -> Self {
        Self::new(config.field_check)
    }

    pub fn field_check(&self) -> FieldCheck {
        self.proofs.field_check()
    }

    /// Build a verify instruction from `proof.json` and `public.json` values
    pub fn build_instruction(&self, proof: &Value, public_signals: &Value) -> Result<VerifyInstruction> {
        let encoded = self.proofs.transcode_json(proof)?;
        let inputs = self.inputs.encode_json(public_signals)?;

        Ok(VerifyInstruction::builder()
            .inputs(inputs)
            .proof(&encoded)
            .build()?)
    }

    /// Build and serialize a verify instruction
    #[instrument(skip_all, target = "transcoder::request")]
    pub fn encode_request(&self, proof: &Value, public_signals: &Value) -> Result<Vec<u8>> {
        let started = Instant::now();

        let result = self
            .build_instruction(proof, public_signals)
            .and_then(|ix| Ok((ix.input_count(), ix.encode()?)));
        let elapsed = started.elapsed().as_micros() as u64;

        match result {
            Ok((input_count, data)) => {
                log_transcode_event(input_count, data.len(), elapsed, None);
                Ok(data)
            }
            Err(e) => {
                log_transcode_event(0, 0, elapsed, Some((e.error_code(), &e.to_string())));
                Err(e)
            }
        }
    }

    /// Decode instruction data into a human-readable summary
    pub fn inspect(&self, data: &[u8]) -> Result<InstructionSummary> {
        let result = VerifyInstruction::decode(data)
            .map_err(TranscoderError::from)
            .and_then(|ix| InstructionSummary::from_instruction(&ix));

        match &result {
            Ok(summary) => {
                debug!(target: "transcoder::request", inputs = summary.public_inputs.len(), "instruction inspected");
                log_decode_event(data.len(), None);
            }
            Err(e) => log_decode_event(data.len(), Some((e.error_code(), &e.to_string()))),
        }

        result
    }
}

// ============================================================================
// Summaries
// ============================================================================

/// Decoded view of a verify instruction, values as decimal strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionSummary {
    pub opcode: u8,
    pub encoded_len: usize,
    pub public_inputs: Vec<String>,
    pub proof: ProofSummary,
}

/// Proof coordinates in snarkjs order (`pi_b` pairs as `[c0, c1]`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProofSummary {
    pub pi_a: [String; 2],
    pub pi_b: [[String; 2]; 2],
    pub pi_c: [String; 2],
}

impl InstructionSummary {
    pub fn from_instruction(ix: &VerifyInstruction) -> Result<Self> {
        let public_inputs = PublicInputEncoder::decode(ix.inputs())?
            .iter()
            .map(FieldElement::to_decimal)
            .collect();
        let proof = ix.proof().to_proof()?;

        Ok(Self {
            opcode: ix.opcode().into(),
            encoded_len: ix.encoded_len(),
            public_inputs,
            proof: ProofSummary {
                pi_a: g1_decimals(&proof.a),
                pi_b: g2_decimals(&proof.b),
                pi_c: g1_decimals(&proof.c),
            },
        })
    }
}

fn g1_decimals(point: &G1Point) -> [String; 2] {
    [point.x.to_decimal(), point.y.to_decimal()]
}

fn g2_decimals(point: &G2Point) -> [[String; 2]; 2] {
    [
        [point.x.c0.to_decimal(), point.x.c1.to_decimal()],
        [point.y.c0.to_decimal(), point.y.c1.to_decimal()],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::{DecodeError, HEADER_SIZE};
    use serde_json::json;

    fn proof() -> Value {
        json!({
            "pi_a": ["1", "2", "1"],
            "pi_b": [["3", "4"], ["5", "6"], ["1", "0"]],
            "pi_c": ["7", "8", "1"],
            "protocol": "groth16",
            "curve": "bn128"
        })
    }

    #[test]
    fn test_encode_request_size() {
        let data = Transcoder::default()
            .encode_request(&proof(), &json!(["12", "34"]))
            .unwrap();
        assert_eq!(data.len(), HEADER_SIZE + 64 + 256);
        assert_eq!(data[0], 0);
    }

    #[test]
    fn test_inspect_recovers_decimals() {
        let transcoder = Transcoder::default();
        let data = transcoder.encode_request(&proof(), &json!(["12"])).unwrap();
        let summary = transcoder.inspect(&data).unwrap();

        assert_eq!(summary.opcode, 0);
        assert_eq!(summary.encoded_len, data.len());
        assert_eq!(summary.public_inputs, vec!["12".to_string()]);
        assert_eq!(summary.proof.pi_a, ["1".to_string(), "2".to_string()]);
        assert_eq!(summary.proof.pi_b[0], ["3".to_string(), "4".to_string()]);
        assert_eq!(summary.proof.pi_b[1], ["5".to_string(), "6".to_string()]);
        assert_eq!(summary.proof.pi_c, ["7".to_string(), "8".to_string()]);
    }

    #[test]
    fn test_inspect_truncated_buffer() {
        let transcoder = Transcoder::default();
        let data = transcoder.encode_request(&proof(), &json!(["12"])).unwrap();

        let err = transcoder.inspect(&data[..data.len() - 1]).unwrap_err();
        assert!(matches!(err, TranscoderError::Decode(DecodeError::Truncated { .. })));
        assert_eq!(err.error_code(), "DECODE_ERROR");
    }

    #[test]
    fn test_bad_signal_fails_request() {
        let err = Transcoder::default()
            .encode_request(&proof(), &json!(["-1"]))
            .unwrap_err();
        assert!(matches!(err, TranscoderError::Encoding(_)));
    }

    #[test]
    fn test_request_failures_are_input_errors() {
        let transcoder = Transcoder::default();
        let failures = [
            transcoder.encode_request(&proof(), &json!(["-1"])).unwrap_err(),
            transcoder.encode_request(&proof(), &json!([12])).unwrap_err(),
            transcoder.encode_request(&json!({ "pi_a": ["1", "2"] }), &json!([])).unwrap_err(),
            transcoder.inspect(&[0x07]).unwrap_err(),
            transcoder.inspect(&[]).unwrap_err(),
        ];

        for err in failures {
            assert!(err.is_input_error(), "{} is not an input error", err.error_code());
        }
    }

    #[test]
    fn test_from_config() {
        let config = TranscoderConfig {
            field_check: FieldCheck::Modulus,
            ..TranscoderConfig::default()
        };
        assert_eq!(Transcoder::from_config(&config).field_check(), FieldCheck::Modulus);
    }
}
