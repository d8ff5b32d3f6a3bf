//! Proof Transcoder
//!
//! Maps a prover-side proof onto the byte layout expected by the Solana
//! alt_bn128 verifier.
//!
//! G1 coordinates are little-endian encoded and byte-reversed one at a
//! time. G2 coordinates are little-endian encoded as `c0 || c1` and the
//! whole 64-byte block is reversed, which yields `BE(c1) || BE(c0)`: the
//! sub-element order flips together with the byte order. The layout has
//! only been checked against the groth16-solana verifier.

use serde_json::Value;
use tracing::debug;

use super::types::{EncodedProof, Fq2, G1Point, G2Point, Proof, G1_SIZE, G2_SIZE};
use crate::common::error::Result;
use crate::field::{Endianness, EncodingError, FieldCheck, FieldElement, Modulus, FIELD_ELEMENT_SIZE};

/// Converts proofs between prover coordinates and verifier bytes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProofTranscoder {
    field_check: FieldCheck,
}

impl ProofTranscoder {
    pub fn new(field_check: FieldCheck) -> Self {
        Self { field_check }
    }

    pub fn field_check(&self) -> FieldCheck {
        self.field_check
    }

    /// Encode a parsed proof into `proof_a`, `proof_b`, `proof_c`
    pub fn transcode(&self, proof: &Proof) -> std::result::Result<EncodedProof, EncodingError> {
        self.check_g1(&proof.a)?;
        self.check_g2(&proof.b)?;
        self.check_g1(&proof.c)?;

        Ok(EncodedProof {
            proof_a: encode_g1(&proof.a),
            proof_b: encode_g2(&proof.b),
            proof_c: encode_g1(&proof.c),
        })
    }

    /// Encode a snarkjs `proof.json` document
    pub fn transcode_json(&self, value: &Value) -> Result<EncodedProof> {
        let proof = Proof::from_json(value)?;
        let encoded = self.transcode(&proof)?;

        debug!(
            target: "transcoder::proof",
            field_check = ?self.field_check,
            proof_a = %hex::encode(encoded.proof_a),
            "proof transcoded"
        );

        Ok(encoded)
    }

    /// Encode a snarkjs `proof.json` document given as text
    pub fn transcode_str(&self, json: &str) -> Result<EncodedProof> {
        let value: Value = serde_json::from_str(json)?;
        self.transcode_json(&value)
    }

    fn check_g1(&self, point: &G1Point) -> std::result::Result<(), EncodingError> {
        self.field_check.apply(&point.x, Modulus::Bn254Base)?;
        self.field_check.apply(&point.y, Modulus::Bn254Base)
    }

    fn check_g2(&self, point: &G2Point) -> std::result::Result<(), EncodingError> {
        for c in [&point.x.c0, &point.x.c1, &point.y.c0, &point.y.c1] {
            self.field_check.apply(c, Modulus::Bn254Base)?;
        }
        Ok(())
    }
}

// ============================================================================
// Point Encoding
// ============================================================================

/// `BE(x) || BE(y)`
pub fn encode_g1(point: &G1Point) -> [u8; G1_SIZE] {
    let mut out = [0u8; G1_SIZE];
    out[..32].copy_from_slice(&point.x.to_be32());
    out[32..].copy_from_slice(&point.y.to_be32());
    out
}

/// `BE(x_c1) || BE(x_c0) || BE(y_c1) || BE(y_c0)`
pub fn encode_g2(point: &G2Point) -> [u8; G2_SIZE] {
    let mut out = [0u8; G2_SIZE];
    out[..64].copy_from_slice(&encode_fq2(&point.x));
    out[64..].copy_from_slice(&encode_fq2(&point.y));
    out
}

fn encode_fq2(coord: &Fq2) -> [u8; 64] {
    let mut block = [0u8; 64];
    block[..32].copy_from_slice(&coord.c0.to_le32());
    block[32..].copy_from_slice(&coord.c1.to_le32());
    block.reverse();
    block
}

pub fn decode_g1(bytes: &[u8; G1_SIZE]) -> std::result::Result<G1Point, EncodingError> {
    Ok(G1Point {
        x: FieldElement::from_bytes(&bytes[..32], Endianness::Big)?,
        y: FieldElement::from_bytes(&bytes[32..], Endianness::Big)?,
    })
}

pub fn decode_g2(bytes: &[u8; G2_SIZE]) -> std::result::Result<G2Point, EncodingError> {
    Ok(G2Point {
        x: decode_fq2(&bytes[..64])?,
        y: decode_fq2(&bytes[64..])?,
    })
}

fn decode_fq2(block: &[u8]) -> std::result::Result<Fq2, EncodingError> {
    let (c1, c0) = block.split_at(FIELD_ELEMENT_SIZE);
    Ok(Fq2 {
        c0: FieldElement::from_bytes(c0, Endianness::Big)?,
        c1: FieldElement::from_bytes(c1, Endianness::Big)?,
    })
}

impl EncodedProof {
    /// Recover prover coordinates from the verifier layout
    pub fn to_proof(&self) -> std::result::Result<Proof, EncodingError> {
        Ok(Proof {
            a: decode_g1(&self.proof_a)?,
            b: decode_g2(&self.proof_b)?,
            c: decode_g1(&self.proof_c)?,
        })
    }
}
