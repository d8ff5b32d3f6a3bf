//! Groth16 Proof Module
//!
//! Parsing of snarkjs proofs and transcoding into verifier bytes.

pub mod json;
pub mod transcoder;
pub mod types;

// Re-exports for convenience
pub use json::{MalformedProofError, RawProof};
pub use transcoder::{decode_g1, decode_g2, encode_g1, encode_g2, ProofTranscoder};
pub use types::{EncodedProof, Fq2, G1Point, G2Point, Proof, G1_SIZE, G2_SIZE, PROOF_SIZE};

use serde_json::Value;

use crate::common::error::Result;

impl Proof {
    /// Parse a snarkjs `proof.json` document
    pub fn from_json(value: &Value) -> Result<Self> {
        Ok(RawProof::from_json(value)?.to_proof()?)
    }
}
