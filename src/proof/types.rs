//! Groth16 proof values
//!
//! # Verifier Layout (256 bytes)
//! - a: G1 point (64 bytes) - BE(x) || BE(y)
//! - b: G2 point (128 bytes) - BE(x_c1) || BE(x_c0) || BE(y_c1) || BE(y_c0)
//! - c: G1 point (64 bytes) - BE(x) || BE(y)

use crate::field::FieldElement;

/// Encoded G1 point size (x, y)
pub const G1_SIZE: usize = 64;

/// Encoded G2 point size (x_c0, x_c1, y_c0, y_c1)
pub const G2_SIZE: usize = 128;

/// Expected Groth16 proof size (a + b + c = 64 + 128 + 64 = 256 bytes)
pub const PROOF_SIZE: usize = G1_SIZE + G2_SIZE + G1_SIZE;

/// Point in the base group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct G1Point {
    pub x: FieldElement,
    pub y: FieldElement,
}

/// Element of the quadratic extension field, `c0 + c1 * u`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fq2 {
    pub c0: FieldElement,
    pub c1: FieldElement,
}

/// Point in the extension group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct G2Point {
    pub x: Fq2,
    pub y: Fq2,
}

/// Groth16 proof in prover coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proof {
    /// A point (G1)
    pub a: G1Point,
    /// B point (G2)
    pub b: G2Point,
    /// C point (G1)
    pub c: G1Point,
}

/// Proof in verifier byte layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedProof {
    pub proof_a: [u8; G1_SIZE],
    pub proof_b: [u8; G2_SIZE],
    pub proof_c: [u8; G1_SIZE],
}

impl EncodedProof {
    /// Parse proof from flat byte array
    pub fn from_bytes(bytes: &[u8; PROOF_SIZE]) -> Self {
        let mut proof_a = [0u8; G1_SIZE];
        let mut proof_b = [0u8; G2_SIZE];
        let mut proof_c = [0u8; G1_SIZE];

        proof_a.copy_from_slice(&bytes[0..64]);
        proof_b.copy_from_slice(&bytes[64..192]);
        proof_c.copy_from_slice(&bytes[192..256]);

        Self {
            proof_a,
            proof_b,
            proof_c,
        }
    }

    /// Convert to flat byte array
    pub fn to_bytes(&self) -> [u8; PROOF_SIZE] {
        let mut bytes = [0u8; PROOF_SIZE];
        bytes[0..64].copy_from_slice(&self.proof_a);
        bytes[64..192].copy_from_slice(&self.proof_b);
        bytes[192..256].copy_from_slice(&self.proof_c);
        bytes
    }
}
