//! Groth16 Proof Transcoder
//!
//! Converts snarkjs Groth16 artifacts (`proof.json`, `public.json`) into the
//! instruction data expected by a Solana program verifying proofs with the
//! alt_bn128 syscalls.
//!
//! ## Pipeline
//!
//! 1. **Field elements** - decimal strings to fixed-width bytes
//! 2. **Proof** - `pi_a`, `pi_b`, `pi_c` to `proof_a`, `proof_b`, `proof_c`
//! 3. **Public inputs** - signals to 32-byte big-endian blocks, in order
//! 4. **Instruction** - Borsh-framed verify request
//!
//! Submitting the instruction is left to the caller.
//!
//! ```
//! use proof_transcoder::Transcoder;
//! use serde_json::json;
//!
//! let proof = json!({
//!     "pi_a": ["1", "2", "1"],
//!     "pi_b": [["3", "4"], ["5", "6"], ["1", "0"]],
//!     "pi_c": ["7", "8", "1"]
//! });
//! let data = Transcoder::default().encode_request(&proof, &json!(["12"])).unwrap();
//! assert_eq!(data.len(), 1 + 16 + 32 + 256);
//! ```

pub mod artifacts;
pub mod common;
pub mod field;
pub mod inputs;
pub mod instruction;
pub mod proof;
pub mod transcoder;

// Re-exports: field elements
pub use field::{EncodingError, Endianness, FieldCheck, FieldElement, Modulus, FIELD_ELEMENT_SIZE};

// Re-exports: proof
pub use proof::{EncodedProof, MalformedProofError, Proof, ProofTranscoder};

// Re-exports: public inputs
pub use inputs::PublicInputEncoder;

// Re-exports: instruction
pub use instruction::{DecodeError, InstructionError, Opcode, VerifyInstruction, VerifyInstructionBuilder};

// Re-exports: facade
pub use transcoder::{InstructionSummary, ProofSummary, Transcoder};

// Re-exports: common
pub use common::{Result, TranscoderConfig, TranscoderError};
