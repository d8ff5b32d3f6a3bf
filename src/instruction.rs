//! Verify Instruction Encoding
//!
//! Instruction data consumed by the on-chain verifier program. The layout
//! is the Borsh encoding of a `u8` opcode followed by four `Vec<u8>`:
//!
//! ```text
//! opcode        : u8       (0 = Verify)
//! inputs_len    : u32 LE
//! inputs        : inputs_len bytes   (32 x public signal count)
//! proof_a_len   : u32 LE
//! proof_a       : 64 bytes
//! proof_b_len   : u32 LE
//! proof_b       : 128 bytes
//! proof_c_len   : u32 LE
//! proof_c       : 64 bytes
//! ```
//!
//! Decoding rejects short buffers, trailing bytes, unknown opcodes and
//! fields whose length breaks the proof layout.

use borsh::{BorshDeserialize, BorshSerialize};
use thiserror::Error;
use tracing::trace;

use crate::field::FIELD_ELEMENT_SIZE;
use crate::proof::{EncodedProof, G1_SIZE, G2_SIZE};

/// Length prefix size of every variable-length field
const LEN_PREFIX_SIZE: usize = 4;

/// Opcode plus the four length prefixes
pub const HEADER_SIZE: usize = 1 + 4 * LEN_PREFIX_SIZE;

// ============================================================================
// Errors
// ============================================================================

/// Instruction fields violate the verifier layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstructionError {
    #[error("missing instruction field `{0}`")]
    MissingField(&'static str),

    #[error("`{field}` must be {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("inputs length {0} is not a multiple of 32")]
    MisalignedInputs(usize),

    #[error("inputs length {0} does not fit a u32 length prefix")]
    InputsTooLarge(usize),

    #[error("failed to serialize instruction: {0}")]
    Serialize(String),
}

/// Instruction buffer cannot be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("buffer truncated reading `{field}`: need {needed} bytes, {available} available")]
    Truncated {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("{count} trailing bytes after instruction")]
    TrailingBytes { count: usize },

    #[error("unknown opcode: {0}")]
    UnknownOpcode(u8),

    #[error("invalid instruction: {0}")]
    Invalid(#[from] InstructionError),
}

// ============================================================================
// Opcode
// ============================================================================

/// Verifier program instruction selector
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum Opcode {
    #[default]
    Verify = 0,
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> Self {
        opcode as u8
    }
}

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Opcode::Verify),
            other => Err(DecodeError::UnknownOpcode(other)),
        }
    }
}

// ============================================================================
// Verify Instruction
// ============================================================================

/// Validated verification request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyInstruction {
    opcode: Opcode,
    inputs: Vec<u8>,
    proof_a: [u8; G1_SIZE],
    proof_b: [u8; G2_SIZE],
    proof_c: [u8; G1_SIZE],
}

/// Borsh view of the instruction, identical to the verifier's schema
#[derive(BorshSerialize, BorshDeserialize, Debug)]
struct WireInstruction {
    opcode: Opcode,
    inputs: Vec<u8>,
    proof_a: Vec<u8>,
    proof_b: Vec<u8>,
    proof_c: Vec<u8>,
}

impl From<&VerifyInstruction> for WireInstruction {
    fn from(ix: &VerifyInstruction) -> Self {
        Self {
            opcode: ix.opcode,
            inputs: ix.inputs.clone(),
            proof_a: ix.proof_a.to_vec(),
            proof_b: ix.proof_b.to_vec(),
            proof_c: ix.proof_c.to_vec(),
        }
    }
}

impl VerifyInstruction {
    /// Assemble a Verify instruction from encoded parts
    pub fn new(public_inputs: &[[u8; FIELD_ELEMENT_SIZE]], proof: &EncodedProof) -> Self {
        Self {
            opcode: Opcode::Verify,
            inputs: public_inputs.concat(),
            proof_a: proof.proof_a,
            proof_b: proof.proof_b,
            proof_c: proof.proof_c,
        }
    }

    pub fn builder() -> VerifyInstructionBuilder {
        VerifyInstructionBuilder::default()
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn inputs(&self) -> &[u8] {
        &self.inputs
    }

    pub fn proof_a(&self) -> &[u8; G1_SIZE] {
        &self.proof_a
    }

    pub fn proof_b(&self) -> &[u8; G2_SIZE] {
        &self.proof_b
    }

    pub fn proof_c(&self) -> &[u8; G1_SIZE] {
        &self.proof_c
    }

    pub fn proof(&self) -> EncodedProof {
        EncodedProof {
            proof_a: self.proof_a,
            proof_b: self.proof_b,
            proof_c: self.proof_c,
        }
    }

    /// 32-byte public input blocks, in circuit order
    pub fn public_inputs(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.inputs.chunks_exact(FIELD_ELEMENT_SIZE)
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len() / FIELD_ELEMENT_SIZE
    }

    /// Size of [`Self::encode`] output
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.inputs.len() + G1_SIZE + G2_SIZE + G1_SIZE
    }

    /// Serialize to instruction data
    pub fn encode(&self) -> Result<Vec<u8>, InstructionError> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        WireInstruction::from(self)
            .serialize(&mut buf)
            .map_err(|e| InstructionError::Serialize(e.to_string()))?;

        trace!(target: "transcoder::instruction", len = buf.len(), "instruction encoded");
        Ok(buf)
    }

    /// Parse instruction data, rejecting truncation and trailing bytes
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = ByteReader::new(data);

        let opcode = Opcode::try_from(reader.read_u8("opcode")?)?;
        let inputs = reader.read_prefixed("inputs")?;
        let proof_a = reader.read_prefixed("proof_a")?;
        let proof_b = reader.read_prefixed("proof_b")?;
        let proof_c = reader.read_prefixed("proof_c")?;

        if reader.remaining() > 0 {
            return Err(DecodeError::TrailingBytes {
                count: reader.remaining(),
            });
        }

        let ix = Self::builder()
            .opcode(opcode)
            .inputs(inputs)
            .proof_a(proof_a)
            .proof_b(proof_b)
            .proof_c(proof_c)
            .build()?;

        trace!(
            target: "transcoder::instruction",
            inputs = ix.input_count(),
            "instruction decoded"
        );
        Ok(ix)
    }

    pub fn to_hex(&self) -> Result<String, InstructionError> {
        Ok(hex::encode(self.encode()?))
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Collects instruction fields and validates them on [`Self::build`]
#[derive(Debug, Clone, Default)]
pub struct VerifyInstructionBuilder {
    opcode: Option<Opcode>,
    inputs: Option<Vec<u8>>,
    proof_a: Option<Vec<u8>>,
    proof_b: Option<Vec<u8>>,
    proof_c: Option<Vec<u8>>,
}

impl VerifyInstructionBuilder {
    /// Defaults to [`Opcode::Verify`] when not set
    pub fn opcode(mut self, opcode: Opcode) -> Self {
        self.opcode = Some(opcode);
        self
    }

    /// Flat `inputs` bytes (32 x signal count)
    pub fn inputs(mut self, inputs: impl Into<Vec<u8>>) -> Self {
        self.inputs = Some(inputs.into());
        self
    }

    pub fn public_inputs(mut self, blocks: &[[u8; FIELD_ELEMENT_SIZE]]) -> Self {
        self.inputs = Some(blocks.concat());
        self
    }

    pub fn proof_a(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.proof_a = Some(bytes.into());
        self
    }

    pub fn proof_b(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.proof_b = Some(bytes.into());
        self
    }

    pub fn proof_c(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.proof_c = Some(bytes.into());
        self
    }

    pub fn proof(self, proof: &EncodedProof) -> Self {
        self.proof_a(proof.proof_a.to_vec())
            .proof_b(proof.proof_b.to_vec())
            .proof_c(proof.proof_c.to_vec())
    }

    pub fn build(self) -> Result<VerifyInstruction, InstructionError> {
        let inputs = self.inputs.ok_or(InstructionError::MissingField("inputs"))?;
        if inputs.len() % FIELD_ELEMENT_SIZE != 0 {
            return Err(InstructionError::MisalignedInputs(inputs.len()));
        }
        if u32::try_from(inputs.len()).is_err() {
            return Err(InstructionError::InputsTooLarge(inputs.len()));
        }

        Ok(VerifyInstruction {
            opcode: self.opcode.unwrap_or_default(),
            inputs,
            proof_a: fixed("proof_a", self.proof_a)?,
            proof_b: fixed("proof_b", self.proof_b)?,
            proof_c: fixed("proof_c", self.proof_c)?,
        })
    }
}

fn fixed<const N: usize>(
    field: &'static str,
    bytes: Option<Vec<u8>>,
) -> Result<[u8; N], InstructionError> {
    let bytes = bytes.ok_or(InstructionError::MissingField(field))?;
    let actual = bytes.len();
    <[u8; N]>::try_from(bytes).map_err(|_| InstructionError::InvalidLength {
        field,
        expected: N,
        actual,
    })
}

// ============================================================================
// Byte Reader
// ============================================================================

/// Cursor over instruction data with per-field error context
struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn read_exact(&mut self, len: usize, field: &'static str) -> Result<&'a [u8], DecodeError> {
        if len > self.remaining() {
            return Err(DecodeError::Truncated {
                field,
                needed: len,
                available: self.remaining(),
            });
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.bytes[start..start + len])
    }

    fn read_u8(&mut self, field: &'static str) -> Result<u8, DecodeError> {
        Ok(self.read_exact(1, field)?[0])
    }

    fn read_u32_le(&mut self, field: &'static str) -> Result<u32, DecodeError> {
        let bytes = self.read_exact(LEN_PREFIX_SIZE, field)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// `u32` LE length followed by that many bytes
    fn read_prefixed(&mut self, field: &'static str) -> Result<Vec<u8>, DecodeError> {
        let len = self.read_u32_le(field)? as usize;
        Ok(self.read_exact(len, field)?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_proof() -> EncodedProof {
        let mut proof_a = [0u8; G1_SIZE];
        let mut proof_b = [0u8; G2_SIZE];
        let mut proof_c = [0u8; G1_SIZE];
        proof_a[31] = 1;
        proof_a[63] = 2;
        proof_b[31] = 4;
        proof_b[63] = 3;
        proof_b[95] = 6;
        proof_b[127] = 5;
        proof_c[31] = 7;
        proof_c[63] = 8;
        EncodedProof {
            proof_a,
            proof_b,
            proof_c,
        }
    }

    fn sample_instruction() -> VerifyInstruction {
        let mut input = [0u8; 32];
        input[31] = 12;
        VerifyInstruction::new(&[input], &sample_proof())
    }

    #[test]
    fn test_encode_layout() {
        let ix = sample_instruction();
        let data = ix.encode().unwrap();

        assert_eq!(data.len(), 1 + 16 + 32 + 64 + 128 + 64);
        assert_eq!(data.len(), ix.encoded_len());
        assert_eq!(data[0], 0);
        assert_eq!(&data[1..5], &32u32.to_le_bytes());
        assert_eq!(data[5 + 31], 12);
        assert_eq!(&data[37..41], &64u32.to_le_bytes());
        assert_eq!(&data[105..109], &128u32.to_le_bytes());
        assert_eq!(&data[237..241], &64u32.to_le_bytes());
    }

    #[test]
    fn test_decode_round_trip() {
        let ix = sample_instruction();
        assert_eq!(VerifyInstruction::decode(&ix.encode().unwrap()).unwrap(), ix);

        let empty = VerifyInstruction::new(&[], &sample_proof());
        let data = empty.encode().unwrap();
        assert_eq!(data.len(), HEADER_SIZE + 256);
        assert_eq!(VerifyInstruction::decode(&data).unwrap(), empty);
    }

    #[test]
    fn test_matches_borsh_schema() {
        let ix = sample_instruction();
        let data = ix.encode().unwrap();

        let wire: WireInstruction = borsh::from_slice(&data).unwrap();
        assert_eq!(wire.opcode, Opcode::Verify);
        assert_eq!(wire.inputs, ix.inputs());
        assert_eq!(wire.proof_b, ix.proof_b().to_vec());
    }

    #[test]
    fn test_inputs_len_exceeds_buffer() {
        let mut data = sample_instruction().encode().unwrap();
        data[1..5].copy_from_slice(&10_000u32.to_le_bytes());

        assert!(matches!(
            VerifyInstruction::decode(&data),
            Err(DecodeError::Truncated { field: "inputs", needed: 10_000, .. })
        ));
    }

    #[test]
    fn test_truncated_everywhere() {
        let data = sample_instruction().encode().unwrap();
        for cut in 0..data.len() {
            assert!(
                matches!(
                    VerifyInstruction::decode(&data[..cut]),
                    Err(DecodeError::Truncated { .. })
                ),
                "prefix of {} bytes decoded",
                cut
            );
        }
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut data = sample_instruction().encode().unwrap();
        data.extend_from_slice(&[0, 0]);

        assert_eq!(
            VerifyInstruction::decode(&data),
            Err(DecodeError::TrailingBytes { count: 2 })
        );
    }

    #[test]
    fn test_unknown_opcode() {
        let mut data = sample_instruction().encode().unwrap();
        data[0] = 7;
        assert_eq!(VerifyInstruction::decode(&data), Err(DecodeError::UnknownOpcode(7)));
    }

    #[test]
    fn test_wrong_proof_length_rejected() {
        let mut data = Vec::new();
        data.push(0u8);
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&63u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 63]);
        data.extend_from_slice(&128u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 128]);
        data.extend_from_slice(&64u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 64]);

        assert_eq!(
            VerifyInstruction::decode(&data),
            Err(DecodeError::Invalid(InstructionError::InvalidLength {
                field: "proof_a",
                expected: 64,
                actual: 63,
            }))
        );
    }

    #[test]
    fn test_builder_validation() {
        let proof = sample_proof();

        assert_eq!(
            VerifyInstruction::builder().proof(&proof).build(),
            Err(InstructionError::MissingField("inputs"))
        );
        assert_eq!(
            VerifyInstruction::builder().inputs(vec![0u8; 32]).build(),
            Err(InstructionError::MissingField("proof_a"))
        );
        assert_eq!(
            VerifyInstruction::builder()
                .inputs(vec![0u8; 31])
                .proof(&proof)
                .build(),
            Err(InstructionError::MisalignedInputs(31))
        );
        assert!(matches!(
            VerifyInstruction::builder()
                .inputs(Vec::new())
                .proof(&proof)
                .proof_b(vec![0u8; 64])
                .build(),
            Err(InstructionError::InvalidLength { field: "proof_b", .. })
        ));

        let ix = VerifyInstruction::builder()
            .public_inputs(&[[1u8; 32], [2u8; 32]])
            .proof(&proof)
            .build()
            .unwrap();
        assert_eq!(ix.opcode(), Opcode::Verify);
        assert_eq!(ix.input_count(), 2);
        assert_eq!(ix.public_inputs().nth(1).unwrap(), &[2u8; 32]);
        assert_eq!(ix.proof(), proof);
    }

    #[test]
    fn test_opcode_conversion() {
        assert_eq!(u8::from(Opcode::Verify), 0);
        assert_eq!(Opcode::try_from(0).unwrap(), Opcode::Verify);
        assert_eq!(Opcode::try_from(1), Err(DecodeError::UnknownOpcode(1)));
    }
}
