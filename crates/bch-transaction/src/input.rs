//! Transaction input referencing a previous output.

use bch_primitives::util::{ByteReader, ByteWriter, VarInt};
use bch_script::Script;

use crate::TransactionError;

/// Default sequence number indicating a finalized input.
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A single transaction input.
///
/// Each input references an output from a previous transaction by its
/// transaction hash and output index. The unlocking script supplies the
/// data required to satisfy the referenced output's locking script.
///
/// # Wire format
///
/// | Field                      | Size          |
/// |----------------------------|---------------|
/// | outpoint_transaction_hash  | 32 bytes      |
/// | outpoint_index             | 4 bytes (LE)  |
/// | script length              | VarInt        |
/// | unlocking_script           | variable      |
/// | sequence_number            | 4 bytes (LE)  |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    /// The 32-byte hash of the transaction whose output is being spent,
    /// in internal (little-endian) byte order.
    pub outpoint_transaction_hash: [u8; 32],

    /// Index of the output within the source transaction.
    pub outpoint_index: u32,

    /// Sequence number. Defaults to `0xFFFFFFFF` (finalized).
    pub sequence_number: u32,

    /// The unlocking script proving authorization. Empty when unsigned.
    pub unlocking_script: Script,
}

impl TransactionInput {
    /// Create a new input with a zeroed outpoint, a finalized sequence
    /// number, and an empty unlocking script.
    pub fn new() -> Self {
        TransactionInput {
            outpoint_transaction_hash: [0u8; 32],
            outpoint_index: 0,
            sequence_number: DEFAULT_SEQUENCE_NUMBER,
            unlocking_script: Script::new(),
        }
    }

    /// Deserialize an input from a `ByteReader`.
    ///
    /// # Returns
    /// The decoded input, or a `TransactionError` if the data is truncated.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let hash_bytes = reader.read_bytes(32).map_err(|e| {
            TransactionError::SerializationError(format!("reading outpoint hash: {}", e))
        })?;
        let mut outpoint_transaction_hash = [0u8; 32];
        outpoint_transaction_hash.copy_from_slice(hash_bytes);

        let outpoint_index = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading outpoint index: {}", e))
        })?;

        let script_len = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading script length: {}", e))
        })?;

        let script_bytes = reader.read_bytes(script_len.value() as usize).map_err(|e| {
            TransactionError::SerializationError(format!("reading unlocking script: {}", e))
        })?;

        let sequence_number = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading sequence number: {}", e))
        })?;

        Ok(TransactionInput {
            outpoint_transaction_hash,
            outpoint_index,
            sequence_number,
            unlocking_script: Script::from_bytes(script_bytes),
        })
    }

    /// Serialize this input into a `ByteWriter`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_bytes(&self.outpoint_transaction_hash);
        writer.write_u32_le(self.outpoint_index);
        let script_bytes = self.unlocking_script.to_bytes();
        writer.write_varint(VarInt::from(script_bytes.len()));
        writer.write_bytes(script_bytes);
        writer.write_u32_le(self.sequence_number);
    }

    /// Serialize this input to a byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    /// Serialize this input's outpoint (transaction hash + index LE), the
    /// unit covered by the outpoints hash precomputation.
    pub fn outpoint_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(36);
        writer.write_bytes(&self.outpoint_transaction_hash);
        writer.write_u32_le(self.outpoint_index);
        writer.into_bytes()
    }
}

impl Default for TransactionInput {
    fn default() -> Self {
        Self::new()
    }
}
