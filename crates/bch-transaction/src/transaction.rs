//! The transaction type: wire serialization, hash precomputation, and
//! authentication program construction.

use bch_primitives::hash::sha256d;
use bch_primitives::util::{ByteReader, ByteWriter, VarInt};
use bch_script::vm::{AuthenticationProgram, ExternalState};

use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::TransactionError;

/// A Bitcoin Cash transaction.
///
/// # Wire format
///
/// | Field        | Size         |
/// |--------------|--------------|
/// | version      | 4 bytes (LE) |
/// | input count  | VarInt       |
/// | inputs       | variable     |
/// | output count | VarInt       |
/// | outputs      | variable     |
/// | locktime     | 4 bytes (LE) |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction format version.
    pub version: u32,
    /// The inputs spending previous outputs.
    pub inputs: Vec<TransactionInput>,
    /// The newly created outputs.
    pub outputs: Vec<TransactionOutput>,
    /// Earliest time or block height at which the transaction is final.
    pub locktime: u32,
}

impl Transaction {
    /// Create an empty version-2 transaction.
    pub fn new() -> Self {
        Transaction {
            version: 2,
            inputs: Vec::new(),
            outputs: Vec::new(),
            locktime: 0,
        }
    }

    /// Deserialize a transaction from a `ByteReader`.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let version = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading version: {}", e))
        })?;

        let input_count = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading input count: {}", e))
        })?;
        let mut inputs = Vec::with_capacity(input_count.value() as usize);
        for _ in 0..input_count.value() {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading output count: {}", e))
        })?;
        let mut outputs = Vec::with_capacity(output_count.value() as usize);
        for _ in 0..output_count.value() {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        let locktime = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading locktime: {}", e))
        })?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            locktime,
        })
    }

    /// Deserialize a transaction from wire-format bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = ByteReader::new(bytes);
        Self::read_from(&mut reader)
    }

    /// Deserialize a transaction from a hex string.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TransactionError::SerializationError(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Serialize this transaction into a `ByteWriter`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u32_le(self.version);
        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(writer);
        }
        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(writer);
        }
        writer.write_u32_le(self.locktime);
    }

    /// Serialize this transaction to wire-format bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    /// Serialize this transaction to a hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// The transaction hash (double SHA-256 of the serialization), in
    /// internal byte order.
    pub fn txid(&self) -> [u8; 32] {
        sha256d(&self.to_bytes())
    }

    // -------------------------------------------------------------------
    // Signing-serialization hash precomputation
    // -------------------------------------------------------------------

    /// Double SHA-256 of every input's outpoint, concatenated.
    pub fn outpoints_hash(&self) -> [u8; 32] {
        let mut writer = ByteWriter::with_capacity(self.inputs.len() * 36);
        for input in &self.inputs {
            writer.write_bytes(&input.outpoint_bytes());
        }
        sha256d(writer.as_bytes())
    }

    /// Double SHA-256 of every input's sequence number (LE), concatenated.
    pub fn sequence_numbers_hash(&self) -> [u8; 32] {
        let mut writer = ByteWriter::with_capacity(self.inputs.len() * 4);
        for input in &self.inputs {
            writer.write_u32_le(input.sequence_number);
        }
        sha256d(writer.as_bytes())
    }

    /// Double SHA-256 of every output's serialization, concatenated.
    pub fn outputs_hash(&self) -> [u8; 32] {
        let mut writer = ByteWriter::new();
        for output in &self.outputs {
            writer.write_bytes(&output.to_bytes());
        }
        sha256d(writer.as_bytes())
    }

    /// Double SHA-256 of the output at `input_index`, or 32 zero bytes
    /// when this input has no matching output. Used by SIGHASH_SINGLE.
    pub fn corresponding_output_hash(&self, input_index: usize) -> [u8; 32] {
        match self.outputs.get(input_index) {
            Some(output) => sha256d(&output.to_bytes()),
            None => [0u8; 32],
        }
    }

    // -------------------------------------------------------------------
    // Authentication program construction
    // -------------------------------------------------------------------

    /// Build the read-only per-input evaluation context for `input_index`.
    ///
    /// `source_output` is the output being spent by that input; it
    /// supplies the outpoint value (the locking script travels on the
    /// authentication program itself).
    pub fn external_state(
        &self,
        input_index: usize,
        source_output: &TransactionOutput,
        block_height: u32,
        block_time: u32,
    ) -> Result<ExternalState, TransactionError> {
        let input = self.inputs.get(input_index).ok_or_else(|| {
            TransactionError::InvalidTransaction(format!(
                "input index {} out of range (transaction has {} inputs)",
                input_index,
                self.inputs.len()
            ))
        })?;

        Ok(ExternalState {
            block_height,
            block_time,
            locktime: self.locktime,
            version: self.version,
            transaction_outpoints_hash: self.outpoints_hash(),
            transaction_outputs_hash: self.outputs_hash(),
            transaction_sequence_numbers_hash: self.sequence_numbers_hash(),
            corresponding_output_hash: self.corresponding_output_hash(input_index),
            outpoint_transaction_hash: input.outpoint_transaction_hash,
            outpoint_index: input.outpoint_index,
            outpoint_value: source_output.value,
            sequence_number: input.sequence_number,
        })
    }

    /// Build the authentication program for `input_index` against the
    /// output it spends.
    pub fn authentication_program(
        &self,
        input_index: usize,
        source_output: &TransactionOutput,
        block_height: u32,
        block_time: u32,
    ) -> Result<AuthenticationProgram, TransactionError> {
        let state = self.external_state(input_index, source_output, block_height, block_time)?;
        let input = &self.inputs[input_index];
        Ok(AuthenticationProgram::new(
            input.unlocking_script.clone(),
            source_output.locking_script.clone(),
            state,
        ))
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bch_script::Script;

    fn sample_transaction() -> Transaction {
        let mut input = TransactionInput::new();
        input.outpoint_transaction_hash = [0xab; 32];
        input.outpoint_index = 1;
        input.unlocking_script = Script::from_bytes(&[0x01, 0x51]);

        let output = TransactionOutput {
            value: 4999,
            locking_script: Script::from_bytes(&[0x51]),
        };

        Transaction {
            version: 2,
            inputs: vec![input],
            outputs: vec![output],
            locktime: 100,
        }
    }

    #[test]
    fn test_transaction_roundtrip() {
        let tx = sample_transaction();
        let decoded = Transaction::from_bytes(&tx.to_bytes()).expect("should decode");
        assert_eq!(decoded, tx);

        let from_hex = Transaction::from_hex(&tx.to_hex()).expect("should decode hex");
        assert_eq!(from_hex, tx);
    }

    #[test]
    fn test_transaction_rejects_truncated() {
        let tx = sample_transaction();
        let bytes = tx.to_bytes();
        assert!(Transaction::from_bytes(&bytes[..bytes.len() - 1]).is_err());
    }

    #[test]
    fn test_outpoints_hash_covers_every_input() {
        let mut tx = sample_transaction();
        let mut second = TransactionInput::new();
        second.outpoint_transaction_hash = [0xcd; 32];
        second.outpoint_index = 7;
        tx.inputs.push(second);

        let mut expected = Vec::new();
        for input in &tx.inputs {
            expected.extend_from_slice(&input.outpoint_bytes());
        }
        assert_eq!(tx.outpoints_hash(), sha256d(&expected));
    }

    #[test]
    fn test_sequence_numbers_hash() {
        let tx = sample_transaction();
        let expected = sha256d(&tx.inputs[0].sequence_number.to_le_bytes());
        assert_eq!(tx.sequence_numbers_hash(), expected);
    }

    #[test]
    fn test_outputs_hash_and_corresponding_output() {
        let tx = sample_transaction();
        let serialized = tx.outputs[0].to_bytes();
        assert_eq!(tx.outputs_hash(), sha256d(&serialized));
        assert_eq!(tx.corresponding_output_hash(0), sha256d(&serialized));
        // No output matches the second input index.
        assert_eq!(tx.corresponding_output_hash(1), [0u8; 32]);
    }

    #[test]
    fn test_external_state_wiring() {
        let tx = sample_transaction();
        let source_output = TransactionOutput {
            value: 5000,
            locking_script: Script::from_bytes(&[0xa9]),
        };

        let state = tx
            .external_state(0, &source_output, 650_000, 1_600_000_000)
            .expect("valid input index");

        assert_eq!(state.version, 2);
        assert_eq!(state.locktime, 100);
        assert_eq!(state.block_height, 650_000);
        assert_eq!(state.block_time, 1_600_000_000);
        assert_eq!(state.outpoint_transaction_hash, [0xab; 32]);
        assert_eq!(state.outpoint_index, 1);
        assert_eq!(state.outpoint_value, 5000);
        assert_eq!(state.sequence_number, 0xFFFF_FFFF);
        assert_eq!(state.transaction_outpoints_hash, tx.outpoints_hash());
        assert_eq!(state.transaction_outputs_hash, tx.outputs_hash());
        assert_eq!(
            state.transaction_sequence_numbers_hash,
            tx.sequence_numbers_hash()
        );
    }

    #[test]
    fn test_external_state_rejects_bad_index() {
        let tx = sample_transaction();
        let source_output = TransactionOutput::new();
        assert!(tx.external_state(3, &source_output, 0, 0).is_err());
    }

    #[test]
    fn test_authentication_program_carries_scripts() {
        let tx = sample_transaction();
        let source_output = TransactionOutput {
            value: 5000,
            locking_script: Script::from_bytes(&[0x76, 0x87]),
        };

        let program = tx
            .authentication_program(0, &source_output, 0, 0)
            .expect("valid input index");
        assert_eq!(program.unlocking_script.to_bytes(), &[0x01, 0x51]);
        assert_eq!(program.locking_script.to_bytes(), &[0x76, 0x87]);
        assert_eq!(program.state.outpoint_value, 5000);
    }
}
