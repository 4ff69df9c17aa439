//! Transaction output with a satoshi value and locking script.

use bch_primitives::util::{ByteReader, ByteWriter, VarInt};
use bch_script::Script;

use crate::TransactionError;

/// A single transaction output.
///
/// Each output specifies a `value` in satoshis and a `locking_script`
/// that defines the conditions under which the funds may be spent.
///
/// # Wire format
///
/// | Field          | Size         |
/// |----------------|--------------|
/// | value          | 8 bytes (LE) |
/// | script length  | VarInt       |
/// | locking_script | variable     |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionOutput {
    /// The number of satoshis locked by this output.
    pub value: u64,

    /// The locking script that defines spending conditions.
    pub locking_script: Script,
}

impl TransactionOutput {
    /// Create a new output with zero value and an empty script.
    pub fn new() -> Self {
        TransactionOutput {
            value: 0,
            locking_script: Script::new(),
        }
    }

    /// Deserialize an output from a `ByteReader`.
    pub fn read_from(reader: &mut ByteReader) -> Result<Self, TransactionError> {
        let value = reader.read_u64_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading value: {}", e))
        })?;

        let script_len = reader.read_varint().map_err(|e| {
            TransactionError::SerializationError(format!("reading script length: {}", e))
        })?;

        let script_bytes = reader.read_bytes(script_len.value() as usize).map_err(|e| {
            TransactionError::SerializationError(format!("reading locking script: {}", e))
        })?;

        Ok(TransactionOutput {
            value,
            locking_script: Script::from_bytes(script_bytes),
        })
    }

    /// Serialize this output into a `ByteWriter`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        writer.write_u64_le(self.value);
        let script_bytes = self.locking_script.to_bytes();
        writer.write_varint(VarInt::from(script_bytes.len()));
        writer.write_bytes(script_bytes);
    }

    /// Serialize this output to a byte vector.
    ///
    /// This serialization is also the unit covered by the outputs hash
    /// and corresponding-output hash precomputations.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.write_to(&mut writer);
        writer.into_bytes()
    }
}

impl Default for TransactionOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_roundtrip() {
        let output = TransactionOutput {
            value: 123_456,
            locking_script: Script::from_bytes(&[0xa9, 0x14]),
        };

        let bytes = output.to_bytes();
        let mut reader = ByteReader::new(&bytes);
        let decoded = TransactionOutput::read_from(&mut reader).expect("should decode");
        assert_eq!(decoded, output);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_output_layout() {
        let output = TransactionOutput {
            value: 1,
            locking_script: Script::from_bytes(&[0x51]),
        };
        assert_eq!(output.to_bytes(), vec![1, 0, 0, 0, 0, 0, 0, 0, 1, 0x51]);
    }
}
