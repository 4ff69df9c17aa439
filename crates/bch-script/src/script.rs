//! Bitcoin Cash script type.
//!
//! Scripts are used in transaction inputs (unlocking) and outputs (locking)
//! to define spending conditions. The `Script` wraps a `Vec<u8>` and
//! provides construction, classification, and ASM rendering; execution
//! lives in the [`crate::vm`] module.

use std::fmt;

use crate::opcodes::*;
use crate::ScriptError;

/// A Bitcoin Cash script, represented as a byte vector newtype.
#[derive(Clone, PartialEq, Eq)]
pub struct Script(Vec<u8>);

/// A single decoded script element: an opcode plus its push payload, if any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// The opcode byte. For constant pushes (1-75 bytes), this is the length.
    pub opcode: u8,
    /// The pushed bytes, when this instruction is a push operation.
    pub data: Option<Vec<u8>>,
}

impl Script {
    /// Create a new empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from a hex-encoded string.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string (e.g. "a914...87").
    ///
    /// # Returns
    /// A `Script` wrapping the decoded bytes, or an error if the hex is invalid.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        let bytes = hex::decode(hex_str).map_err(|e| ScriptError::InvalidHex(e.to_string()))?;
        Ok(Script(bytes))
    }

    /// Create a script from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Encode the script as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Return a reference to the underlying bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Return the length of the script in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the script is empty (zero bytes).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if this is a Pay-to-Script-Hash (P2SH) output script.
    ///
    /// Pattern: OP_HASH160 <20 bytes> OP_EQUAL
    pub fn is_p2sh(&self) -> bool {
        let b = &self.0;
        b.len() == 23 && b[0] == OP_HASH160 && b[1] == OP_DATA_20 && b[22] == OP_EQUAL
    }

    /// Check whether every top-level instruction is a push operation.
    ///
    /// Push payloads are skipped rather than tested as opcodes, so data
    /// bytes inside a push can never disqualify a script. A truncated push
    /// makes the script non-push-only.
    pub fn is_push_only(&self) -> bool {
        let mut pos = 0;
        while pos < self.0.len() {
            if self.0[pos] > OP_16 {
                return false;
            }
            match self.read_instruction(&mut pos) {
                Ok(_) => {}
                Err(_) => return false,
            }
        }
        true
    }

    /// Decode the script into a vector of instructions.
    ///
    /// # Returns
    /// The decoded instructions, or an error if a push is truncated.
    pub fn instructions(&self) -> Result<Vec<Instruction>, ScriptError> {
        let mut out = Vec::new();
        let mut pos = 0;
        while pos < self.0.len() {
            out.push(self.read_instruction(&mut pos)?);
        }
        Ok(out)
    }

    /// Convert the script to its ASM (human-readable assembly) representation.
    ///
    /// Data pushes appear as their hex encoding; opcodes appear by name.
    /// Returns an empty string for empty or malformed scripts.
    pub fn to_asm(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let instructions = match self.instructions() {
            Ok(i) => i,
            Err(_) => return String::new(),
        };
        instructions
            .iter()
            .map(|instruction| match &instruction.data {
                Some(data) => hex::encode(data),
                None => opcode_name(instruction.opcode),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Read a single instruction from the given position.
    ///
    /// Advances `pos` past the consumed bytes.
    fn read_instruction(&self, pos: &mut usize) -> Result<Instruction, ScriptError> {
        let b = &self.0;
        let op = b[*pos];
        match op {
            OP_PUSHDATA1 => {
                if b.len() < *pos + 2 {
                    return Err(ScriptError::DataTooSmall);
                }
                let length = b[*pos + 1] as usize;
                *pos += 2;
                self.take_payload(op, length, pos)
            }
            OP_PUSHDATA2 => {
                if b.len() < *pos + 3 {
                    return Err(ScriptError::DataTooSmall);
                }
                let length = u16::from_le_bytes([b[*pos + 1], b[*pos + 2]]) as usize;
                *pos += 3;
                self.take_payload(op, length, pos)
            }
            OP_PUSHDATA4 => {
                if b.len() < *pos + 5 {
                    return Err(ScriptError::DataTooSmall);
                }
                let length =
                    u32::from_le_bytes([b[*pos + 1], b[*pos + 2], b[*pos + 3], b[*pos + 4]])
                        as usize;
                *pos += 5;
                self.take_payload(op, length, pos)
            }
            op if op >= OP_DATA_1 && op <= OP_DATA_75 => {
                *pos += 1;
                self.take_payload(op, op as usize, pos)
            }
            _ => {
                *pos += 1;
                Ok(Instruction { opcode: op, data: None })
            }
        }
    }

    fn take_payload(&self, op: u8, length: usize, pos: &mut usize) -> Result<Instruction, ScriptError> {
        if self.0.len() < *pos + length {
            return Err(ScriptError::DataTooSmall);
        }
        let data = self.0[*pos..*pos + length].to_vec();
        *pos += length;
        Ok(Instruction { opcode: op, data: Some(data) })
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Script {
    /// Display the script as a lowercase hex string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
