//! Script number codec with Bitcoin Cash consensus rules.
//!
//! Numbers on the stack are encoded as minimally-encoded little-endian
//! byte arrays with a sign bit in the most significant bit of the last
//! byte. The empty byte array represents zero. Parsing accepts at most
//! 4 bytes, bounding values to ±(2^31 - 1).

use super::MAX_SCRIPT_NUMBER_LENGTH;

/// Parse failures for Script Numbers.
///
/// These are returned as values to the caller; operators that consume
/// numbers decide which [`super::VmError`] they surface as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScriptNumError {
    /// The encoding is longer than 4 bytes.
    #[error("script number is out of range")]
    OutOfRange,

    /// The encoding carries padding not required to hold the sign bit.
    #[error("script number requires minimal encoding")]
    RequiresMinimal,
}

/// A Script Number: a signed integer bounded to ±(2^31 - 1) at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScriptNumber(i64);

impl ScriptNumber {
    /// Create a ScriptNumber from an integer value.
    pub fn new(value: i64) -> Self {
        ScriptNumber(value)
    }

    /// Parse a byte array into a ScriptNumber.
    ///
    /// The empty array is zero. Encodings longer than 4 bytes are
    /// `OutOfRange`; encodings whose top byte's low seven bits are zero
    /// while the next byte's high bit is clear (padding that carries no
    /// sign information) are `RequiresMinimal`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ScriptNumError> {
        if bytes.len() > MAX_SCRIPT_NUMBER_LENGTH {
            return Err(ScriptNumError::OutOfRange);
        }

        if let Some(&last) = bytes.last() {
            if last & 0x7f == 0 && (bytes.len() == 1 || bytes[bytes.len() - 2] & 0x80 == 0) {
                return Err(ScriptNumError::RequiresMinimal);
            }
        }

        if bytes.is_empty() {
            return Ok(ScriptNumber(0));
        }

        let mut value: i64 = 0;
        for (i, &b) in bytes.iter().enumerate() {
            value |= (b as i64) << (8 * i);
        }

        // A set sign bit in the most significant byte negates the
        // remaining magnitude.
        if bytes[bytes.len() - 1] & 0x80 != 0 {
            value &= !(0x80_i64 << (8 * (bytes.len() - 1)));
            value = -value;
        }

        Ok(ScriptNumber(value))
    }

    /// Serialize the number to minimal little-endian bytes with sign bit.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.0 == 0 {
            return vec![];
        }

        let negative = self.0 < 0;
        let mut magnitude = self.0.unsigned_abs();

        let mut result: Vec<u8> = Vec::new();
        while magnitude > 0 {
            result.push((magnitude & 0xff) as u8);
            magnitude >>= 8;
        }

        // If the top magnitude byte would collide with the sign bit,
        // append a dedicated sign byte; otherwise fold the sign in.
        if result[result.len() - 1] & 0x80 != 0 {
            result.push(if negative { 0x80 } else { 0x00 });
        } else if negative {
            let last = result.len() - 1;
            result[last] |= 0x80;
        }

        result
    }

    /// Return the integer value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for ScriptNumber {
    fn from(value: i64) -> Self {
        ScriptNumber(value)
    }
}

/// Convert a stack element to a boolean (consensus truthiness).
///
/// True iff some byte is non-zero, except that a lone 0x80 in the last
/// position ("negative zero") is false.
pub fn as_bool(bytes: &[u8]) -> bool {
    for (i, &b) in bytes.iter().enumerate() {
        if b != 0 {
            if i == bytes.len() - 1 && b == 0x80 {
                return false;
            }
            return true;
        }
    }
    false
}

/// Convert a boolean to its stack element encoding.
pub fn from_bool(value: bool) -> Vec<u8> {
    if value {
        vec![1]
    } else {
        vec![]
    }
}
