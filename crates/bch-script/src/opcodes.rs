//! Bitcoin Cash opcode constants.
//!
//! Numbering follows the published Bitcoin Cash opcode table. Only the
//! opcodes dispatched by the common instruction set (plus the push-family
//! boundaries needed for script decoding) are named here.

/// Push an empty byte array (the Script Number 0).
pub const OP_0: u8 = 0x00;
/// Alias for OP_0.
pub const OP_FALSE: u8 = 0x00;
/// First constant-length data push (1 byte of payload).
pub const OP_DATA_1: u8 = 0x01;
/// Constant-length data push of 20 bytes, as used by hash-based templates.
pub const OP_DATA_20: u8 = 0x14;
/// Last constant-length data push (75 bytes of payload).
pub const OP_DATA_75: u8 = 0x4b;
/// Push data with a 1-byte length prefix.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// Push data with a 2-byte little-endian length prefix.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// Push data with a 4-byte little-endian length prefix.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the Script Number -1.
pub const OP_1NEGATE: u8 = 0x4f;
/// Push the Script Number 1.
pub const OP_1: u8 = 0x51;
/// Alias for OP_1.
pub const OP_TRUE: u8 = 0x51;
/// Push the Script Number 16. Opcodes 0x51..=0x60 push 1..=16.
pub const OP_16: u8 = 0x60;
/// Pop the top item and fail unless it is truthy.
pub const OP_VERIFY: u8 = 0x69;
/// Duplicate the top stack item.
pub const OP_DUP: u8 = 0x76;
/// Pop two items and push 1 if byte-identical, 0 otherwise.
pub const OP_EQUAL: u8 = 0x87;
/// OP_EQUAL followed by OP_VERIFY.
pub const OP_EQUALVERIFY: u8 = 0x88;
/// Pop the top item and push its RIPEMD160(SHA256(x)) digest.
pub const OP_HASH160: u8 = 0xa9;
/// Record the current position as the start of the signed script code.
pub const OP_CODESEPARATOR: u8 = 0xab;
/// Pop a public key and signature and verify them against the signing
/// serialization digest.
pub const OP_CHECKSIG: u8 = 0xac;

/// Return the canonical name of an opcode.
///
/// Constant data pushes render as `OP_DATA_n`; bytes outside the published
/// table render as `OP_UNKNOWN_0x..`.
pub fn opcode_name(opcode: u8) -> String {
    match opcode {
        OP_0 => "OP_0".to_string(),
        op if (OP_DATA_1..=OP_DATA_75).contains(&op) => format!("OP_DATA_{}", op),
        OP_PUSHDATA1 => "OP_PUSHDATA1".to_string(),
        OP_PUSHDATA2 => "OP_PUSHDATA2".to_string(),
        OP_PUSHDATA4 => "OP_PUSHDATA4".to_string(),
        OP_1NEGATE => "OP_1NEGATE".to_string(),
        op if (OP_1..=OP_16).contains(&op) => format!("OP_{}", op - OP_1 + 1),
        OP_VERIFY => "OP_VERIFY".to_string(),
        OP_DUP => "OP_DUP".to_string(),
        OP_EQUAL => "OP_EQUAL".to_string(),
        OP_EQUALVERIFY => "OP_EQUALVERIFY".to_string(),
        OP_HASH160 => "OP_HASH160".to_string(),
        OP_CODESEPARATOR => "OP_CODESEPARATOR".to_string(),
        OP_CHECKSIG => "OP_CHECKSIG".to_string(),
        op => format!("OP_UNKNOWN_0x{:02x}", op),
    }
}
