//! Signing serialization (sighash preimage) for Bitcoin Cash.
//!
//! BCH uses the BIP-143-style replay-protected digest algorithm: the
//! preimage commits to precomputed per-transaction hashes, the outpoint
//! and value being spent, and the covered script code. The digest signed
//! by ECDSA is the double SHA-256 of this preimage.

use bch_primitives::util::{ByteWriter, VarInt};

use super::state::ExternalState;

/// Sign all inputs and all outputs (the default).
pub const SIGHASH_ALL: u32 = 0x01;

/// Sign all inputs but no outputs, allowing outputs to be modified.
pub const SIGHASH_NONE: u32 = 0x02;

/// Sign all inputs and only the output with the same index as the signed
/// input.
pub const SIGHASH_SINGLE: u32 = 0x03;

/// Replay-protection flag required on all BCH signatures.
pub const SIGHASH_FORKID: u32 = 0x40;

/// Only sign the current input, allowing other inputs to be added later.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// The standard BCH sighash type: ALL | FORKID.
pub const SIGHASH_ALL_FORKID: u32 = SIGHASH_ALL | SIGHASH_FORKID;

/// Mask applied to extract the base sighash type (ALL, NONE, SINGLE).
pub const SIGHASH_MASK: u32 = 0x1f;

/// Assemble the signing-serialization preimage for one input.
///
/// The preimage concatenates, in order:
/// 1. version (u32 LE)
/// 2. hash of all outpoints (32 bytes; zeros under ANYONECANPAY)
/// 3. hash of all sequence numbers (32 bytes; zeros under
///    ANYONECANPAY, NONE, or SINGLE)
/// 4. outpoint transaction hash (32 bytes)
/// 5. outpoint index (u32 LE)
/// 6. script code (VarInt length + bytes)
/// 7. outpoint value (u64 LE)
/// 8. sequence number (u32 LE)
/// 9. hash of the covered outputs (32 bytes; all outputs for ALL, the
///    corresponding output for SINGLE, zeros for NONE)
/// 10. locktime (u32 LE)
/// 11. sighash type (u32 LE)
///
/// # Arguments
/// * `external` - The per-input transaction context with its precomputed
///   hashes.
/// * `script_code` - The covered script (the executing script from the
///   most recent code separator onward), without a length prefix.
/// * `sighash_type` - The full sighash type, FORKID included.
///
/// # Returns
/// The raw preimage bytes (not yet hashed).
pub fn signing_serialization(
    external: &ExternalState,
    script_code: &[u8],
    sighash_type: u32,
) -> Vec<u8> {
    let base_type = sighash_type & SIGHASH_MASK;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;

    let hash_outpoints = if anyone_can_pay {
        [0u8; 32]
    } else {
        external.transaction_outpoints_hash
    };

    let hash_sequence = if anyone_can_pay
        || base_type == SIGHASH_SINGLE
        || base_type == SIGHASH_NONE
    {
        [0u8; 32]
    } else {
        external.transaction_sequence_numbers_hash
    };

    let hash_outputs = if base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE {
        external.transaction_outputs_hash
    } else if base_type == SIGHASH_SINGLE {
        external.corresponding_output_hash
    } else {
        [0u8; 32]
    };

    let mut writer = ByteWriter::with_capacity(156 + script_code.len());
    writer.write_u32_le(external.version);
    writer.write_bytes(&hash_outpoints);
    writer.write_bytes(&hash_sequence);
    writer.write_bytes(&external.outpoint_transaction_hash);
    writer.write_u32_le(external.outpoint_index);
    writer.write_varint(VarInt::from(script_code.len()));
    writer.write_bytes(script_code);
    writer.write_u64_le(external.outpoint_value);
    writer.write_u32_le(external.sequence_number);
    writer.write_bytes(&hash_outputs);
    writer.write_u32_le(external.locktime);
    writer.write_u32_le(sighash_type);
    writer.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_external() -> ExternalState {
        ExternalState {
            block_height: 0,
            block_time: 0,
            locktime: 0x11223344,
            version: 2,
            transaction_outpoints_hash: [0xaa; 32],
            transaction_outputs_hash: [0xbb; 32],
            transaction_sequence_numbers_hash: [0xcc; 32],
            corresponding_output_hash: [0xdd; 32],
            outpoint_transaction_hash: [0xee; 32],
            outpoint_index: 3,
            outpoint_value: 5000,
            sequence_number: 0xffffffff,
        }
    }

    #[test]
    fn test_preimage_layout_default_path() {
        let external = sample_external();
        let script_code = [0x51u8, 0x87];
        let preimage = signing_serialization(&external, &script_code, SIGHASH_ALL_FORKID);

        let mut expected = Vec::new();
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(&[0xaa; 32]);
        expected.extend_from_slice(&[0xcc; 32]);
        expected.extend_from_slice(&[0xee; 32]);
        expected.extend_from_slice(&3u32.to_le_bytes());
        expected.push(2); // VarInt(script_code.len())
        expected.extend_from_slice(&script_code);
        expected.extend_from_slice(&5000u64.to_le_bytes());
        expected.extend_from_slice(&0xffffffffu32.to_le_bytes());
        expected.extend_from_slice(&[0xbb; 32]);
        expected.extend_from_slice(&0x11223344u32.to_le_bytes());
        expected.extend_from_slice(&SIGHASH_ALL_FORKID.to_le_bytes());

        assert_eq!(preimage, expected);
    }

    #[test]
    fn test_anyonecanpay_zeroes_input_hashes() {
        let external = sample_external();
        let preimage = signing_serialization(
            &external,
            &[],
            SIGHASH_ALL | SIGHASH_FORKID | SIGHASH_ANYONECANPAY,
        );
        assert_eq!(&preimage[4..36], &[0u8; 32]);
        assert_eq!(&preimage[36..68], &[0u8; 32]);
    }

    #[test]
    fn test_single_uses_corresponding_output_hash() {
        let external = sample_external();
        let preimage = signing_serialization(&external, &[], SIGHASH_SINGLE | SIGHASH_FORKID);
        // sequences hash zeroed
        assert_eq!(&preimage[36..68], &[0u8; 32]);
        // outputs hash slot holds the corresponding-output hash
        let outputs_slot = preimage.len() - 8 - 32;
        assert_eq!(&preimage[outputs_slot..outputs_slot + 32], &[0xdd; 32]);
    }

    #[test]
    fn test_none_zeroes_outputs_hash() {
        let external = sample_external();
        let preimage = signing_serialization(&external, &[], SIGHASH_NONE | SIGHASH_FORKID);
        let outputs_slot = preimage.len() - 8 - 32;
        assert_eq!(&preimage[outputs_slot..outputs_slot + 32], &[0u8; 32]);
    }
}
