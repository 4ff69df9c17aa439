//! Signature and public key encoding checks.
//!
//! OP_CHECKSIG only accepts strictly encoded inputs: signatures must be
//! canonical DER with a low S value and a trailing sighash-type byte from
//! the permitted Bitcoin Cash set; public keys must be SEC1 compressed
//! (33 bytes) or uncompressed (65 bytes).

use num_bigint::BigInt;

use super::sighash::{SIGHASH_ALL, SIGHASH_ANYONECANPAY, SIGHASH_FORKID, SIGHASH_SINGLE};

/// Check that a public key uses a valid encoding: 33-byte compressed
/// (`0x02`/`0x03` prefix) or 65-byte uncompressed (`0x04` prefix).
pub fn is_valid_public_key_encoding(public_key: &[u8]) -> bool {
    if public_key.len() == 33 && (public_key[0] == 0x02 || public_key[0] == 0x03) {
        return true;
    }
    if public_key.len() == 65 && public_key[0] == 0x04 {
        return true;
    }
    false
}

/// Check that a sighash-type byte is drawn from the permitted set: a base
/// type of ALL, NONE, or SINGLE, the FORKID bit set, and optionally the
/// ANYONECANPAY modifier.
pub fn is_permitted_sighash_type(sighash_type: u8) -> bool {
    let base = (sighash_type as u32) & !(SIGHASH_ANYONECANPAY | SIGHASH_FORKID);
    (sighash_type as u32) & SIGHASH_FORKID != 0 && (SIGHASH_ALL..=SIGHASH_SINGLE).contains(&base)
}

/// Split a bitcoin-encoded signature into its DER body and trailing
/// sighash-type byte. Returns `None` for the empty signature.
pub fn split_bitcoin_signature(bitcoin_signature: &[u8]) -> Option<(&[u8], u8)> {
    let (&sighash_type, der) = bitcoin_signature.split_last()?;
    Some((der, sighash_type))
}

/// Check that a bitcoin-encoded signature (DER body plus sighash-type
/// byte) is strictly encoded: canonical DER, low S, permitted sighash
/// type.
pub fn is_valid_signature_encoding(bitcoin_signature: &[u8]) -> bool {
    match split_bitcoin_signature(bitcoin_signature) {
        Some((der, sighash_type)) => {
            is_permitted_sighash_type(sighash_type) && is_strict_der_low_s(der)
        }
        None => false,
    }
}

/// Strict DER structure check with the low-S requirement, over the DER
/// body alone (no sighash byte).
fn is_strict_der_low_s(sig: &[u8]) -> bool {
    let sig_len = sig.len();

    // 0x30 <len> 0x02 <r_len> <r> 0x02 <s_len> <s>
    if sig_len < 8 || sig_len > 72 {
        return false;
    }
    if sig[0] != 0x30 {
        return false;
    }
    if sig[1] as usize != sig_len - 2 {
        return false;
    }

    let r_len = sig[3] as usize;
    let s_type_offset = 4 + r_len;
    let s_len_offset = s_type_offset + 1;
    if s_type_offset >= sig_len || s_len_offset >= sig_len {
        return false;
    }

    let s_offset = s_len_offset + 1;
    let s_len = sig[s_len_offset] as usize;
    if s_offset + s_len != sig_len {
        return false;
    }

    // R: positive integer, no unnecessary padding
    if sig[2] != 0x02 {
        return false;
    }
    if r_len == 0 {
        return false;
    }
    if sig[4] & 0x80 != 0 {
        return false;
    }
    if r_len > 1 && sig[4] == 0x00 && sig[5] & 0x80 == 0 {
        return false;
    }

    // S: positive integer, no unnecessary padding
    if sig[s_type_offset] != 0x02 {
        return false;
    }
    if s_len == 0 {
        return false;
    }
    if sig[s_offset] & 0x80 != 0 {
        return false;
    }
    if s_len > 1 && sig[s_offset] == 0x00 && sig[s_offset + 1] & 0x80 == 0 {
        return false;
    }

    // Low-S: S must not exceed half the secp256k1 group order
    let half_order = BigInt::parse_bytes(
        b"7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0",
        16,
    )
    .expect("half order constant parses");
    let s_value = BigInt::from_bytes_be(num_bigint::Sign::Plus, &sig[s_offset..s_offset + s_len]);
    s_value <= half_order
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimal structurally valid DER: r = 1, s = 1
    const MINIMAL_DER: [u8; 8] = [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01];

    fn with_sighash(der: &[u8], sighash_type: u8) -> Vec<u8> {
        let mut out = der.to_vec();
        out.push(sighash_type);
        out
    }

    #[test]
    fn test_public_key_encodings() {
        assert!(is_valid_public_key_encoding(&[&[0x02u8][..], &[0u8; 32]].concat()));
        assert!(is_valid_public_key_encoding(&[&[0x03u8][..], &[0u8; 32]].concat()));
        assert!(is_valid_public_key_encoding(&[&[0x04u8][..], &[0u8; 64]].concat()));
        // Wrong prefix
        assert!(!is_valid_public_key_encoding(&[&[0x05u8][..], &[0u8; 32]].concat()));
        // Wrong lengths
        assert!(!is_valid_public_key_encoding(&[0x02; 32]));
        assert!(!is_valid_public_key_encoding(&[0x04; 33]));
        assert!(!is_valid_public_key_encoding(&[]));
    }

    #[test]
    fn test_permitted_sighash_types() {
        for byte in [0x41, 0x42, 0x43, 0xc1, 0xc2, 0xc3] {
            assert!(is_permitted_sighash_type(byte), "0x{:02x}", byte);
        }
        for byte in [0x00, 0x01, 0x02, 0x03, 0x40, 0x44, 0x81, 0xc0, 0xc4] {
            assert!(!is_permitted_sighash_type(byte), "0x{:02x}", byte);
        }
    }

    #[test]
    fn test_valid_signature_encoding() {
        assert!(is_valid_signature_encoding(&with_sighash(&MINIMAL_DER, 0x41)));
        assert!(is_valid_signature_encoding(&with_sighash(&MINIMAL_DER, 0xc3)));
    }

    #[test]
    fn test_rejects_bad_sighash_byte() {
        // Legacy (non-FORKID) sighash types are not permitted
        assert!(!is_valid_signature_encoding(&with_sighash(&MINIMAL_DER, 0x01)));
    }

    #[test]
    fn test_rejects_empty_signature() {
        assert!(!is_valid_signature_encoding(&[]));
    }

    #[test]
    fn test_rejects_wrong_sequence_tag() {
        let mut der = MINIMAL_DER;
        der[0] = 0x31;
        assert!(!is_valid_signature_encoding(&with_sighash(&der, 0x41)));
    }

    #[test]
    fn test_rejects_negative_r() {
        let mut der = MINIMAL_DER;
        der[4] = 0x80;
        assert!(!is_valid_signature_encoding(&with_sighash(&der, 0x41)));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let mut der = MINIMAL_DER;
        der[1] = 0x07;
        assert!(!is_valid_signature_encoding(&with_sighash(&der, 0x41)));
    }

    #[test]
    fn test_rejects_high_s() {
        // S = curve order - 1, well above the half order
        let high_s = hex::decode(
            "3026020101022100fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140",
        )
        .unwrap();
        assert!(!is_valid_signature_encoding(&with_sighash(&high_s, 0x41)));
    }

    #[test]
    fn test_rejects_r_padding() {
        // R = 0x0001 has an unnecessary leading zero
        let der = [0x30, 0x07, 0x02, 0x02, 0x00, 0x01, 0x02, 0x01, 0x01];
        assert!(!is_valid_signature_encoding(&with_sighash(&der, 0x41)));
    }

    #[test]
    fn test_split_bitcoin_signature() {
        let full = with_sighash(&MINIMAL_DER, 0x41);
        let (der, sighash_type) = split_bitcoin_signature(&full).unwrap();
        assert_eq!(der, &MINIMAL_DER);
        assert_eq!(sighash_type, 0x41);
        assert!(split_bitcoin_signature(&[]).is_none());
    }
}
