//! ECDSA verification over secp256k1 for script signature checking.
//!
//! Consensus requires signatures to be strict DER with a low S value, so
//! verification here rejects any signature whose S lies in the upper half
//! of the curve order instead of silently normalizing it. All functions
//! are stateless and may be called from concurrent evaluations.

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature, VerifyingKey};

/// Verify a DER-encoded ECDSA signature against a 32-byte message digest.
///
/// The signature must parse as strict DER and carry a low S value; the
/// public key must be a valid SEC1 encoding (compressed or uncompressed).
/// Any parse failure or high-S signature yields `false` rather than an
/// error, matching consensus verification semantics.
///
/// # Arguments
/// * `signature_der` - DER-encoded signature without a sighash-type byte.
/// * `public_key` - SEC1-encoded public key (33 or 65 bytes).
/// * `digest` - The 32-byte message digest that was signed.
///
/// # Returns
/// `true` if the signature is valid for this digest and public key.
pub fn verify_der_low_s(signature_der: &[u8], public_key: &[u8], digest: &[u8; 32]) -> bool {
    let signature = match Signature::from_der(signature_der) {
        Ok(sig) => sig,
        Err(_) => return false,
    };

    // normalize_s returns Some only when S was in the upper half
    if signature.normalize_s().is_some() {
        return false;
    }

    let verifying_key = match VerifyingKey::from_sec1_bytes(public_key) {
        Ok(vk) => vk,
        Err(_) => return false,
    };

    verifying_key.verify_prehash(digest, &signature).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::signature::hazmat::PrehashSigner;
    use k256::ecdsa::SigningKey;

    fn test_key() -> SigningKey {
        let key_bytes =
            hex::decode("0000000000000000000000000000000000000000000000000000000000000001")
                .unwrap();
        SigningKey::from_slice(&key_bytes).unwrap()
    }

    #[test]
    fn test_verify_valid_signature() {
        let signing_key = test_key();
        let digest = crate::hash::sha256d(b"authorize this input");
        let signature: Signature = signing_key.sign_prehash(&digest).unwrap();

        let public_key = signing_key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec();

        assert!(verify_der_low_s(
            signature.to_der().as_bytes(),
            &public_key,
            &digest
        ));
    }

    #[test]
    fn test_verify_rejects_wrong_digest() {
        let signing_key = test_key();
        let digest = crate::hash::sha256d(b"authorize this input");
        let other_digest = crate::hash::sha256d(b"authorize another input");
        let signature: Signature = signing_key.sign_prehash(&digest).unwrap();

        let public_key = signing_key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec();

        assert!(!verify_der_low_s(
            signature.to_der().as_bytes(),
            &public_key,
            &other_digest
        ));
    }

    #[test]
    fn test_verify_rejects_high_s() {
        // Structurally valid DER with S = curve order - 1 (upper half)
        let der = hex::decode(
            "3026020101022100fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140",
        )
        .unwrap();
        let signing_key = test_key();
        let public_key = signing_key
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec();
        let digest = [0u8; 32];

        assert!(!verify_der_low_s(&der, &public_key, &digest));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let digest = [0u8; 32];
        assert!(!verify_der_low_s(&[0x30, 0x00], &[0x02; 33], &digest));
        assert!(!verify_der_low_s(&[], &[], &digest));
    }
}
