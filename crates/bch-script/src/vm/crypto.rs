//! Crypto provider interfaces for the common instruction set.
//!
//! The VM reaches hashing and signature verification only through these
//! traits, so alternative providers (hardware, test doubles) can be
//! substituted without touching the opcode table. Providers must be
//! reentrant: they own no mutable state exposed to the VM.

use bch_primitives::{ecdsa, hash};

/// SHA-256 provider.
pub trait Sha256 {
    /// Hash the input to a 32-byte digest.
    fn hash(&self, data: &[u8]) -> [u8; 32];
}

/// RIPEMD-160 provider.
pub trait Ripemd160 {
    /// Hash the input to a 20-byte digest.
    fn hash(&self, data: &[u8]) -> [u8; 20];
}

/// secp256k1 signature verification provider.
pub trait Secp256k1 {
    /// Verify a strict-DER, low-S signature over a 32-byte digest.
    fn verify_signature_der_low_s(
        &self,
        signature: &[u8],
        public_key: &[u8],
        digest: &[u8; 32],
    ) -> bool;
}

/// The default software providers, backed by `bch-primitives`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCrypto;

impl Sha256 for StandardCrypto {
    fn hash(&self, data: &[u8]) -> [u8; 32] {
        hash::sha256(data)
    }
}

impl Ripemd160 for StandardCrypto {
    fn hash(&self, data: &[u8]) -> [u8; 20] {
        hash::ripemd160(data)
    }
}

impl Secp256k1 for StandardCrypto {
    fn verify_signature_der_low_s(
        &self,
        signature: &[u8],
        public_key: &[u8],
        digest: &[u8; 32],
    ) -> bool {
        ecdsa::verify_der_low_s(signature, public_key, digest)
    }
}
