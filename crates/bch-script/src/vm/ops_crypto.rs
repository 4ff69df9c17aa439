//! Cryptographic opcodes and the undefined-opcode fallback.
//!
//! These operators are specific to [`CommonProgramState`]: they consume
//! the per-input transaction context and the code-separator position,
//! reaching hashing and curve arithmetic only through the provider
//! traits in [`super::crypto`].

use std::sync::Arc;

use crate::opcodes::{opcode_name, OP_CHECKSIG, OP_CODESEPARATOR, OP_HASH160};

use super::crypto::{Ripemd160, Secp256k1, Sha256};
use super::encoding::{
    is_valid_public_key_encoding, is_valid_signature_encoding, split_bitcoin_signature,
};
use super::instruction_set::{Operator, Rendering};
use super::scriptnum::ScriptNumber;
use super::sighash::signing_serialization;
use super::state::{CommonProgramState, ErrorState};
use super::VmError;

/// OP_HASH160: pop the top item and push its RIPEMD160(SHA256(x)) digest.
pub fn op_hash160(
    sha256: Arc<dyn Sha256>,
    ripemd160: Arc<dyn Ripemd160>,
) -> Operator<CommonProgramState> {
    Operator::new(
        Rendering::fixed(opcode_name(OP_HASH160)),
        Rendering::fixed("Replace the top item on the stack with its RIPEMD160(SHA256()) digest."),
        move |state: &mut CommonProgramState| {
            let Some(element) = state.stack.pop() else {
                state.set_error(VmError::EmptyStack);
                return;
            };
            let digest = ripemd160.hash(&sha256.hash(&element));
            state.stack.push(digest.to_vec());
        },
    )
}

/// OP_CODESEPARATOR: record this instruction's position so OP_CHECKSIG
/// covers only the script bytes after it.
pub fn op_code_separator() -> Operator<CommonProgramState> {
    Operator::new(
        Rendering::fixed(opcode_name(OP_CODESEPARATOR)),
        Rendering::fixed("Mark this position as the start of the signed script code."),
        |state: &mut CommonProgramState| {
            // The opcode byte just consumed sits at ip - 1.
            state.last_code_separator = state.ip as isize - 1;
        },
    )
}

/// OP_CHECKSIG: pop a public key and a bitcoin-encoded signature, verify
/// the signature over the signing-serialization digest, and push 1 or 0.
pub fn op_checksig(
    sha256: Arc<dyn Sha256>,
    secp256k1: Arc<dyn Secp256k1>,
) -> Operator<CommonProgramState> {
    Operator::new(
        Rendering::fixed(opcode_name(OP_CHECKSIG)),
        Rendering::fixed(
            "Verify the signature against the public key using the transaction's signing serialization.",
        ),
        move |state: &mut CommonProgramState| {
            let Some(public_key) = state.stack.pop() else {
                state.set_error(VmError::EmptyStack);
                return;
            };
            let Some(bitcoin_signature) = state.stack.pop() else {
                state.set_error(VmError::EmptyStack);
                return;
            };

            if !is_valid_public_key_encoding(&public_key) {
                state.set_error(VmError::InvalidPublicKeyEncoding);
                return;
            }
            if !is_valid_signature_encoding(&bitcoin_signature) {
                state.set_error(VmError::InvalidSignatureEncoding);
                return;
            }
            let Some((der, sighash_type)) = split_bitcoin_signature(&bitcoin_signature) else {
                state.set_error(VmError::InvalidSignatureEncoding);
                return;
            };

            let preimage = signing_serialization(
                &state.external,
                state.signed_script(),
                sighash_type as u32,
            );
            let digest = sha256.hash(&sha256.hash(&preimage));
            let valid = secp256k1.verify_signature_der_low_s(der, &public_key, &digest);

            let result = if valid { 1 } else { 0 };
            state.stack.push(ScriptNumber::new(result).to_bytes());
        },
    )
}

/// The fallback operator: latch `UnknownOpcode`.
///
/// Its asm rendering reads the opcode byte back out of the script at
/// `ip - 1`, which is why dispatch must leave the consumed byte there.
pub fn undefined_operator() -> Operator<CommonProgramState> {
    Operator::new(
        Rendering::dynamic(|state: &CommonProgramState| {
            match state.ip.checked_sub(1).and_then(|index| state.script.get(index)) {
                Some(&opcode) => opcode_name(opcode),
                None => "OP_INVALID".to_string(),
            }
        }),
        Rendering::fixed("This opcode is not defined by this instruction set."),
        |state: &mut CommonProgramState| {
            state.set_error(VmError::UnknownOpcode);
        },
    )
}
