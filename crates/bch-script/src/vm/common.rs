//! Assembly of the common (Bitcoin Cash) instruction set.

use std::sync::Arc;

use crate::opcodes::*;

use super::crypto::{Ripemd160, Secp256k1, Sha256, StandardCrypto};
use super::instruction_set::InstructionSet;
use super::ops_crypto::{op_checksig, op_code_separator, op_hash160, undefined_operator};
use super::ops_push::{op_push_data_constant, op_push_data_variable, op_push_number};
use super::ops_stack::{op_dup, op_equal, op_equalverify, op_verify};
use super::state::CommonProgramState;

/// Build the common instruction set over the given crypto providers.
///
/// The `before` hook advances `ip` past the opcode byte; the loop
/// predicate halts on a latched error or at the end of the script.
pub fn common_instruction_set(
    sha256: Arc<dyn Sha256>,
    ripemd160: Arc<dyn Ripemd160>,
    secp256k1: Arc<dyn Secp256k1>,
) -> InstructionSet<CommonProgramState> {
    let mut set = InstructionSet::new(
        |state: &mut CommonProgramState| state.ip += 1,
        |state: &CommonProgramState| state.error.is_none() && state.ip < state.script.len(),
        undefined_operator(),
    );

    set.define(OP_0, op_push_number(OP_0, 0));
    for length in OP_DATA_1..=OP_DATA_75 {
        set.define(length, op_push_data_constant(length));
    }
    set.define(OP_PUSHDATA1, op_push_data_variable(OP_PUSHDATA1, 1, 76));
    set.define(OP_PUSHDATA2, op_push_data_variable(OP_PUSHDATA2, 2, 256));
    set.define(OP_PUSHDATA4, op_push_data_variable(OP_PUSHDATA4, 4, 65536));
    set.define(OP_1NEGATE, op_push_number(OP_1NEGATE, -1));
    for n in 1..=16 {
        let opcode = OP_1 + n - 1;
        set.define(opcode, op_push_number(opcode, n as i64));
    }

    set.define(OP_VERIFY, op_verify());
    set.define(OP_DUP, op_dup());
    set.define(OP_EQUAL, op_equal());
    set.define(OP_EQUALVERIFY, op_equalverify());
    set.define(OP_HASH160, op_hash160(sha256.clone(), ripemd160));
    set.define(OP_CODESEPARATOR, op_code_separator());
    set.define(OP_CHECKSIG, op_checksig(sha256, secp256k1));

    set
}

/// The common instruction set over the default software crypto providers.
pub fn standard_instruction_set() -> InstructionSet<CommonProgramState> {
    let crypto = Arc::new(StandardCrypto);
    common_instruction_set(crypto.clone(), crypto.clone(), crypto)
}
