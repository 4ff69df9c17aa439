//! Stack and equality opcodes.

use crate::opcodes::{opcode_name, OP_DUP, OP_EQUAL, OP_EQUALVERIFY, OP_VERIFY};

use super::instruction_set::{Operator, Rendering};
use super::scriptnum::{as_bool, ScriptNumber};
use super::state::{ErrorState, StackState};
use super::VmError;

/// Pop the top stack item, or latch `EmptyStack`.
fn pop<S: StackState + ErrorState>(state: &mut S) -> Option<Vec<u8>> {
    match state.stack_mut().pop() {
        Some(item) => Some(item),
        None => {
            state.set_error(VmError::EmptyStack);
            None
        }
    }
}

fn equal_inner<S: StackState + ErrorState>(state: &mut S) {
    let Some(element) = pop(state) else { return };
    let Some(other) = pop(state) else { return };
    let result = if element == other { 1 } else { 0 };
    state.stack_mut().push(ScriptNumber::new(result).to_bytes());
}

fn verify_inner<S: StackState + ErrorState>(state: &mut S) {
    let Some(element) = pop(state) else { return };
    if !as_bool(&element) {
        state.set_error(VmError::FailedVerify);
    }
}

/// OP_DUP: push a copy of the top stack item.
pub fn op_dup<S>() -> Operator<S>
where
    S: StackState + ErrorState + 'static,
{
    Operator::new(
        Rendering::fixed(opcode_name(OP_DUP)),
        Rendering::fixed("Duplicate the top item on the stack."),
        |state: &mut S| match state.stack().last().cloned() {
            Some(top) => state.stack_mut().push(top),
            None => state.set_error(VmError::EmptyStack),
        },
    )
}

/// OP_VERIFY: pop the top item and fail unless it is truthy.
pub fn op_verify<S>() -> Operator<S>
where
    S: StackState + ErrorState + 'static,
{
    Operator::new(
        Rendering::fixed(opcode_name(OP_VERIFY)),
        Rendering::fixed("Verify that the top item on the stack is truthy."),
        verify_inner,
    )
}

/// OP_EQUAL: pop two items and push 1 if byte-identical, 0 otherwise.
pub fn op_equal<S>() -> Operator<S>
where
    S: StackState + ErrorState + 'static,
{
    Operator::new(
        Rendering::fixed(opcode_name(OP_EQUAL)),
        Rendering::fixed("Compare the top two items on the stack for equality."),
        equal_inner,
    )
}

/// OP_EQUALVERIFY: OP_EQUAL composed with OP_VERIFY.
pub fn op_equalverify<S>() -> Operator<S>
where
    S: StackState + ErrorState + 'static,
{
    Operator::new(
        Rendering::fixed(opcode_name(OP_EQUALVERIFY)),
        Rendering::fixed("Verify that the top two items on the stack are equal."),
        |state: &mut S| {
            equal_inner(state);
            if state.error().is_none() {
                verify_inner(state);
            }
        },
    )
}
