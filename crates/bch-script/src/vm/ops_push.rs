//! The push opcode family.
//!
//! Three sub-families: the OP_N constant-number pushes, the constant
//! data pushes `OP_DATA_1..OP_DATA_75`, and the variable-length
//! `OP_PUSHDATA1/2/4` pushes with length-field minimality enforcement.
//! All are generic over any state carrying a script, a stack, and an
//! error slot.

use crate::opcodes::opcode_name;

use super::instruction_set::{Operator, Rendering};
use super::scriptnum::ScriptNumber;
use super::state::{ErrorState, MinimumState, StackState};
use super::{VmError, MAX_SCRIPT_ELEMENT_SIZE};

/// Render a push operator's asm as `NAME 0x<pushed bytes>`, falling back
/// to the bare name when the push failed.
fn render_push<S: StackState + ErrorState>(name: &str, state: &S) -> String {
    if state.error().is_none() {
        if let Some(top) = state.stack().last() {
            return format!("{} 0x{}", name, hex::encode(top));
        }
    }
    name.to_string()
}

/// An OP_N operator pushing the constant Script Number `value`
/// (`OP_1NEGATE` through `OP_16`). Never fails.
pub fn op_push_number<S>(opcode: u8, value: i64) -> Operator<S>
where
    S: StackState + 'static,
{
    Operator::new(
        Rendering::fixed(opcode_name(opcode)),
        Rendering::fixed(format!("Push the Script Number {} onto the stack.", value)),
        move |state: &mut S| {
            state.stack_mut().push(ScriptNumber::new(value).to_bytes());
        },
    )
}

/// A constant data push (`OP_DATA_n`): push the next `length` script
/// bytes and advance past them. Fails with `MalformedPush` when the
/// script ends early.
pub fn op_push_data_constant<S>(length: u8) -> Operator<S>
where
    S: MinimumState + StackState + ErrorState + 'static,
{
    let name = opcode_name(length);
    let payload_len = length as usize;
    Operator::new(
        Rendering::dynamic(move |state: &S| render_push(&name, state)),
        Rendering::fixed(format!(
            "Push the next {} byte{} onto the stack.",
            payload_len,
            if payload_len == 1 { "" } else { "s" }
        )),
        move |state: &mut S| {
            let start = state.ip();
            let end = start + payload_len;
            if end > state.script().len() {
                state.set_error(VmError::MalformedPush);
                return;
            }
            let data = state.script()[start..end].to_vec();
            state.stack_mut().push(data);
            state.set_ip(end);
        },
    )
}

/// A variable-length push (`OP_PUSHDATA1/2/4`) with a `width`-byte
/// little-endian length field.
///
/// `minimum` is the smallest payload length this encoding is allowed to
/// carry (76 / 256 / 65536): shorter payloads have a shorter encoding
/// available and fail with `NonMinimalPush`. Since the element size cap
/// is 520 bytes, OP_PUSHDATA4 can never succeed.
pub fn op_push_data_variable<S>(opcode: u8, width: usize, minimum: usize) -> Operator<S>
where
    S: MinimumState + StackState + ErrorState + 'static,
{
    let name = opcode_name(opcode);
    Operator::new(
        Rendering::dynamic(move |state: &S| render_push(&name, state)),
        Rendering::fixed(format!(
            "Push the number of bytes indicated by the next {} byte{} onto the stack.",
            width,
            if width == 1 { "" } else { "s" }
        )),
        move |state: &mut S| {
            let ip = state.ip();
            let script_len = state.script().len();
            if ip + width > script_len {
                state.set_error(VmError::MalformedPush);
                return;
            }

            let mut length = 0usize;
            for i in 0..width {
                length |= (state.script()[ip + i] as usize) << (8 * i);
            }

            if ip + width + length > script_len {
                state.set_error(VmError::MalformedPush);
                return;
            }
            if length < minimum {
                state.set_error(VmError::NonMinimalPush);
                return;
            }
            if length > MAX_SCRIPT_ELEMENT_SIZE {
                state.set_error(VmError::ExceedsMaximumPush);
                return;
            }

            let data = state.script()[ip + width..ip + width + length].to_vec();
            state.stack_mut().push(data);
            state.set_ip(ip + width + length);
        },
    )
}
