//! The authentication virtual machine.
//!
//! # Architecture
//!
//! The VM is split into an instruction-set-generic runtime and the Bitcoin
//! Cash instruction set built on top of it:
//!
//! - [`InstructionSet`] bundles a `before` hook, a halting predicate, a
//!   256-entry opcode dispatch table, and an `undefined` fallback operator.
//! - [`Machine`] drives any instruction set with `step_mutate`, `step`,
//!   `evaluate`, and `debug`, cloning state so callers never observe
//!   mutation.
//! - [`common_instruction_set`] wires the Bitcoin Cash opcode subset over
//!   the crypto provider traits in [`crypto`].
//! - [`program`] composes the two-pass unlock/lock evaluation with the
//!   optional P2SH redeem-script third pass.
//!
//! Execution failures are data, not panics or `Err` returns: the first
//! error latches into the program state and halts the loop.

pub mod crypto;
pub mod encoding;
pub mod program;
pub mod scriptnum;
pub mod sighash;

mod common;
mod error;
mod instruction_set;
mod machine;
mod ops_crypto;
mod ops_push;
mod ops_stack;
mod state;

pub use common::{common_instruction_set, standard_instruction_set};
pub use error::VmError;
pub use instruction_set::{InstructionSet, Operator, Rendering};
pub use machine::{Machine, Step, DEFAULT_EVALUATION_BANNER};
pub use program::{debug_program, verify_program, AuthenticationProgram, VerifyError};
pub use scriptnum::{ScriptNumError, ScriptNumber};
pub use state::{
    CommonProgramState, ErrorState, ExternalState, MinimumState, StackState,
};

/// Maximum byte length of a single pushed stack element.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

/// Maximum byte length of a Script Number encoding.
pub const MAX_SCRIPT_NUMBER_LENGTH: usize = 4;
