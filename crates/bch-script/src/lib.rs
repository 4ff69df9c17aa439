//! Bitcoin Cash script type and authentication virtual machine.
//!
//! Provides the `Script` byte-vector type, opcode definitions, and a
//! step-wise authentication VM that evaluates unlocking/locking script
//! pairs against a fixed per-input transaction context.
//!
//! The VM is instruction-set-generic: the dispatch loop, clone/step/debug
//! discipline, and trace machinery in [`vm`] work for any program state
//! type, while [`vm::common_instruction_set`] supplies the Bitcoin Cash
//! opcode table over the standard crypto providers.

pub mod opcodes;
pub mod script;
pub mod vm;

mod error;
pub use error::ScriptError;
pub use script::Script;
