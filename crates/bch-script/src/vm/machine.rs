//! The instruction-set-generic VM runtime.
//!
//! `step_mutate` mutates a state in place; `step`, `evaluate`, and
//! `debug` deep-clone first, so a caller's state is never observably
//! modified. The runtime itself never fails: all failures live in the
//! state's latched error, which flips the halting predicate.

use super::instruction_set::{InstructionSet, Operator};
use super::state::MinimumState;

/// The banner recorded as the first entry of a debug trace when the
/// caller does not supply one.
pub const DEFAULT_EVALUATION_BANNER: &str = "Begin script evaluation.";

/// One entry of a debug trace: a state snapshot paired with the rendering
/// of the operator that produced it (or a synthetic banner).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<S> {
    /// Assembly rendering of the instruction that produced this state.
    /// Empty for synthetic entries.
    pub asm: String,
    /// Human-readable description of the instruction or banner.
    pub description: String,
    /// The program state after the instruction executed.
    pub state: S,
}

/// A virtual machine driving one instruction set.
pub struct Machine<S> {
    instruction_set: InstructionSet<S>,
}

impl<S: Clone + MinimumState> Machine<S> {
    /// Create a machine over the given instruction set.
    pub fn new(instruction_set: InstructionSet<S>) -> Self {
        Machine { instruction_set }
    }

    /// The instruction set this machine dispatches on.
    pub fn instruction_set(&self) -> &InstructionSet<S> {
        &self.instruction_set
    }

    /// Execute a single instruction, mutating the state in place.
    ///
    /// Applies the `before` hook, then dispatches on the byte the hook
    /// consumed (`script[ip - 1]`), which is the only legal way an
    /// operator discovers its own opcode. A halted state (error latched
    /// or end of script) is left untouched.
    pub fn step_mutate(&self, state: &mut S) {
        if !self.instruction_set.should_continue(state) {
            return;
        }
        self.dispatch(state);
    }

    /// Execute a single instruction on a deep copy, leaving the input
    /// unchanged.
    pub fn step(&self, state: &S) -> S {
        let mut working = state.clone();
        self.step_mutate(&mut working);
        working
    }

    /// Run the state to completion on a deep copy and return the final
    /// state.
    pub fn evaluate(&self, state: &S) -> S {
        let mut working = state.clone();
        while self.instruction_set.should_continue(&working) {
            self.dispatch(&mut working);
        }
        working
    }

    /// Run the state to completion, recording every intermediate state.
    ///
    /// The trace begins with a synthetic banner entry holding the initial
    /// state; each following entry snapshots the state after one
    /// instruction, tagged with that operator's `asm` and `description`
    /// (both evaluated against the post-instruction state).
    pub fn debug(&self, state: &S) -> Vec<Step<S>> {
        self.debug_with(state, DEFAULT_EVALUATION_BANNER)
    }

    /// [`Machine::debug`] with a custom initial banner.
    pub fn debug_with(&self, state: &S, initial_description: &str) -> Vec<Step<S>> {
        let mut working = state.clone();
        let mut steps = vec![Step {
            asm: String::new(),
            description: initial_description.to_string(),
            state: working.clone(),
        }];
        while self.instruction_set.should_continue(&working) {
            let operator = self.dispatch(&mut working);
            steps.push(Step {
                asm: operator.asm.render(&working),
                description: operator.description.render(&working),
                state: working.clone(),
            });
        }
        steps
    }

    /// Apply `before`, look up the operator for the consumed opcode byte,
    /// and run it. Returns the dispatched operator for trace rendering.
    fn dispatch(&self, state: &mut S) -> &Operator<S> {
        self.instruction_set.apply_before(state);
        let opcode = state
            .ip()
            .checked_sub(1)
            .and_then(|index| state.script().get(index))
            .copied();
        let operator = match opcode {
            Some(op) => self.instruction_set.operator(op),
            None => self.instruction_set.undefined(),
        };
        operator.apply(state);
        operator
    }
}
