//! The instruction-set abstraction.
//!
//! An [`InstructionSet`] is everything the generic runtime needs to drive
//! one kind of virtual machine: a `before` hook run ahead of every
//! instruction (canonically advancing the instruction pointer), a halting
//! predicate, a sparse 256-entry opcode table, and an `undefined` fallback
//! operator dispatched when no entry matches.

/// How an operator renders its `asm` or `description` text: either a
/// constant string or a function of the post-instruction state.
pub enum Rendering<S> {
    /// A constant rendering.
    Static(String),
    /// A rendering computed from the state the operator produced.
    Dynamic(Box<dyn Fn(&S) -> String>),
}

impl<S> Rendering<S> {
    /// A constant rendering.
    pub fn fixed(text: impl Into<String>) -> Self {
        Rendering::Static(text.into())
    }

    /// A state-dependent rendering.
    pub fn dynamic(f: impl Fn(&S) -> String + 'static) -> Self {
        Rendering::Dynamic(Box::new(f))
    }

    /// Produce the text for the given state.
    pub fn render(&self, state: &S) -> String {
        match self {
            Rendering::Static(text) => text.clone(),
            Rendering::Dynamic(f) => f(state),
        }
    }
}

/// One opcode's behavior: its trace renderings and its state transition.
pub struct Operator<S> {
    /// Assembly rendering for debug traces.
    pub asm: Rendering<S>,
    /// Human-readable description for debug traces.
    pub description: Rendering<S>,
    /// The state transition. Runs after the instruction set's `before`
    /// hook, so the opcode byte it was dispatched on sits at `ip - 1`.
    pub operation: Box<dyn Fn(&mut S)>,
}

impl<S> Operator<S> {
    /// Create an operator from its renderings and operation.
    pub fn new(
        asm: Rendering<S>,
        description: Rendering<S>,
        operation: impl Fn(&mut S) + 'static,
    ) -> Self {
        Operator {
            asm,
            description,
            operation: Box::new(operation),
        }
    }

    /// Run the operation on the given state.
    pub fn apply(&self, state: &mut S) {
        (self.operation)(state)
    }
}

/// A complete instruction set over program states of type `S`.
pub struct InstructionSet<S> {
    before: Box<dyn Fn(&mut S)>,
    continues: Box<dyn Fn(&S) -> bool>,
    undefined: Operator<S>,
    operators: Vec<Option<Operator<S>>>,
}

impl<S> InstructionSet<S> {
    /// Create an instruction set with an empty opcode table.
    ///
    /// # Arguments
    /// * `before` - Pre-instruction hook; canonically advances `ip` by one
    ///   so operator bodies observe the post-opcode position.
    /// * `continues` - Loop predicate; evaluation halts when it returns
    ///   false.
    /// * `undefined` - Fallback operator for opcode bytes with no entry.
    pub fn new(
        before: impl Fn(&mut S) + 'static,
        continues: impl Fn(&S) -> bool + 'static,
        undefined: Operator<S>,
    ) -> Self {
        let mut operators = Vec::with_capacity(256);
        operators.resize_with(256, || None);
        InstructionSet {
            before: Box::new(before),
            continues: Box::new(continues),
            undefined,
            operators,
        }
    }

    /// Register an operator for an opcode, replacing any existing entry.
    pub fn define(&mut self, opcode: u8, operator: Operator<S>) {
        self.operators[opcode as usize] = Some(operator);
    }

    /// Look up the operator for an opcode, falling back to `undefined`.
    pub fn operator(&self, opcode: u8) -> &Operator<S> {
        self.operators[opcode as usize]
            .as_ref()
            .unwrap_or(&self.undefined)
    }

    /// The fallback operator for unrecognized opcodes.
    pub fn undefined(&self) -> &Operator<S> {
        &self.undefined
    }

    /// Run the pre-instruction hook.
    pub fn apply_before(&self, state: &mut S) {
        (self.before)(state)
    }

    /// Whether evaluation of this state should continue.
    pub fn should_continue(&self, state: &S) -> bool {
        (self.continues)(state)
    }
}
