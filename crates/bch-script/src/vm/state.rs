//! Program state for the authentication VM.
//!
//! State is layered as capability traits so operators declare only what
//! they consume: the generic runtime needs [`MinimumState`], the common
//! stack operators add [`StackState`] and [`ErrorState`], and the crypto
//! operators use the full [`CommonProgramState`] with its read-only
//! per-input [`ExternalState`].

use super::VmError;

/// The minimal state the dispatch loop requires: an instruction pointer
/// into an immutable script.
pub trait MinimumState {
    /// Byte index of the next instruction.
    fn ip(&self) -> usize;
    /// Set the instruction pointer.
    fn set_ip(&mut self, ip: usize);
    /// The script executing in this pass.
    fn script(&self) -> &[u8];
}

/// State carrying the data stack of byte-array elements.
pub trait StackState {
    /// The stack, bottom to top.
    fn stack(&self) -> &[Vec<u8>];
    /// Mutable access to the stack.
    fn stack_mut(&mut self) -> &mut Vec<Vec<u8>>;
}

/// State carrying the latched execution error.
pub trait ErrorState {
    /// The latched error, if any.
    fn error(&self) -> Option<VmError>;
    /// Latch an error. The first error recorded wins.
    fn set_error(&mut self, error: VmError);
}

/// The read-only transaction context of the input under evaluation.
///
/// All hashes are precomputed once per transaction (or per input for the
/// corresponding-output hash) so evaluation itself never re-serializes
/// the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalState {
    /// Height of the block containing the spending transaction.
    pub block_height: u32,
    /// Median-time-past of the block containing the spending transaction.
    pub block_time: u32,
    /// The spending transaction's locktime.
    pub locktime: u32,
    /// The spending transaction's version.
    pub version: u32,
    /// sha256d of every input's outpoint (txid || index LE), concatenated.
    pub transaction_outpoints_hash: [u8; 32],
    /// sha256d of every output's serialization, concatenated.
    pub transaction_outputs_hash: [u8; 32],
    /// sha256d of every input's sequence number (LE), concatenated.
    pub transaction_sequence_numbers_hash: [u8; 32],
    /// sha256d of the output at this input's index, or 32 zero bytes when
    /// no such output exists.
    pub corresponding_output_hash: [u8; 32],
    /// Transaction hash of the outpoint being spent.
    pub outpoint_transaction_hash: [u8; 32],
    /// Output index of the outpoint being spent.
    pub outpoint_index: u32,
    /// Value in satoshis of the outpoint being spent.
    pub outpoint_value: u64,
    /// Sequence number of the input under evaluation.
    pub sequence_number: u32,
}

/// No code separator has executed yet in this pass.
pub const NO_CODE_SEPARATOR: isize = -1;

/// The program state evaluated by the common (Bitcoin Cash) instruction set.
///
/// One owned state per pass: `step_mutate` mutates it in place, while
/// `step`/`evaluate`/`debug` deep-clone first so the caller's copy is
/// never observably modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonProgramState {
    /// Byte index of the next instruction in `script`.
    pub ip: usize,
    /// The script executing in this pass.
    pub script: Vec<u8>,
    /// The data stack, bottom to top.
    pub stack: Vec<Vec<u8>>,
    /// The latched execution error, if any.
    pub error: Option<VmError>,
    /// Index of the most recent OP_CODESEPARATOR byte, or -1.
    pub last_code_separator: isize,
    /// Read-only per-input transaction context.
    pub external: ExternalState,
}

impl CommonProgramState {
    /// Create a fresh program state for one evaluation pass.
    pub fn new(script: Vec<u8>, stack: Vec<Vec<u8>>, external: ExternalState) -> Self {
        CommonProgramState {
            ip: 0,
            script,
            stack,
            error: None,
            last_code_separator: NO_CODE_SEPARATOR,
            external,
        }
    }

    /// The portion of the script signed by OP_CHECKSIG: everything after
    /// the most recent code separator.
    pub fn signed_script(&self) -> &[u8] {
        let start = (self.last_code_separator + 1) as usize;
        &self.script[start.min(self.script.len())..]
    }
}

impl MinimumState for CommonProgramState {
    fn ip(&self) -> usize {
        self.ip
    }

    fn set_ip(&mut self, ip: usize) {
        self.ip = ip;
    }

    fn script(&self) -> &[u8] {
        &self.script
    }
}

impl StackState for CommonProgramState {
    fn stack(&self) -> &[Vec<u8>] {
        &self.stack
    }

    fn stack_mut(&mut self) -> &mut Vec<Vec<u8>> {
        &mut self.stack
    }
}

impl ErrorState for CommonProgramState {
    fn error(&self) -> Option<VmError> {
        self.error
    }

    fn set_error(&mut self, error: VmError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

impl ExternalState {
    /// An all-zero context, useful when evaluating scripts that use no
    /// transaction introspection (and in tests).
    pub fn empty() -> Self {
        ExternalState {
            block_height: 0,
            block_time: 0,
            locktime: 0,
            version: 0,
            transaction_outpoints_hash: [0; 32],
            transaction_outputs_hash: [0; 32],
            transaction_sequence_numbers_hash: [0; 32],
            corresponding_output_hash: [0; 32],
            outpoint_transaction_hash: [0; 32],
            outpoint_index: 0,
            outpoint_value: 0,
            sequence_number: 0,
        }
    }
}
