/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction structure is invalid (e.g. an out-of-range input index).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),

    /// An error occurred during binary or hex serialization.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// An underlying script error (forwarded from `bch-script`).
    #[error("script error: {0}")]
    Script(#[from] bch_script::ScriptError),

    /// An underlying primitives error (forwarded from `bch-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] bch_primitives::PrimitivesError),
}
