/// Error types for script construction and decoding.
///
/// Failures *during* VM execution are not represented here: those latch
/// into the program state as a [`crate::vm::VmError`] value instead.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Not enough data in the script to complete a push operation.
    #[error("not enough data")]
    DataTooSmall,

    /// Push data exceeds the maximum allowed element size.
    #[error("data too big")]
    DataTooBig,

    /// Error from the primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] bch_primitives::PrimitivesError),
}
