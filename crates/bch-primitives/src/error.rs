/// Unified error type for all primitives operations.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    /// Unexpected end of input data.
    #[error("unexpected end of data")]
    UnexpectedEof,

    /// Invalid hexadecimal string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Invalid public key data.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid signature data.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Elliptic curve error (from k256).
    #[error("elliptic curve error: {0}")]
    EllipticCurve(#[from] k256::elliptic_curve::Error),
}
