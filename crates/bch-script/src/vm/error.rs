/// Execution errors latched into a program state.
///
/// The first error recorded halts the evaluation loop; subsequent steps
/// leave the state untouched. These are values, never panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VmError {
    /// An operation required more stack items than were available.
    #[error("tried to read from an empty stack")]
    EmptyStack,

    /// A push operation ran past the end of the script.
    #[error("push operation runs past the end of the script")]
    MalformedPush,

    /// A push used a longer encoding than necessary.
    #[error("push operation uses a non-minimal encoding")]
    NonMinimalPush,

    /// A push exceeded the maximum element size.
    #[error("push operation exceeds the maximum element size")]
    ExceedsMaximumPush,

    /// The opcode byte has no entry in the instruction set.
    #[error("unknown opcode")]
    UnknownOpcode,

    /// OP_VERIFY consumed a non-truthy value.
    #[error("verification failed")]
    FailedVerify,

    /// OP_RETURN was called.
    #[error("script called return")]
    CalledReturn,

    /// A public key did not use a valid compressed or uncompressed encoding.
    #[error("invalid public key encoding")]
    InvalidPublicKeyEncoding,

    /// A signature was not strict-DER, low-S, with a permitted sighash type.
    #[error("invalid signature encoding")]
    InvalidSignatureEncoding,
}
