//! Transaction model for the BCH authentication VM.
//!
//! Provides inputs, outputs, wire-format serialization, the
//! per-transaction hash precomputations used by the signing
//! serialization, and construction of [`bch_script::vm::AuthenticationProgram`]
//! values from a transaction, an input index, and the output being spent.

pub mod input;
pub mod output;
pub mod transaction;

mod error;
pub use error::TransactionError;
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use transaction::Transaction;
