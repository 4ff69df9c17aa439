#![deny(missing_docs)]

//! Bitcoin Cash authentication VM - complete SDK.
//!
//! Re-exports all components for convenient single-crate usage.

pub use bch_primitives as primitives;
pub use bch_script as script;
pub use bch_transaction as transaction;
