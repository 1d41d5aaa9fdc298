//! ReliefGuard Ledger Accessor
//!
//! Read-only view over completed/pending transactions for a given actor and
//! time window. The fraud engine consumes this boundary through the
//! [`LedgerAccessor`] trait so the core can be tested with the in-memory
//! implementation and swapped onto any storage engine.

pub mod accessor;
pub mod error;
pub mod memory;

pub use accessor::LedgerAccessor;
pub use error::{LedgerError, LedgerResult};
pub use memory::InMemoryLedger;
