//! Ledger accessor errors

use thiserror::Error;

/// Errors from the ledger boundary
#[derive(Debug, Error)]
pub enum LedgerError {
    /// History could not be read (backing store down, replica lag, ...).
    /// Evaluation degrades instead of blocking on this error.
    #[error("Transaction history unavailable: {0}")]
    Unavailable(String),

    #[error("Duplicate transaction id: {0}")]
    DuplicateId(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
