//! Engine errors

use thiserror::Error;

use reliefguard_core::TransactionError;

/// Errors from the evaluation pipeline
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    InvalidTransaction(#[from] TransactionError),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
