//! Review queue errors

use thiserror::Error;

use crate::record::ReviewDecision;

/// Errors from the review queue
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("No flagged record for transaction: {0}")]
    RecordNotFound(String),

    #[error("Transaction {transaction_id} already reviewed: {decided} by {reviewer_id}")]
    ConflictingReview {
        transaction_id: String,
        decided: ReviewDecision,
        reviewer_id: String,
    },

    #[error("User {0} lacks the required capability")]
    NotAuthorized(String),
}

/// Result type for review operations
pub type ReviewResult<T> = Result<T, ReviewError>;
