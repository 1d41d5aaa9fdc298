//! Case manager errors

use thiserror::Error;

use crate::report::ReportStatus;

/// Errors from the case manager
#[derive(Debug, Error)]
pub enum CaseError {
    #[error("Report not found: {0}")]
    ReportNotFound(String),

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition {
        from: ReportStatus,
        to: ReportStatus,
    },

    #[error("User {0} lacks the required capability")]
    NotAuthorized(String),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Escalation not allowed: {0}")]
    EscalationNotAllowed(String),

    #[error("Report is not open for investigation updates (status: {0})")]
    NotOpenForUpdate(ReportStatus),
}

/// Result type for case operations
pub type CaseResult<T> = Result<T, CaseError>;
