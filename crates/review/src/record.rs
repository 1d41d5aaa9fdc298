//! Flagged records awaiting (or carrying) a review decision

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use reliefguard_core::Transaction;
use reliefguard_detector::Flag;
use reliefguard_risk::RiskLevel;

/// The reviewer's verdict
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReviewDecision {
    /// The transaction may settle despite the flags
    Approve,
    /// The transaction is rejected
    Reject,
}

/// Where a record stands in the queue
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Reviewed,
}

/// One flagged transaction in the review queue.
///
/// Immutable after the decision lands; reviewed records stay in the queue
/// for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedRecord {
    pub transaction: Transaction,
    /// The flags that triggered the review requirement
    pub flags: Vec<Flag>,
    pub risk_level: RiskLevel,
    pub status: ReviewStatus,
    /// Admission order, ascending from the first enqueue
    pub enqueue_seq: u64,
    pub flagged_at: DateTime<Utc>,
    pub decision: Option<ReviewDecision>,
    pub reviewer_id: Option<String>,
    pub review_notes: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl FlaggedRecord {
    pub fn is_pending(&self) -> bool {
        self.status == ReviewStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_decision_wire_names() {
        assert_eq!(ReviewDecision::Approve.to_string(), "approve");
        assert_eq!(
            ReviewDecision::from_str("reject").unwrap(),
            ReviewDecision::Reject
        );
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ReviewStatus::Pending).unwrap(),
            "\"pending\""
        );
    }
}
