//! Evaluation results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reliefguard_detector::{Flag, Warning};
use reliefguard_risk::{Recommendation, RiskLevel};

/// The annotated outcome of evaluating one candidate transaction.
///
/// Stored by the engine keyed on the transaction id; a repeat evaluation of
/// the same id returns this stored value unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub transaction_id: String,
    pub flags: Vec<Flag>,
    pub warnings: Vec<Warning>,
    pub risk_level: RiskLevel,
    pub recommendation: Recommendation,
    /// True when history was unavailable and the evaluation failed open
    pub degraded: bool,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationResult {
    /// Did any hard signal fire?
    pub fn is_flagged(&self) -> bool {
        !self.flags.is_empty()
    }
}
