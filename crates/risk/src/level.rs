//! Ordinal risk levels and the aggregation rule
//!
//! Two or more independent high-severity detections are treated as
//! categorically worse than one - independent signals are strong joint
//! evidence. Warnings never contribute: they are audit visibility only.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum_macros::{Display, EnumString};

use reliefguard_detector::{Flag, Severity, Warning};

/// Risk level - ordered from lowest to highest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskLevel {
    Low = 1,
    Medium = 2,
    High = 3,
    Critical = 4,
}

impl PartialOrd for RiskLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RiskLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::Low
    }
}

/// Combine a flag/warning set into one risk level.
///
/// - `Critical`: two or more high-severity flags
/// - `High`: exactly one high-severity flag
/// - `Medium`: at least one medium flag and no high flags
/// - `Low`: otherwise, regardless of warning count
pub fn calculate_risk_level(flags: &[Flag], _warnings: &[Warning]) -> RiskLevel {
    let high = flags.iter().filter(|f| f.severity == Severity::High).count();
    if high >= 2 {
        return RiskLevel::Critical;
    }
    if high == 1 {
        return RiskLevel::High;
    }
    if flags.iter().any(|f| f.severity == Severity::Medium) {
        return RiskLevel::Medium;
    }
    RiskLevel::Low
}
