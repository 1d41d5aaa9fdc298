//! Action policy - pure mapping from risk level to recommendation
//!
//! Medium risk is surfaced for passive monitoring (an audit trail) without
//! obstructing legitimate low-value anomalies, preserving relief-delivery
//! throughput.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use reliefguard_detector::{Flag, Warning};

use crate::level::{calculate_risk_level, RiskLevel};

/// Policy actions for an evaluated transaction
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    /// Settlement may proceed
    Allow,
    /// Settlement proceeds; the transaction stays on the audit trail
    Monitor,
    /// Settlement waits for a human decision
    Review,
    /// Settlement is rejected before funds move
    Block,
}

/// The action policy attached to an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: Action,
    /// Must be admitted to the review queue
    pub requires_review: bool,
    /// A fraud report is opened automatically
    pub auto_flag: bool,
}

impl Recommendation {
    /// The fixed risk-level-to-policy table
    pub fn for_level(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => Self {
                action: Action::Allow,
                requires_review: false,
                auto_flag: false,
            },
            RiskLevel::Medium => Self {
                action: Action::Monitor,
                requires_review: false,
                auto_flag: true,
            },
            RiskLevel::High => Self {
                action: Action::Review,
                requires_review: true,
                auto_flag: true,
            },
            RiskLevel::Critical => Self {
                action: Action::Block,
                requires_review: true,
                auto_flag: true,
            },
        }
    }
}

/// Compute the recommendation for a flag/warning set.
///
/// Pure and total: the level comes from [`calculate_risk_level`], the
/// policy from the fixed table above.
pub fn recommend(flags: &[Flag], warnings: &[Warning]) -> (RiskLevel, Recommendation) {
    let level = calculate_risk_level(flags, warnings);
    (level, Recommendation::for_level(level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reliefguard_detector::{Pattern, Severity};
    use serde_json::json;

    fn flag(severity: Severity) -> Flag {
        Flag::new(Pattern::RapidSuccession, severity, json!({}))
    }

    #[test]
    fn test_policy_table() {
        let low = Recommendation::for_level(RiskLevel::Low);
        assert_eq!(low.action, Action::Allow);
        assert!(!low.requires_review);
        assert!(!low.auto_flag);

        let medium = Recommendation::for_level(RiskLevel::Medium);
        assert_eq!(medium.action, Action::Monitor);
        assert!(!medium.requires_review);
        assert!(medium.auto_flag);

        let high = Recommendation::for_level(RiskLevel::High);
        assert_eq!(high.action, Action::Review);
        assert!(high.requires_review);
        assert!(high.auto_flag);

        let critical = Recommendation::for_level(RiskLevel::Critical);
        assert_eq!(critical.action, Action::Block);
        assert!(critical.requires_review);
        assert!(critical.auto_flag);
    }

    #[test]
    fn test_recommend_end_to_end() {
        let (level, rec) = recommend(&[flag(Severity::High)], &[]);
        assert_eq!(level, RiskLevel::High);
        assert_eq!(rec.action, Action::Review);

        let (level, rec) = recommend(&[flag(Severity::High), flag(Severity::High)], &[]);
        assert_eq!(level, RiskLevel::Critical);
        assert_eq!(rec.action, Action::Block);
    }

    #[test]
    fn test_action_wire_names() {
        assert_eq!(Action::Monitor.to_string(), "monitor");
        assert_eq!(serde_json::to_string(&Action::Block).unwrap(), "\"block\"");
    }
}
