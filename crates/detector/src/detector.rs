//! PatternDetector - runs the check registry over one snapshot
//!
//! The detector is stateless per call: config in, candidate + snapshot in,
//! flags/warnings out. Degraded evaluation (history unavailable) fails open
//! as warnings - operational availability of the relief system takes
//! priority over over-blocking.

use serde_json::json;

use reliefguard_core::Transaction;

use crate::checks::{CheckContext, REGISTRY};
use crate::config::DetectorConfig;
use crate::history::HistorySnapshot;
use crate::signal::{Flag, Warning};

/// Output of one detector run
#[derive(Debug, Clone, Default)]
pub struct Detection {
    pub flags: Vec<Flag>,
    pub warnings: Vec<Warning>,
}

/// Stateless-per-call pattern detector with injected configuration
pub struct PatternDetector {
    config: DetectorConfig,
}

impl PatternDetector {
    /// Create a detector with the given thresholds
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Current thresholds
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Run every registered check against one consistent snapshot.
    ///
    /// Checks are order-insensitive and never short-circuit; each check
    /// contributes at most one flag of its own kind.
    pub fn detect(&self, candidate: &Transaction, history: &HistorySnapshot) -> Detection {
        let ctx = CheckContext {
            candidate,
            history,
            config: &self.config,
        };

        let mut detection = Detection::default();
        for check in REGISTRY {
            if let Some(flag) = (check.run)(&ctx) {
                tracing::debug!(
                    pattern = %flag.pattern,
                    severity = %flag.severity,
                    tx = %candidate.id,
                    "Pattern check fired"
                );
                detection.flags.push(flag);
            }
        }
        detection
    }

    /// Degraded evaluation: history could not be read.
    ///
    /// History-independent checks still run as flags; every
    /// history-dependent check emits a warning instead of silently dropping.
    pub fn detect_degraded(&self, candidate: &Transaction) -> Detection {
        tracing::warn!(
            tx = %candidate.id,
            actor = %candidate.actor_id,
            "Degraded evaluation: history unavailable, history checks downgraded to warnings"
        );

        let empty = HistorySnapshot::empty(candidate.timestamp);
        let ctx = CheckContext {
            candidate,
            history: &empty,
            config: &self.config,
        };

        let mut detection = Detection::default();
        for check in REGISTRY {
            if check.needs_history {
                detection.warnings.push(Warning::new(
                    check.pattern,
                    "not evaluated: transaction history unavailable",
                    json!({ "degraded": true }),
                ));
            } else if let Some(flag) = (check.run)(&ctx) {
                detection.flags.push(flag);
            }
        }
        detection
    }
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{Pattern, Severity};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use reliefguard_core::{Amount, EntityType};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn tx_at(id: &str, amount: Decimal, at: DateTime<Utc>) -> Transaction {
        Transaction {
            id: id.to_string(),
            actor_id: "BEN-001".to_string(),
            actor_kind: EntityType::Beneficiary,
            counterparty_id: "VEN-001".to_string(),
            amount: Amount::new(amount).unwrap(),
            category: "food".to_string(),
            timestamp: at,
            tx_hash: None,
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_clean_transaction_no_flags() {
        let detector = PatternDetector::default();
        let candidate = tx_at("TX-1", dec!(100), noon());
        let detection = detector.detect(&candidate, &HistorySnapshot::empty(noon()));

        assert!(detection.flags.is_empty());
        assert!(detection.warnings.is_empty());
    }

    #[test]
    fn test_multiple_flags_accumulate() {
        let detector = PatternDetector::default();
        let now = noon();

        // Excessive amount + rapid succession on the same candidate
        let priors = vec![
            tx_at("TX-1", dec!(50), now - Duration::seconds(30)),
            tx_at("TX-2", dec!(50), now - Duration::seconds(10)),
        ];
        let candidate = tx_at("TX-3", dec!(1500), now);
        let detection = detector.detect(&candidate, &HistorySnapshot::new(priors, vec![], now));

        let patterns: Vec<Pattern> = detection.flags.iter().map(|f| f.pattern).collect();
        assert!(patterns.contains(&Pattern::ExcessiveAmount));
        assert!(patterns.contains(&Pattern::RapidSuccession));
    }

    #[test]
    fn test_at_most_one_flag_per_pattern() {
        let detector = PatternDetector::default();
        let now = noon();

        // Several window duplicates still yield a single duplicate flag
        let priors = vec![
            tx_at("TX-1", dec!(200), now - Duration::minutes(1)),
            tx_at("TX-2", dec!(200), now - Duration::minutes(2)),
            tx_at("TX-3", dec!(200), now - Duration::minutes(3)),
        ];
        let candidate = tx_at("TX-4", dec!(200), now);
        let detection = detector.detect(&candidate, &HistorySnapshot::new(priors, vec![], now));

        let duplicates = detection
            .flags
            .iter()
            .filter(|f| f.pattern == Pattern::DuplicateTransaction)
            .count();
        assert_eq!(duplicates, 1);
    }

    #[test]
    fn test_degraded_mode_fails_open() {
        let detector = PatternDetector::default();
        let candidate = tx_at("TX-1", dec!(1500), noon());

        let detection = detector.detect_degraded(&candidate);

        // Amount check still fires - it needs no history
        assert!(detection
            .flags
            .iter()
            .any(|f| f.pattern == Pattern::ExcessiveAmount && f.severity == Severity::High));

        // Every history-dependent pattern became a warning, not a flag
        assert_eq!(detection.warnings.len(), 6);
        assert!(detection
            .warnings
            .iter()
            .all(|w| w.evidence["degraded"] == true));
        assert!(detection
            .warnings
            .iter()
            .any(|w| w.pattern == Pattern::DuplicateTransaction));
    }

    #[test]
    fn test_custom_thresholds_respected() {
        let config = DetectorConfig {
            max_transaction_amount: dec!(10_000),
            ..DetectorConfig::default()
        };
        let detector = PatternDetector::new(config);
        let candidate = tx_at("TX-1", dec!(1500), noon());

        let detection = detector.detect(&candidate, &HistorySnapshot::empty(noon()));
        assert!(detection.flags.is_empty());
    }
}
