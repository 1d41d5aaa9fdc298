//! Check registry - independent, named, pure pattern checks
//!
//! Each check inspects the candidate transaction plus the history snapshot
//! and emits at most one flag of its own kind per evaluation. Checks are
//! order-insensitive; the detector unions their outputs without
//! short-circuiting, so new patterns can be added here without touching the
//! aggregation logic.

use rust_decimal::Decimal;
use serde_json::json;

use reliefguard_core::Transaction;

use crate::config::DetectorConfig;
use crate::history::HistorySnapshot;
use crate::signal::{Flag, Pattern, Severity};

/// Input to a single check
pub struct CheckContext<'a> {
    pub candidate: &'a Transaction,
    pub history: &'a HistorySnapshot,
    pub config: &'a DetectorConfig,
}

/// A registered pattern check
pub struct PatternCheck {
    pub pattern: Pattern,
    /// History-dependent checks degrade to warnings when the ledger is
    /// unreachable; the rest still run as flags.
    pub needs_history: bool,
    pub run: fn(&CheckContext<'_>) -> Option<Flag>,
}

/// The full reference registry, in no significant order
pub const REGISTRY: &[PatternCheck] = &[
    PatternCheck {
        pattern: Pattern::DuplicateTransaction,
        needs_history: true,
        run: check_duplicate_transaction,
    },
    PatternCheck {
        pattern: Pattern::ExcessiveAmount,
        needs_history: false,
        run: check_excessive_amount,
    },
    PatternCheck {
        pattern: Pattern::RapidSuccession,
        needs_history: true,
        run: check_rapid_succession,
    },
    PatternCheck {
        pattern: Pattern::ExcessiveDailySpending,
        needs_history: true,
        run: check_excessive_daily_spending,
    },
    PatternCheck {
        pattern: Pattern::SuspiciousTiming,
        needs_history: false,
        run: check_suspicious_timing,
    },
    PatternCheck {
        pattern: Pattern::UnusualVendorPattern,
        needs_history: true,
        run: check_unusual_vendor_pattern,
    },
    PatternCheck {
        pattern: Pattern::VendorExcessiveDaily,
        needs_history: true,
        run: check_vendor_excessive_daily,
    },
    PatternCheck {
        pattern: Pattern::MaxTransactionsPerHour,
        needs_history: true,
        run: check_max_transactions_per_hour,
    },
];

fn check_duplicate_transaction(ctx: &CheckContext<'_>) -> Option<Flag> {
    let window = ctx.config.duplicate_window();
    let prior = ctx.history.duplicate_of(ctx.candidate, window)?;
    Some(Flag::new(
        Pattern::DuplicateTransaction,
        Severity::High,
        json!({
            "prior_transaction_id": prior.id,
            "counterparty_id": ctx.candidate.counterparty_id,
            "amount": ctx.candidate.amount.to_string(),
            "window_secs": ctx.config.duplicate_window_secs,
        }),
    ))
}

fn check_excessive_amount(ctx: &CheckContext<'_>) -> Option<Flag> {
    let amount = ctx.candidate.amount.value();
    if amount <= ctx.config.max_transaction_amount {
        return None;
    }
    Some(Flag::new(
        Pattern::ExcessiveAmount,
        Severity::High,
        json!({
            "amount": amount.to_string(),
            "cap": ctx.config.max_transaction_amount.to_string(),
        }),
    ))
}

fn check_rapid_succession(ctx: &CheckContext<'_>) -> Option<Flag> {
    let window = ctx.config.rapid_window();
    // Candidate included in the count
    let count = ctx.history.count_within(window) + 1;
    if count < ctx.config.rapid_tx_count as usize {
        return None;
    }
    Some(Flag::new(
        Pattern::RapidSuccession,
        Severity::High,
        json!({
            "count": count,
            "threshold": ctx.config.rapid_tx_count,
            "window_secs": ctx.config.rapid_window_secs,
        }),
    ))
}

fn check_excessive_daily_spending(ctx: &CheckContext<'_>) -> Option<Flag> {
    let window = ctx.config.history_window();
    // Trailing 24h including the candidate
    let total = ctx.history.sum_within(window) + ctx.candidate.amount.value();
    if total <= ctx.config.daily_spending_cap {
        return None;
    }
    Some(Flag::new(
        Pattern::ExcessiveDailySpending,
        Severity::Medium,
        json!({
            "daily_total": total.to_string(),
            "cap": ctx.config.daily_spending_cap.to_string(),
        }),
    ))
}

fn check_suspicious_timing(ctx: &CheckContext<'_>) -> Option<Flag> {
    if !ctx.config.in_quiet_hours(ctx.candidate.timestamp) {
        return None;
    }
    Some(Flag::new(
        Pattern::SuspiciousTiming,
        Severity::Medium,
        json!({
            "timestamp": ctx.candidate.timestamp.to_rfc3339(),
            "quiet_hours_start": ctx.config.quiet_hours_start,
            "quiet_hours_end": ctx.config.quiet_hours_end,
        }),
    ))
}

// Concentration denominator is trailing-24h spend (same window as the daily
// cap), candidate included on both sides of the ratio.
fn check_unusual_vendor_pattern(ctx: &CheckContext<'_>) -> Option<Flag> {
    let window = ctx.config.history_window();
    let count = ctx.history.count_within(window) + 1;
    if count < ctx.config.concentration_min_tx as usize {
        return None;
    }

    let candidate_amount = ctx.candidate.amount.value();
    let total = ctx.history.sum_within(window) + candidate_amount;
    if total.is_zero() {
        return None;
    }
    let to_counterparty = ctx
        .history
        .counterparty_spend_within(&ctx.candidate.counterparty_id, window)
        + candidate_amount;

    let ratio = to_counterparty / total;
    if ratio <= ctx.config.concentration_ratio {
        return None;
    }
    Some(Flag::new(
        Pattern::UnusualVendorPattern,
        Severity::Medium,
        json!({
            "counterparty_id": ctx.candidate.counterparty_id,
            "ratio": ratio.round_dp(4).to_string(),
            "threshold": ctx.config.concentration_ratio.to_string(),
            "window_hours": 24,
        }),
    ))
}

fn check_vendor_excessive_daily(ctx: &CheckContext<'_>) -> Option<Flag> {
    let window = ctx.config.history_window();
    let received = ctx.history.received_sum_within(window) + ctx.candidate.amount.value();
    if received <= ctx.config.vendor_daily_cap {
        return None;
    }
    Some(Flag::new(
        Pattern::VendorExcessiveDaily,
        Severity::Medium,
        json!({
            "counterparty_id": ctx.candidate.counterparty_id,
            "received_total": received.to_string(),
            "cap": ctx.config.vendor_daily_cap.to_string(),
        }),
    ))
}

fn check_max_transactions_per_hour(ctx: &CheckContext<'_>) -> Option<Flag> {
    let count = ctx.history.count_within(chrono::Duration::hours(1)) + 1;
    if count <= ctx.config.max_tx_per_hour as usize {
        return None;
    }
    Some(Flag::new(
        Pattern::MaxTransactionsPerHour,
        Severity::Medium,
        json!({
            "count": count,
            "cap": ctx.config.max_tx_per_hour,
        }),
    ))
}

/// Keep the registry honest: exactly one entry per pattern
#[allow(dead_code)]
fn registry_is_unique() -> bool {
    let mut seen = std::collections::HashSet::new();
    REGISTRY.iter().all(|c| seen.insert(c.pattern))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use reliefguard_core::{Amount, EntityType};
    use rust_decimal_macros::dec;

    fn tx_at(id: &str, counterparty: &str, amount: Decimal, at: DateTime<Utc>) -> Transaction {
        Transaction {
            id: id.to_string(),
            actor_id: "BEN-001".to_string(),
            actor_kind: EntityType::Beneficiary,
            counterparty_id: counterparty.to_string(),
            amount: Amount::new(amount).unwrap(),
            category: "food".to_string(),
            timestamp: at,
            tx_hash: None,
        }
    }

    // Noon keeps these tests clear of the quiet-hours band
    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn run(
        check: fn(&CheckContext<'_>) -> Option<Flag>,
        candidate: &Transaction,
        history: &HistorySnapshot,
    ) -> Option<Flag> {
        let config = DetectorConfig::default();
        check(&CheckContext {
            candidate,
            history,
            config: &config,
        })
    }

    #[test]
    fn test_registry_one_check_per_pattern() {
        assert!(registry_is_unique());
        assert_eq!(REGISTRY.len(), 8);
    }

    #[test]
    fn test_duplicate_fires_within_window() {
        let now = noon();
        let candidate = tx_at("TX-2", "VEN-1", dec!(200), now);
        let history = HistorySnapshot::new(
            vec![tx_at("TX-1", "VEN-1", dec!(200), now - Duration::minutes(2))],
            vec![],
            now,
        );

        let flag = run(check_duplicate_transaction, &candidate, &history).unwrap();
        assert_eq!(flag.severity, Severity::High);
        assert_eq!(flag.evidence["prior_transaction_id"], "TX-1");
    }

    #[test]
    fn test_duplicate_different_amount_does_not_fire() {
        let now = noon();
        let candidate = tx_at("TX-2", "VEN-1", dec!(201), now);
        let history = HistorySnapshot::new(
            vec![tx_at("TX-1", "VEN-1", dec!(200), now - Duration::minutes(2))],
            vec![],
            now,
        );

        assert!(run(check_duplicate_transaction, &candidate, &history).is_none());
    }

    #[test]
    fn test_excessive_amount_boundary() {
        let now = noon();
        let history = HistorySnapshot::empty(now);

        // Exactly at the cap: allowed
        let at_cap = tx_at("TX-1", "VEN-1", dec!(1000), now);
        assert!(run(check_excessive_amount, &at_cap, &history).is_none());

        // Above the cap: high flag
        let over = tx_at("TX-2", "VEN-1", dec!(1500), now);
        let flag = run(check_excessive_amount, &over, &history).unwrap();
        assert_eq!(flag.severity, Severity::High);
    }

    #[test]
    fn test_rapid_succession_threshold_exact() {
        let now = noon();
        let candidate = tx_at("TX-3", "VEN-1", dec!(10), now);

        // Two priors inside 60s + candidate = 3 >= threshold 3: fires
        let at_threshold = HistorySnapshot::new(
            vec![
                tx_at("TX-1", "VEN-1", dec!(10), now - Duration::seconds(50)),
                tx_at("TX-2", "VEN-1", dec!(10), now - Duration::seconds(20)),
            ],
            vec![],
            now,
        );
        assert!(run(check_rapid_succession, &candidate, &at_threshold).is_some());

        // One prior + candidate = 2 < 3: does not fire
        let below = HistorySnapshot::new(
            vec![tx_at("TX-1", "VEN-1", dec!(10), now - Duration::seconds(20))],
            vec![],
            now,
        );
        assert!(run(check_rapid_succession, &candidate, &below).is_none());
    }

    #[test]
    fn test_daily_spending_includes_candidate() {
        let now = noon();
        let history = HistorySnapshot::new(
            vec![tx_at("TX-1", "VEN-1", dec!(4800), now - Duration::hours(3))],
            vec![],
            now,
        );

        // 4800 + 300 = 5100 > 5000
        let candidate = tx_at("TX-2", "VEN-1", dec!(300), now);
        let flag = run(check_excessive_daily_spending, &candidate, &history).unwrap();
        assert_eq!(flag.severity, Severity::Medium);

        // 4800 + 200 = 5000, not over
        let at_cap = tx_at("TX-3", "VEN-1", dec!(200), now);
        assert!(run(check_excessive_daily_spending, &at_cap, &history).is_none());
    }

    #[test]
    fn test_suspicious_timing() {
        let late = Utc.with_ymd_and_hms(2024, 6, 1, 23, 0, 0).unwrap();
        let candidate = tx_at("TX-1", "VEN-1", dec!(50), late);
        let history = HistorySnapshot::empty(late);

        let flag = run(check_suspicious_timing, &candidate, &history).unwrap();
        assert_eq!(flag.pattern, Pattern::SuspiciousTiming);
        assert_eq!(flag.severity, Severity::Medium);

        let daytime = tx_at("TX-2", "VEN-1", dec!(50), noon());
        let day_history = HistorySnapshot::empty(noon());
        assert!(run(check_suspicious_timing, &daytime, &day_history).is_none());
    }

    #[test]
    fn test_vendor_concentration() {
        let now = noon();
        // 900 of 1000 spend to VEN-1 (ratio 0.9 > 0.8), 3 txs in window
        let history = HistorySnapshot::new(
            vec![
                tx_at("TX-1", "VEN-1", dec!(400), now - Duration::hours(2)),
                tx_at("TX-2", "VEN-2", dec!(100), now - Duration::hours(4)),
            ],
            vec![],
            now,
        );
        let candidate = tx_at("TX-3", "VEN-1", dec!(500), now);

        let flag = run(check_unusual_vendor_pattern, &candidate, &history).unwrap();
        assert_eq!(flag.pattern, Pattern::UnusualVendorPattern);
    }

    #[test]
    fn test_vendor_concentration_needs_minimum_volume() {
        let now = noon();
        // 100% concentration but only 1 tx total: too little signal
        let history = HistorySnapshot::empty(now);
        let candidate = tx_at("TX-1", "VEN-1", dec!(500), now);

        assert!(run(check_unusual_vendor_pattern, &candidate, &history).is_none());
    }

    #[test]
    fn test_vendor_excessive_daily() {
        let now = noon();
        let received = vec![tx_at("TX-0", "VEN-1", dec!(9800), now - Duration::hours(5))];
        let history = HistorySnapshot::new(vec![], received, now);
        let candidate = tx_at("TX-1", "VEN-1", dec!(300), now);

        let flag = run(check_vendor_excessive_daily, &candidate, &history).unwrap();
        assert_eq!(flag.pattern, Pattern::VendorExcessiveDaily);
        assert_eq!(flag.severity, Severity::Medium);
    }

    #[test]
    fn test_max_transactions_per_hour() {
        let now = noon();
        let priors: Vec<Transaction> = (0..10)
            .map(|i| {
                tx_at(
                    &format!("TX-{i}"),
                    "VEN-1",
                    dec!(10),
                    now - Duration::minutes(i + 1),
                )
            })
            .collect();
        let history = HistorySnapshot::new(priors, vec![], now);
        let candidate = tx_at("TX-NEW", "VEN-1", dec!(10), now);

        // 10 priors + candidate = 11 > cap 10
        let flag = run(check_max_transactions_per_hour, &candidate, &history).unwrap();
        assert_eq!(flag.pattern, Pattern::MaxTransactionsPerHour);
    }
}
