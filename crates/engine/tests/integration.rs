//! End-to-end pipeline tests: evaluation, review, cases and audit together.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use reliefguard_cases::{CaseError, ReportStatus};
use reliefguard_core::{Amount, EntityType, Role, StaticRoles, Transaction};
use reliefguard_detector::{DetectorConfig, Pattern};
use reliefguard_engine::FraudEngine;
use reliefguard_events::{AuditLog, FraudEvent};
use reliefguard_ledger::InMemoryLedger;
use reliefguard_review::{ReviewDecision, ReviewError};
use reliefguard_risk::{Action, RiskLevel};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn tx(id: &str, actor: &str, counterparty: &str, amount: Decimal, at: DateTime<Utc>) -> Transaction {
    Transaction {
        id: id.to_string(),
        actor_id: actor.to_string(),
        actor_kind: EntityType::Beneficiary,
        counterparty_id: counterparty.to_string(),
        amount: Amount::new(amount).unwrap(),
        category: "food".to_string(),
        timestamp: at,
        tx_hash: None,
    }
}

fn engine() -> (FraudEngine, Arc<InMemoryLedger>) {
    init_tracing();
    let ledger = Arc::new(InMemoryLedger::new());
    let roles = StaticRoles::new()
        .grant("vera", Role::Verifier)
        .grant("root", Role::Admin);
    let engine = FraudEngine::new(
        DetectorConfig::default(),
        Arc::clone(&ledger) as Arc<dyn reliefguard_ledger::LedgerAccessor>,
        Arc::new(roles),
        AuditLog::in_memory(),
    );
    (engine, ledger)
}

#[test]
fn duplicate_spend_lands_in_review_queue() {
    let (engine, _ledger) = engine();
    let now = noon();

    let first = engine
        .evaluate(tx("TX-1", "BEN-1", "VEN-1", dec!(200), now - Duration::minutes(2)))
        .unwrap();
    assert_eq!(first.recommendation.action, Action::Allow);

    let second = engine
        .evaluate(tx("TX-2", "BEN-1", "VEN-1", dec!(200), now))
        .unwrap();

    assert_eq!(second.risk_level, RiskLevel::High);
    assert_eq!(second.recommendation.action, Action::Review);
    assert!(second
        .flags
        .iter()
        .any(|f| f.pattern == Pattern::DuplicateTransaction));

    // Queued for review and auto-reported
    let pending = engine.queue().list(None, true);
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].transaction.id, "TX-2");
    assert_eq!(engine.cases().list_by_status(ReportStatus::Pending).len(), 1);
}

#[test]
fn excessive_amount_requires_review() {
    let (engine, _ledger) = engine();

    let result = engine
        .evaluate(tx("TX-1", "BEN-1", "VEN-1", dec!(1500), noon()))
        .unwrap();

    assert_eq!(result.risk_level, RiskLevel::High);
    assert_eq!(result.recommendation.action, Action::Review);
    assert!(result.recommendation.requires_review);
    assert!(result
        .flags
        .iter()
        .any(|f| f.pattern == Pattern::ExcessiveAmount));
}

#[test]
fn two_high_flags_block_before_funds_move() {
    let (engine, ledger) = engine();
    let now = noon();

    engine
        .evaluate(tx("TX-1", "BEN-1", "VEN-1", dec!(1500), now - Duration::minutes(2)))
        .unwrap();
    let result = engine
        .evaluate(tx("TX-2", "BEN-1", "VEN-1", dec!(1500), now))
        .unwrap();

    // Duplicate + excessive amount: two highs
    assert_eq!(result.risk_level, RiskLevel::Critical);
    assert_eq!(result.recommendation.action, Action::Block);

    // The blocked transaction never entered history
    assert_eq!(ledger.len(), 1);
    let third = engine
        .evaluate(tx("TX-3", "BEN-1", "VEN-2", dec!(50), now + Duration::minutes(5)))
        .unwrap();
    assert!(!third
        .flags
        .iter()
        .any(|f| f.pattern == Pattern::RapidSuccession));
}

#[test]
fn quiet_hours_alone_only_monitor() {
    let (engine, ledger) = engine();
    let late = Utc.with_ymd_and_hms(2024, 6, 1, 23, 15, 0).unwrap();

    let result = engine
        .evaluate(tx("TX-1", "BEN-1", "VEN-1", dec!(80), late))
        .unwrap();

    assert_eq!(result.risk_level, RiskLevel::Medium);
    assert_eq!(result.recommendation.action, Action::Monitor);
    assert!(!result.recommendation.requires_review);

    // Monitored transactions settle and are recorded
    assert_eq!(ledger.len(), 1);
    assert_eq!(engine.queue().pending_count(), 0);
    // But the auto report is opened for the audit trail
    assert_eq!(engine.cases().list_by_status(ReportStatus::Pending).len(), 1);
}

#[test]
fn review_decision_flow() -> Result<()> {
    let (engine, _ledger) = engine();

    engine.evaluate(tx("TX-1", "BEN-1", "VEN-1", dec!(1500), noon()))?;

    let record = engine
        .queue()
        .review("TX-1", "vera", ReviewDecision::Approve, Some("receipts verified".into()))?;
    assert_eq!(record.decision, Some(ReviewDecision::Approve));

    // Retrying the same decision is a no-op; flipping it is a conflict
    engine
        .queue()
        .review("TX-1", "vera", ReviewDecision::Approve, None)?;
    let conflict = engine
        .queue()
        .review("TX-1", "root", ReviewDecision::Reject, None);
    assert!(matches!(
        conflict,
        Err(ReviewError::ConflictingReview { .. })
    ));
    Ok(())
}

#[test]
fn concurrent_conflicting_reviews_have_one_winner() {
    let (engine, _ledger) = engine();
    let engine = Arc::new(engine);

    engine
        .evaluate(tx("TX-1", "BEN-1", "VEN-1", dec!(1500), noon()))
        .unwrap();

    let mut handles = Vec::new();
    for (reviewer, decision) in [("vera", ReviewDecision::Approve), ("root", ReviewDecision::Reject)]
    {
        let engine = Arc::clone(&engine);
        handles.push(std::thread::spawn(move || {
            engine.queue().review("TX-1", reviewer, decision, None)
        }));
    }

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);

    // The stored record carries exactly the winning decision
    let record = engine.queue().get("TX-1").unwrap();
    assert!(record.decision.is_some());
    assert!(record.reviewer_id.is_some());
}

#[test]
fn auto_report_follows_case_lifecycle() -> Result<()> {
    let (engine, _ledger) = engine();

    engine.evaluate(tx("TX-1", "BEN-1", "VEN-1", dec!(1500), noon()))?;

    let pending = engine.cases().list_by_status(ReportStatus::Pending);
    let report_id = pending[0].report_id.clone();

    // Resolving straight from pending is not in the transition table
    let premature = engine.cases().resolve(&report_id, "vera", "nothing to see");
    assert!(matches!(
        premature,
        Err(CaseError::InvalidStateTransition { .. })
    ));

    engine.cases().assign(&report_id, "vera")?;
    engine
        .cases()
        .update_investigation(&report_id, "vera", Some("receipts requested".into()), None)?;
    let resolved = engine
        .cases()
        .resolve(&report_id, "vera", "receipts check out, no misuse")?;

    assert_eq!(resolved.status, ReportStatus::Resolved);
    assert!(resolved.resolved_at.is_some());
    Ok(())
}

#[test]
fn degraded_history_fails_open_with_warnings() {
    let (engine, ledger) = engine();
    ledger.set_unavailable(true);

    let mut rx = engine.bus().subscribe();
    let result = engine
        .evaluate(tx("TX-1", "BEN-1", "VEN-1", dec!(100), noon()))
        .unwrap();

    assert!(result.degraded);
    assert_eq!(result.recommendation.action, Action::Allow);
    assert!(result.flags.is_empty());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.pattern == Pattern::DuplicateTransaction));

    match rx.try_recv().unwrap() {
        FraudEvent::DegradedEvaluation { transaction_id, .. } => {
            assert_eq!(transaction_id, "TX-1");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn audit_trail_survives_restart() -> Result<()> {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("audit.jsonl");

    let ledger = Arc::new(InMemoryLedger::new());
    let roles = StaticRoles::new().grant("vera", Role::Verifier);

    {
        let engine = FraudEngine::new(
            DetectorConfig::default(),
            Arc::clone(&ledger) as Arc<dyn reliefguard_ledger::LedgerAccessor>,
            Arc::new(roles),
            AuditLog::new(&path)?,
        );
        engine.evaluate(tx("TX-1", "BEN-1", "VEN-1", dec!(1500), noon()))?;
    }

    let log = AuditLog::new(&path)?;
    let events = log.read_all()?;
    assert!(events
        .iter()
        .any(|e| matches!(e, FraudEvent::TransactionFlagged { transaction_id, .. } if transaction_id == "TX-1")));
    Ok(())
}

#[test]
fn risk_level_is_deterministic_across_repeats() {
    let now = noon();
    let candidates: Vec<Transaction> = (0..3)
        .map(|i| tx(&format!("TX-{i}"), "BEN-1", "VEN-1", dec!(1500), now + Duration::minutes(i)))
        .collect();

    let mut levels = Vec::new();
    for _ in 0..2 {
        let (engine, _ledger) = engine();
        let mut run_levels = Vec::new();
        for candidate in &candidates {
            run_levels.push(engine.evaluate(candidate.clone()).unwrap().risk_level);
        }
        levels.push(run_levels);
    }
    assert_eq!(levels[0], levels[1]);
}

#[test]
fn independent_actors_do_not_interfere() {
    let (engine, _ledger) = engine();
    let now = noon();

    // Same counterparty and amount, different actors: no duplicate flag
    engine
        .evaluate(tx("TX-1", "BEN-1", "VEN-1", dec!(200), now - Duration::minutes(1)))
        .unwrap();
    let other = engine
        .evaluate(tx("TX-2", "BEN-2", "VEN-1", dec!(200), now))
        .unwrap();

    assert!(!other
        .flags
        .iter()
        .any(|f| f.pattern == Pattern::DuplicateTransaction));
    assert_eq!(other.risk_level, RiskLevel::Low);
}
