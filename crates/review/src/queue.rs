//! The review queue
//!
//! One mutex guards the whole queue, so admission and decisions are
//! serialized. Under concurrent conflicting reviews exactly one decision
//! wins and the loser gets a `ConflictingReview` naming the winner.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use reliefguard_core::{RoleProvider, Transaction};
use reliefguard_detector::Flag;
use reliefguard_events::{EventBus, FraudEvent};
use reliefguard_risk::RiskLevel;

use crate::error::{ReviewError, ReviewResult};
use crate::record::{FlaggedRecord, ReviewDecision, ReviewStatus};

struct QueueState {
    records: HashMap<String, FlaggedRecord>,
    next_seq: u64,
}

/// Queue of flagged transactions awaiting a human decision
pub struct ReviewQueue {
    state: Mutex<QueueState>,
    roles: Arc<dyn RoleProvider>,
    bus: EventBus,
}

impl ReviewQueue {
    pub fn new(roles: Arc<dyn RoleProvider>, bus: EventBus) -> Self {
        Self {
            state: Mutex::new(QueueState {
                records: HashMap::new(),
                next_seq: 0,
            }),
            roles,
            bus,
        }
    }

    /// Admit a flagged transaction.
    ///
    /// Idempotent on the transaction id: a repeat enqueue returns the
    /// existing record unchanged, keeping its original position and any
    /// decision already made.
    pub fn enqueue(
        &self,
        transaction: Transaction,
        flags: Vec<Flag>,
        risk_level: RiskLevel,
    ) -> FlaggedRecord {
        let mut state = self.state.lock().expect("review queue lock poisoned");

        if let Some(existing) = state.records.get(&transaction.id) {
            return existing.clone();
        }

        let record = FlaggedRecord {
            transaction,
            flags,
            risk_level,
            status: ReviewStatus::Pending,
            enqueue_seq: state.next_seq,
            flagged_at: Utc::now(),
            decision: None,
            reviewer_id: None,
            review_notes: None,
            reviewed_at: None,
        };
        state.next_seq += 1;

        tracing::info!(
            transaction_id = %record.transaction.id,
            risk_level = %record.risk_level,
            flag_count = record.flags.len(),
            "Transaction admitted to review queue"
        );
        state
            .records
            .insert(record.transaction.id.clone(), record.clone());
        record
    }

    /// Record a review decision.
    ///
    /// A retry with the same decision succeeds without changing anything; a
    /// different decision fails with `ConflictingReview`. The reviewer must
    /// hold the verifier/admin capability.
    pub fn review(
        &self,
        transaction_id: &str,
        reviewer_id: &str,
        decision: ReviewDecision,
        notes: Option<String>,
    ) -> ReviewResult<FlaggedRecord> {
        if !self.roles.can_review(reviewer_id) {
            return Err(ReviewError::NotAuthorized(reviewer_id.to_string()));
        }

        let mut state = self.state.lock().expect("review queue lock poisoned");
        let record = state
            .records
            .get_mut(transaction_id)
            .ok_or_else(|| ReviewError::RecordNotFound(transaction_id.to_string()))?;

        if let Some(decided) = record.decision {
            if decided == decision {
                // Retry of the winning decision, nothing to do
                return Ok(record.clone());
            }
            return Err(ReviewError::ConflictingReview {
                transaction_id: transaction_id.to_string(),
                decided,
                reviewer_id: record
                    .reviewer_id
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
            });
        }

        record.status = ReviewStatus::Reviewed;
        record.decision = Some(decision);
        record.reviewer_id = Some(reviewer_id.to_string());
        record.review_notes = notes;
        record.reviewed_at = Some(Utc::now());

        tracing::info!(
            transaction_id,
            decision = %decision,
            reviewer_id,
            "Review decision recorded"
        );
        self.bus.publish(FraudEvent::review_decided(
            transaction_id,
            decision.to_string(),
            reviewer_id,
        ));
        Ok(record.clone())
    }

    /// Get a record by transaction id
    pub fn get(&self, transaction_id: &str) -> ReviewResult<FlaggedRecord> {
        let state = self.state.lock().expect("review queue lock poisoned");
        state
            .records
            .get(transaction_id)
            .cloned()
            .ok_or_else(|| ReviewError::RecordNotFound(transaction_id.to_string()))
    }

    /// List records in admission order, optionally filtered
    pub fn list(&self, risk_level: Option<RiskLevel>, pending_only: bool) -> Vec<FlaggedRecord> {
        let state = self.state.lock().expect("review queue lock poisoned");
        let mut out: Vec<FlaggedRecord> = state
            .records
            .values()
            .filter(|r| risk_level.map_or(true, |level| r.risk_level == level))
            .filter(|r| !pending_only || r.is_pending())
            .cloned()
            .collect();
        out.sort_by_key(|r| r.enqueue_seq);
        out
    }

    /// Number of records still awaiting a decision
    pub fn pending_count(&self) -> usize {
        let state = self.state.lock().expect("review queue lock poisoned");
        state.records.values().filter(|r| r.is_pending()).count()
    }
}
