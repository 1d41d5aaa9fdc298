//! HistorySnapshot - consistent windowed aggregates for one evaluation
//!
//! A snapshot is taken once per evaluation, inside the engine's per-actor
//! critical section, and every check reads the same snapshot. No check can
//! observe a partially-updated window.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use reliefguard_core::Transaction;

/// Read-only snapshot of an actor's recent transactions, plus the
/// candidate counterparty's recent received transactions.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    /// Actor's outgoing transactions, ascending by timestamp
    actor_transactions: Vec<Transaction>,
    /// Candidate counterparty's incoming transactions, ascending by timestamp
    counterparty_received: Vec<Transaction>,
    /// Evaluation time - all windows trail back from this instant
    as_of: DateTime<Utc>,
}

impl HistorySnapshot {
    /// Build a snapshot as of `as_of`
    pub fn new(
        actor_transactions: Vec<Transaction>,
        counterparty_received: Vec<Transaction>,
        as_of: DateTime<Utc>,
    ) -> Self {
        Self {
            actor_transactions,
            counterparty_received,
            as_of,
        }
    }

    /// Empty snapshot for degraded evaluation
    pub fn empty(as_of: DateTime<Utc>) -> Self {
        Self::new(Vec::new(), Vec::new(), as_of)
    }

    /// Snapshot instant
    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    fn in_window<'a>(
        txs: &'a [Transaction],
        cutoff: DateTime<Utc>,
        as_of: DateTime<Utc>,
    ) -> impl Iterator<Item = &'a Transaction> {
        txs.iter()
            .filter(move |t| t.timestamp >= cutoff && t.timestamp <= as_of)
    }

    /// Count of actor transactions in the trailing window (candidate excluded)
    pub fn count_within(&self, window: Duration) -> usize {
        Self::in_window(&self.actor_transactions, self.as_of - window, self.as_of).count()
    }

    /// Sum of actor spend in the trailing window (candidate excluded)
    pub fn sum_within(&self, window: Duration) -> Decimal {
        Self::in_window(&self.actor_transactions, self.as_of - window, self.as_of)
            .map(|t| t.amount.value())
            .sum()
    }

    /// Earlier transaction matching the candidate's counterparty and amount
    /// inside the window, if any
    pub fn duplicate_of<'a>(
        &'a self,
        candidate: &Transaction,
        window: Duration,
    ) -> Option<&'a Transaction> {
        Self::in_window(&self.actor_transactions, self.as_of - window, self.as_of)
            .filter(|t| t.id != candidate.id)
            .find(|t| {
                t.counterparty_id == candidate.counterparty_id && t.amount == candidate.amount
            })
    }

    /// Actor spend routed to one counterparty in the trailing window
    /// (candidate excluded)
    pub fn counterparty_spend_within(&self, counterparty_id: &str, window: Duration) -> Decimal {
        Self::in_window(&self.actor_transactions, self.as_of - window, self.as_of)
            .filter(|t| t.counterparty_id == counterparty_id)
            .map(|t| t.amount.value())
            .sum()
    }

    /// Counterparty's received total in the trailing window (candidate excluded)
    pub fn received_sum_within(&self, window: Duration) -> Decimal {
        Self::in_window(&self.counterparty_received, self.as_of - window, self.as_of)
            .map(|t| t.amount.value())
            .sum()
    }
}
