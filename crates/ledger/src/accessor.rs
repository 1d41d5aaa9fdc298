//! LedgerAccessor trait - the injected history boundary

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use reliefguard_core::Transaction;

use crate::error::LedgerResult;

/// Read access to admitted (completed or pending) transactions.
///
/// Implementations must reflect transactions already admitted - including an
/// in-flight one once recorded - consistently with the per-actor
/// serialization discipline enforced by the engine.
pub trait LedgerAccessor: Send + Sync {
    /// Ordered (ascending by timestamp) transactions sent by `actor_id`
    /// since `since`.
    fn history(&self, actor_id: &str, since: DateTime<Utc>) -> LedgerResult<Vec<Transaction>>;

    /// Ordered transactions received by `counterparty_id` since `since`.
    fn received_history(
        &self,
        counterparty_id: &str,
        since: DateTime<Utc>,
    ) -> LedgerResult<Vec<Transaction>>;

    /// Sum of `actor_id`'s outgoing transactions in the trailing 24 hours
    /// as of `as_of`.
    fn daily_total(&self, actor_id: &str, as_of: DateTime<Utc>) -> LedgerResult<Decimal> {
        let txs = self.history(actor_id, as_of - Duration::hours(24))?;
        Ok(txs
            .iter()
            .filter(|t| t.timestamp <= as_of)
            .map(|t| t.amount.value())
            .sum())
    }

    /// Admit an evaluated transaction into history.
    ///
    /// Called inside the engine's per-actor critical section so that racing
    /// same-actor candidates observe each other.
    fn record(&self, tx: Transaction) -> LedgerResult<()>;
}
