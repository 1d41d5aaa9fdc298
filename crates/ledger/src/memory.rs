//! In-memory ledger - reference implementation of [`LedgerAccessor`]
//!
//! Keeps per-actor outgoing and per-counterparty incoming indexes, both
//! ordered by timestamp. Suitable for tests and single-node deployments;
//! production callers wrap their own store behind the same trait.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use reliefguard_core::Transaction;

use crate::accessor::LedgerAccessor;
use crate::error::{LedgerError, LedgerResult};

#[derive(Default)]
struct Indexes {
    /// actor_id -> outgoing transactions, ascending by timestamp
    by_actor: HashMap<String, Vec<Transaction>>,
    /// counterparty_id -> incoming transactions, ascending by timestamp
    by_counterparty: HashMap<String, Vec<Transaction>>,
    /// all admitted ids, for duplicate-id rejection
    ids: HashSet<String>,
}

/// Thread-safe in-memory ledger
#[derive(Default)]
pub struct InMemoryLedger {
    inner: RwLock<Indexes>,
    /// When set, history reads fail - used to exercise degraded evaluation
    unavailable: RwLock<bool>,
}

impl InMemoryLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle simulated unavailability (for degraded-mode tests)
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().expect("ledger lock poisoned") = unavailable;
    }

    /// Number of admitted transactions
    pub fn len(&self) -> usize {
        self.inner.read().expect("ledger lock poisoned").ids.len()
    }

    /// True if no transactions have been admitted
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> LedgerResult<()> {
        if *self.unavailable.read().expect("ledger lock poisoned") {
            Err(LedgerError::Unavailable("in-memory ledger offline".into()))
        } else {
            Ok(())
        }
    }
}

fn insert_sorted(list: &mut Vec<Transaction>, tx: Transaction) {
    let idx = list.partition_point(|t| t.timestamp <= tx.timestamp);
    list.insert(idx, tx);
}

impl LedgerAccessor for InMemoryLedger {
    fn history(&self, actor_id: &str, since: DateTime<Utc>) -> LedgerResult<Vec<Transaction>> {
        self.check_available()?;
        let inner = self.inner.read().expect("ledger lock poisoned");
        Ok(inner
            .by_actor
            .get(actor_id)
            .map(|txs| {
                txs.iter()
                    .filter(|t| t.timestamp >= since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn received_history(
        &self,
        counterparty_id: &str,
        since: DateTime<Utc>,
    ) -> LedgerResult<Vec<Transaction>> {
        self.check_available()?;
        let inner = self.inner.read().expect("ledger lock poisoned");
        Ok(inner
            .by_counterparty
            .get(counterparty_id)
            .map(|txs| {
                txs.iter()
                    .filter(|t| t.timestamp >= since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn record(&self, tx: Transaction) -> LedgerResult<()> {
        let mut inner = self.inner.write().expect("ledger lock poisoned");
        if inner.ids.contains(&tx.id) {
            return Err(LedgerError::DuplicateId(tx.id));
        }
        inner.ids.insert(tx.id.clone());
        insert_sorted(
            inner.by_counterparty.entry(tx.counterparty_id.clone()).or_default(),
            tx.clone(),
        );
        insert_sorted(inner.by_actor.entry(tx.actor_id.clone()).or_default(), tx);
        tracing::debug!(total = inner.ids.len(), "Transaction admitted to ledger");
        Ok(())
    }
}
