//! Transaction - immutable candidate/historical transaction
//!
//! Created by the settlement boundary, never mutated by the fraud engine.
//! The engine only annotates it with flags and risk metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actor::EntityType;
use crate::amount::Amount;

/// Errors raised while validating a candidate transaction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Invalid transaction {id}: {reason}")]
    InvalidTransaction { id: String, reason: String },
}

/// A value-moving transaction (beneficiary spend or vendor payout)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction id
    pub id: String,
    /// Spending/receiving actor (beneficiary or vendor)
    pub actor_id: String,
    /// Whether the actor is a beneficiary or a vendor
    pub actor_kind: EntityType,
    /// The other side of the transfer
    pub counterparty_id: String,
    /// Fixed-point amount, always positive for a candidate
    pub amount: Amount,
    /// Spend category (e.g., "food", "shelter")
    pub category: String,
    /// When the transaction was initiated
    pub timestamp: DateTime<Utc>,
    /// External settlement reference, set once confirmed on-chain
    pub tx_hash: Option<String>,
}

impl Transaction {
    /// Validate a candidate transaction before any evaluation.
    ///
    /// A malformed candidate is rejected whole - it is never partially
    /// evaluated.
    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.id.trim().is_empty() {
            return Err(TransactionError::InvalidTransaction {
                id: self.id.clone(),
                reason: "empty transaction id".to_string(),
            });
        }
        if self.actor_id.trim().is_empty() {
            return Err(TransactionError::InvalidTransaction {
                id: self.id.clone(),
                reason: "empty actor id".to_string(),
            });
        }
        if self.counterparty_id.trim().is_empty() {
            return Err(TransactionError::InvalidTransaction {
                id: self.id.clone(),
                reason: "empty counterparty id".to_string(),
            });
        }
        if self.amount.is_zero() {
            return Err(TransactionError::InvalidTransaction {
                id: self.id.clone(),
                reason: "non-positive amount".to_string(),
            });
        }
        Ok(())
    }
}
