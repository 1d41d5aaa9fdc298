//! Signal vocabulary - patterns, severities, flags and warnings
//!
//! A `Flag` is a hard fraud-pattern signal that contributes to blocking
//! decisions. A `Warning` is a soft signal retained for audit/monitoring
//! visibility and never blocks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use strum_macros::{Display, EnumString};

/// Known fraud patterns
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Pattern {
    /// Same actor, same counterparty, same amount within a short window
    DuplicateTransaction,
    /// Single amount above the per-transaction cap
    ExcessiveAmount,
    /// Too many transactions within a short window
    RapidSuccession,
    /// Trailing-24h spend above the daily cap
    ExcessiveDailySpending,
    /// Transaction inside the flagged time band
    SuspiciousTiming,
    /// Counterparty concentration ratio above threshold
    UnusualVendorPattern,
    /// Counterparty's trailing-24h received total above cap
    VendorExcessiveDaily,
    /// Trailing-1h transaction count above cap
    MaxTransactionsPerHour,
}

/// Flag severity - ordered from lowest to highest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    Low = 1,
    Medium = 2,
    High = 3,
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        (*self as u8).cmp(&(*other as u8))
    }
}

/// A hard fraud-pattern signal
///
/// Produced fresh per evaluation and attached to the evaluation result -
/// never persisted standalone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub pattern: Pattern,
    pub severity: Severity,
    /// Structured data supporting the flag
    pub evidence: Value,
    pub detected_at: DateTime<Utc>,
}

impl Flag {
    /// Create a flag detected now
    pub fn new(pattern: Pattern, severity: Severity, evidence: Value) -> Self {
        Self {
            pattern,
            severity,
            evidence,
            detected_at: Utc::now(),
        }
    }

    pub fn is_high(&self) -> bool {
        self.severity == Severity::High
    }
}

/// A soft signal - implicitly below `low` severity, never blocking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub pattern: Pattern,
    pub note: String,
    pub evidence: Value,
    pub detected_at: DateTime<Utc>,
}

impl Warning {
    /// Create a warning detected now
    pub fn new(pattern: Pattern, note: impl Into<String>, evidence: Value) -> Self {
        Self {
            pattern,
            note: note.into(),
            evidence,
            detected_at: Utc::now(),
        }
    }
}
