//! Detector configuration with configurable thresholds
//!
//! All thresholds can be overridden via config file; the defaults below are
//! the reference policy. The config is an explicit value injected into the
//! detector at construction time - never a mutable global - so tests and
//! per-tenant deployments can carry their own thresholds.

use chrono::{DateTime, Duration, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Configuration for the Pattern Detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    // === Amount caps ===
    /// Per-transaction amount cap (currency units)
    #[serde(default = "default_max_transaction_amount")]
    pub max_transaction_amount: Decimal,

    /// Actor trailing-24h spending cap
    #[serde(default = "default_daily_spending_cap")]
    pub daily_spending_cap: Decimal,

    /// Counterparty (vendor) trailing-24h received cap
    #[serde(default = "default_vendor_daily_cap")]
    pub vendor_daily_cap: Decimal,

    // === Velocity windows ===
    /// Duplicate-transaction window (seconds)
    #[serde(default = "default_duplicate_window_secs")]
    pub duplicate_window_secs: i64,

    /// Rapid-succession window (seconds)
    #[serde(default = "default_rapid_window_secs")]
    pub rapid_window_secs: i64,

    /// Transactions within the rapid window (candidate included) that
    /// trigger `rapid_succession`
    #[serde(default = "default_rapid_tx_count")]
    pub rapid_tx_count: u32,

    /// Trailing-1h transaction cap
    #[serde(default = "default_max_tx_per_hour")]
    pub max_tx_per_hour: u32,

    // === Concentration ===
    /// Counterparty share of trailing-24h spend that triggers
    /// `unusual_vendor_pattern` (0..1)
    #[serde(default = "default_concentration_ratio")]
    pub concentration_ratio: Decimal,

    /// Minimum transactions in the window before the ratio is meaningful
    #[serde(default = "default_concentration_min_tx")]
    pub concentration_min_tx: u32,

    // === Timing ===
    /// Start of the flagged time band (hour of day, UTC)
    #[serde(default = "default_quiet_hours_start")]
    pub quiet_hours_start: u32,

    /// End of the flagged time band (hour of day, UTC, exclusive)
    #[serde(default = "default_quiet_hours_end")]
    pub quiet_hours_end: u32,
}

// Default value functions for serde
fn default_max_transaction_amount() -> Decimal {
    Decimal::new(1_000, 0)
}

fn default_daily_spending_cap() -> Decimal {
    Decimal::new(5_000, 0)
}

fn default_vendor_daily_cap() -> Decimal {
    Decimal::new(10_000, 0)
}

fn default_duplicate_window_secs() -> i64 {
    300 // 5 minutes
}

fn default_rapid_window_secs() -> i64 {
    60
}

fn default_rapid_tx_count() -> u32 {
    3
}

fn default_max_tx_per_hour() -> u32 {
    10
}

fn default_concentration_ratio() -> Decimal {
    Decimal::new(8, 1) // 0.8
}

fn default_concentration_min_tx() -> u32 {
    3
}

fn default_quiet_hours_start() -> u32 {
    22
}

fn default_quiet_hours_end() -> u32 {
    6
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_transaction_amount: default_max_transaction_amount(),
            daily_spending_cap: default_daily_spending_cap(),
            vendor_daily_cap: default_vendor_daily_cap(),
            duplicate_window_secs: default_duplicate_window_secs(),
            rapid_window_secs: default_rapid_window_secs(),
            rapid_tx_count: default_rapid_tx_count(),
            max_tx_per_hour: default_max_tx_per_hour(),
            concentration_ratio: default_concentration_ratio(),
            concentration_min_tx: default_concentration_min_tx(),
            quiet_hours_start: default_quiet_hours_start(),
            quiet_hours_end: default_quiet_hours_end(),
        }
    }
}

impl DetectorConfig {
    /// Load configuration from JSON file
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// Duplicate-transaction window as a chrono Duration
    pub fn duplicate_window(&self) -> Duration {
        Duration::seconds(self.duplicate_window_secs)
    }

    /// Rapid-succession window as a chrono Duration
    pub fn rapid_window(&self) -> Duration {
        Duration::seconds(self.rapid_window_secs)
    }

    /// The widest window any check reads. History snapshots cover at least
    /// this much so every check sees consistent data.
    pub fn history_window(&self) -> Duration {
        Duration::hours(24)
    }

    /// Is the timestamp inside the flagged time band?
    ///
    /// The band may wrap midnight (e.g., 22..6). An empty band
    /// (start == end) disables the check.
    pub fn in_quiet_hours(&self, at: DateTime<Utc>) -> bool {
        let hour = at.hour();
        if self.quiet_hours_start == self.quiet_hours_end {
            false
        } else if self.quiet_hours_start < self.quiet_hours_end {
            hour >= self.quiet_hours_start && hour < self.quiet_hours_end
        } else {
            hour >= self.quiet_hours_start || hour < self.quiet_hours_end
        }
    }
}
