//! Fraud report data structures and the closed transition table

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumString};

use reliefguard_core::EntityType;
use reliefguard_risk::RiskLevel;

/// Status of a fraud report.
///
/// The transition table is closed: [`ReportStatus::can_transition`] is the
/// single source of truth, and the manager refuses anything outside it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportStatus {
    /// Submitted, awaiting assignment
    Pending,
    /// Assigned to an investigator
    UnderInvestigation,
    /// Elevated handling (high/critical severity or insufficient authority)
    Escalated,
    /// Closed with a decision and resolution notes
    Resolved,
    /// Closed without action, with a reason
    Dismissed,
}

impl ReportStatus {
    /// Is `self -> to` in the transition table?
    pub fn can_transition(self, to: ReportStatus) -> bool {
        use ReportStatus::*;
        matches!(
            (self, to),
            (Pending, UnderInvestigation)
                | (Pending, Escalated)
                | (Pending, Dismissed)
                | (UnderInvestigation, Escalated)
                | (UnderInvestigation, Resolved)
                | (UnderInvestigation, Dismissed)
                | (Escalated, Resolved)
                | (Escalated, Dismissed)
        )
    }

    /// Terminal states are retained for audit and never move again
    pub fn is_terminal(self) -> bool {
        matches!(self, ReportStatus::Resolved | ReportStatus::Dismissed)
    }
}

/// What kind of misconduct the report alleges
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportType {
    FundMisuse,
    FakeVendor,
    IdentityTheft,
    /// Default for auto-generated reports from the evaluation pipeline
    SuspiciousActivity,
    Other,
}

/// A fraud report case record
///
/// Created on submission (manual or auto-flag); mutated only through the
/// manager's state transitions; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FraudReport {
    /// Human-readable sequential id, e.g. `FR-2024-001`
    pub report_id: String,
    /// Entity the report is filed against
    pub reported_entity: String,
    pub entity_type: EntityType,
    pub report_type: ReportType,
    /// Shares the risk-level vocabulary of the evaluation pipeline
    pub severity: RiskLevel,
    pub status: ReportStatus,
    pub assigned_investigator: Option<String>,
    pub description: String,
    /// Evidence trail, appended during investigation
    pub evidence: Vec<Value>,
    /// Investigation notes, appended during investigation
    pub investigation_notes: Vec<String>,
    pub is_anonymous: bool,
    /// For anonymous reports: sha256 of the reporter identity. The identity
    /// itself is suppressed, the hash keeps an internal audit reference.
    pub reporter_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
}
