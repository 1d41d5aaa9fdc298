//! Fraud engine events
//!
//! Announced on the in-process bus and appended to the audit log. Case and
//! review statuses travel as their wire strings so downstream consumers
//! never need the emitting crate's types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reliefguard_risk::{Action, RiskLevel};

/// Events emitted by the fraud engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum FraudEvent {
    /// A transaction evaluation produced at least one flag
    TransactionFlagged {
        id: String,
        transaction_id: String,
        actor_id: String,
        risk_level: RiskLevel,
        action: Action,
        flag_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A fraud report was opened (manually or auto-generated)
    ReportCreated {
        id: String,
        report_id: String,
        reported_entity: String,
        entity_type: String,
        severity: String,
        auto_generated: bool,
        timestamp: DateTime<Utc>,
    },

    /// A fraud report moved through its state machine
    ReportStatusChanged {
        id: String,
        report_id: String,
        from: String,
        to: String,
        performed_by: String,
        timestamp: DateTime<Utc>,
    },

    /// A flagged transaction received a review decision
    ReviewDecided {
        id: String,
        transaction_id: String,
        decision: String,
        reviewer_id: String,
        timestamp: DateTime<Utc>,
    },

    /// An evaluation ran without transaction history
    DegradedEvaluation {
        id: String,
        transaction_id: String,
        actor_id: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl FraudEvent {
    /// Get the event ID
    pub fn id(&self) -> &str {
        match self {
            FraudEvent::TransactionFlagged { id, .. } => id,
            FraudEvent::ReportCreated { id, .. } => id,
            FraudEvent::ReportStatusChanged { id, .. } => id,
            FraudEvent::ReviewDecided { id, .. } => id,
            FraudEvent::DegradedEvaluation { id, .. } => id,
        }
    }

    /// Get the timestamp
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            FraudEvent::TransactionFlagged { timestamp, .. } => *timestamp,
            FraudEvent::ReportCreated { timestamp, .. } => *timestamp,
            FraudEvent::ReportStatusChanged { timestamp, .. } => *timestamp,
            FraudEvent::ReviewDecided { timestamp, .. } => *timestamp,
            FraudEvent::DegradedEvaluation { timestamp, .. } => *timestamp,
        }
    }

    /// Create a TransactionFlagged event
    pub fn transaction_flagged(
        transaction_id: impl Into<String>,
        actor_id: impl Into<String>,
        risk_level: RiskLevel,
        action: Action,
        flag_count: usize,
    ) -> Self {
        FraudEvent::TransactionFlagged {
            id: uuid::Uuid::new_v4().to_string(),
            transaction_id: transaction_id.into(),
            actor_id: actor_id.into(),
            risk_level,
            action,
            flag_count,
            timestamp: Utc::now(),
        }
    }

    /// Create a ReportCreated event
    pub fn report_created(
        report_id: impl Into<String>,
        reported_entity: impl Into<String>,
        entity_type: impl Into<String>,
        severity: impl Into<String>,
        auto_generated: bool,
    ) -> Self {
        FraudEvent::ReportCreated {
            id: uuid::Uuid::new_v4().to_string(),
            report_id: report_id.into(),
            reported_entity: reported_entity.into(),
            entity_type: entity_type.into(),
            severity: severity.into(),
            auto_generated,
            timestamp: Utc::now(),
        }
    }

    /// Create a ReportStatusChanged event
    pub fn report_status_changed(
        report_id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        performed_by: impl Into<String>,
    ) -> Self {
        FraudEvent::ReportStatusChanged {
            id: uuid::Uuid::new_v4().to_string(),
            report_id: report_id.into(),
            from: from.into(),
            to: to.into(),
            performed_by: performed_by.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a ReviewDecided event
    pub fn review_decided(
        transaction_id: impl Into<String>,
        decision: impl Into<String>,
        reviewer_id: impl Into<String>,
    ) -> Self {
        FraudEvent::ReviewDecided {
            id: uuid::Uuid::new_v4().to_string(),
            transaction_id: transaction_id.into(),
            decision: decision.into(),
            reviewer_id: reviewer_id.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a DegradedEvaluation event
    pub fn degraded_evaluation(
        transaction_id: impl Into<String>,
        actor_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        FraudEvent::DegradedEvaluation {
            id: uuid::Uuid::new_v4().to_string(),
            transaction_id: transaction_id.into(),
            actor_id: actor_id.into(),
            reason: reason.into(),
            timestamp: Utc::now(),
        }
    }
}
