//! Case manager - guarded transitions over fraud reports
//!
//! Transitions on a given report are serialized through a per-report mutex;
//! transitions on different reports are independent. Every operation
//! validates its preconditions before mutating - a failed call leaves the
//! report exactly as it was.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::{Datelike, Utc};
use serde_json::Value;
use sha2::{Digest, Sha256};

use reliefguard_core::{EntityType, RoleProvider};
use reliefguard_events::{EventBus, FraudEvent};
use reliefguard_risk::RiskLevel;

use crate::error::{CaseError, CaseResult};
use crate::report::{FraudReport, ReportStatus, ReportType};

/// Input for submitting a fraud report
#[derive(Debug, Clone)]
pub struct ReportInput {
    pub reported_entity: String,
    pub entity_type: EntityType,
    pub report_type: ReportType,
    pub severity: RiskLevel,
    pub description: String,
    pub evidence: Vec<Value>,
    pub is_anonymous: bool,
    /// Reporter identity; suppressed (hashed) when `is_anonymous`
    pub reporter_id: Option<String>,
}

/// Owns every fraud report and its lifecycle
pub struct CaseManager {
    reports: RwLock<HashMap<String, Arc<Mutex<FraudReport>>>>,
    /// Per-year sequence for FR-YYYY-NNN ids
    year_seq: Mutex<HashMap<i32, u32>>,
    roles: Arc<dyn RoleProvider>,
    bus: EventBus,
}

impl CaseManager {
    /// Create a manager with the given capability provider and event bus
    pub fn new(roles: Arc<dyn RoleProvider>, bus: EventBus) -> Self {
        Self {
            reports: RwLock::new(HashMap::new()),
            year_seq: Mutex::new(HashMap::new()),
            roles,
            bus,
        }
    }

    fn next_report_id(&self, year: i32) -> String {
        let mut seq = self.year_seq.lock().expect("case manager lock poisoned");
        let n = seq.entry(year).or_insert(0);
        *n += 1;
        format!("FR-{}-{:03}", year, n)
    }

    fn report_handle(&self, report_id: &str) -> CaseResult<Arc<Mutex<FraudReport>>> {
        self.reports
            .read()
            .expect("case manager lock poisoned")
            .get(report_id)
            .cloned()
            .ok_or_else(|| CaseError::ReportNotFound(report_id.to_string()))
    }

    fn require_reviewer(&self, user_id: &str) -> CaseResult<()> {
        if self.roles.can_review(user_id) {
            Ok(())
        } else {
            Err(CaseError::NotAuthorized(user_id.to_string()))
        }
    }

    /// Move a report through the transition table, or fail without mutation
    fn transition(report: &mut FraudReport, to: ReportStatus) -> CaseResult<ReportStatus> {
        let from = report.status;
        if !from.can_transition(to) {
            return Err(CaseError::InvalidStateTransition { from, to });
        }
        report.status = to;
        Ok(from)
    }

    fn publish_status_change(&self, report: &FraudReport, from: ReportStatus, by: &str) {
        tracing::info!(
            report_id = %report.report_id,
            from = %from,
            to = %report.status,
            by,
            "Fraud report status changed"
        );
        self.bus.publish(FraudEvent::report_status_changed(
            report.report_id.clone(),
            from.to_string(),
            report.status.to_string(),
            by,
        ));
    }

    /// Submit a new fraud report (external actor or auto-flag).
    ///
    /// Anonymous reports suppress the reporter identity but retain a sha256
    /// audit reference.
    pub fn submit(&self, input: ReportInput) -> CaseResult<FraudReport> {
        self.submit_inner(input, false)
    }

    fn submit_inner(&self, input: ReportInput, auto_generated: bool) -> CaseResult<FraudReport> {
        if input.reported_entity.trim().is_empty() {
            return Err(CaseError::MissingField("reported_entity"));
        }
        if input.description.trim().is_empty() {
            return Err(CaseError::MissingField("description"));
        }

        let now = Utc::now();
        let report_id = self.next_report_id(now.year());

        let reporter_ref = if input.is_anonymous {
            input.reporter_id.as_deref().map(audit_ref)
        } else {
            input.reporter_id.clone()
        };

        let report = FraudReport {
            report_id: report_id.clone(),
            reported_entity: input.reported_entity,
            entity_type: input.entity_type,
            report_type: input.report_type,
            severity: input.severity,
            status: ReportStatus::Pending,
            assigned_investigator: None,
            description: input.description,
            evidence: input.evidence,
            investigation_notes: Vec::new(),
            is_anonymous: input.is_anonymous,
            reporter_ref,
            created_at: now,
            resolved_at: None,
            resolution_notes: None,
        };

        self.reports
            .write()
            .expect("case manager lock poisoned")
            .insert(report_id.clone(), Arc::new(Mutex::new(report.clone())));

        tracing::info!(
            report_id = %report_id,
            entity = %report.reported_entity,
            severity = %report.severity,
            "Fraud report created"
        );
        self.bus.publish(FraudEvent::report_created(
            report_id,
            report.reported_entity.clone(),
            report.entity_type.to_string(),
            report.severity.to_string(),
            auto_generated,
        ));

        Ok(report)
    }

    /// Submit an auto-generated report from the evaluation pipeline
    pub fn submit_auto(
        &self,
        reported_entity: impl Into<String>,
        entity_type: EntityType,
        severity: RiskLevel,
        description: impl Into<String>,
        evidence: Vec<Value>,
    ) -> CaseResult<FraudReport> {
        self.submit_inner(
            ReportInput {
                reported_entity: reported_entity.into(),
                entity_type,
                report_type: ReportType::SuspiciousActivity,
                severity,
                description: description.into(),
                evidence,
                is_anonymous: false,
                reporter_id: None,
            },
            true,
        )
    }

    /// `pending -> under_investigation`; the investigator must hold the
    /// verifier/admin capability.
    pub fn assign(&self, report_id: &str, investigator_id: &str) -> CaseResult<FraudReport> {
        self.require_reviewer(investigator_id)?;

        let handle = self.report_handle(report_id)?;
        let mut report = handle.lock().expect("report lock poisoned");

        let from = Self::transition(&mut report, ReportStatus::UnderInvestigation)?;
        report.assigned_investigator = Some(investigator_id.to_string());

        self.publish_status_change(&report, from, investigator_id);
        Ok(report.clone())
    }

    /// Append notes/evidence; no state change. Valid only while
    /// `under_investigation` or `escalated`.
    pub fn update_investigation(
        &self,
        report_id: &str,
        by: &str,
        notes: Option<String>,
        evidence: Option<Value>,
    ) -> CaseResult<FraudReport> {
        self.require_reviewer(by)?;

        let handle = self.report_handle(report_id)?;
        let mut report = handle.lock().expect("report lock poisoned");

        if !matches!(
            report.status,
            ReportStatus::UnderInvestigation | ReportStatus::Escalated
        ) {
            return Err(CaseError::NotOpenForUpdate(report.status));
        }

        if let Some(notes) = notes {
            report.investigation_notes.push(notes);
        }
        if let Some(evidence) = evidence {
            report.evidence.push(evidence);
        }
        Ok(report.clone())
    }

    /// `pending|under_investigation -> escalated`.
    ///
    /// Allowed any time severity is high/critical, or when an investigator
    /// flags insufficient authority (the stated reason).
    pub fn escalate(&self, report_id: &str, by: &str, reason: &str) -> CaseResult<FraudReport> {
        if reason.trim().is_empty() {
            return Err(CaseError::MissingField("reason"));
        }

        let handle = self.report_handle(report_id)?;
        let mut report = handle.lock().expect("report lock poisoned");

        if report.severity < RiskLevel::High && !self.roles.can_review(by) {
            return Err(CaseError::EscalationNotAllowed(format!(
                "severity {} requires investigator capability",
                report.severity
            )));
        }

        let from = Self::transition(&mut report, ReportStatus::Escalated)?;
        report
            .investigation_notes
            .push(format!("escalated by {}: {}", by, reason));

        self.publish_status_change(&report, from, by);
        Ok(report.clone())
    }

    /// `under_investigation|escalated -> resolved`; resolution notes required.
    pub fn resolve(&self, report_id: &str, by: &str, notes: &str) -> CaseResult<FraudReport> {
        self.require_reviewer(by)?;
        if notes.trim().is_empty() {
            return Err(CaseError::MissingField("resolution_notes"));
        }

        let handle = self.report_handle(report_id)?;
        let mut report = handle.lock().expect("report lock poisoned");

        let from = Self::transition(&mut report, ReportStatus::Resolved)?;
        report.resolved_at = Some(Utc::now());
        report.resolution_notes = Some(notes.to_string());

        self.publish_status_change(&report, from, by);
        Ok(report.clone())
    }

    /// `pending|under_investigation|escalated -> dismissed`; reason required.
    pub fn dismiss(&self, report_id: &str, by: &str, reason: &str) -> CaseResult<FraudReport> {
        self.require_reviewer(by)?;
        if reason.trim().is_empty() {
            return Err(CaseError::MissingField("reason"));
        }

        let handle = self.report_handle(report_id)?;
        let mut report = handle.lock().expect("report lock poisoned");

        let from = Self::transition(&mut report, ReportStatus::Dismissed)?;
        report.resolved_at = Some(Utc::now());
        report.resolution_notes = Some(reason.to_string());

        self.publish_status_change(&report, from, by);
        Ok(report.clone())
    }

    /// Get a report by id
    pub fn get(&self, report_id: &str) -> CaseResult<FraudReport> {
        let handle = self.report_handle(report_id)?;
        let report = handle.lock().expect("report lock poisoned");
        Ok(report.clone())
    }

    /// All reports currently in `status`
    pub fn list_by_status(&self, status: ReportStatus) -> Vec<FraudReport> {
        let reports = self.reports.read().expect("case manager lock poisoned");
        let mut out: Vec<FraudReport> = reports
            .values()
            .map(|h| h.lock().expect("report lock poisoned").clone())
            .filter(|r| r.status == status)
            .collect();
        out.sort_by(|a, b| a.report_id.cmp(&b.report_id));
        out
    }

    /// Total number of reports (terminal included - never deleted)
    pub fn count(&self) -> usize {
        self.reports.read().expect("case manager lock poisoned").len()
    }
}

/// Internal audit reference for a suppressed reporter identity
fn audit_ref(reporter_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(reporter_id.as_bytes());
    hex::encode(hasher.finalize())
}
