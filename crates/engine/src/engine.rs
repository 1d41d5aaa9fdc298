//! FraudEngine - the evaluation pipeline
//!
//! Same-actor candidates are serialized through a per-actor mutex so that
//! each evaluation sees every previously admitted transaction of that actor;
//! different actors evaluate concurrently. History read failures degrade the
//! evaluation instead of blocking it: relief delivery stays available.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use serde_json::Value;

use reliefguard_cases::CaseManager;
use reliefguard_core::{RoleProvider, Transaction};
use reliefguard_detector::{Detection, DetectorConfig, HistorySnapshot, PatternDetector};
use reliefguard_events::{AuditLog, EventBus, FraudEvent};
use reliefguard_ledger::{LedgerAccessor, LedgerResult};
use reliefguard_review::ReviewQueue;
use reliefguard_risk::{recommend, Action, RiskLevel};

use crate::error::EngineResult;
use crate::result::EvaluationResult;

/// The fraud engine: detector, ledger boundary, review queue, case manager
/// and event surface wired together.
pub struct FraudEngine {
    detector: PatternDetector,
    ledger: Arc<dyn LedgerAccessor>,
    queue: Arc<ReviewQueue>,
    cases: Arc<CaseManager>,
    bus: EventBus,
    audit: Arc<AuditLog>,
    /// One lock per actor id, created on first use
    actor_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    /// Evaluation outcomes keyed by transaction id, for exactly-once semantics
    results: RwLock<HashMap<String, EvaluationResult>>,
}

impl FraudEngine {
    /// Wire up an engine over the given ledger, capability provider and
    /// audit trail. The event bus is created here with the audit log
    /// attached, so every published event lands on the trail; subscribe via
    /// [`Self::bus`].
    pub fn new(
        config: DetectorConfig,
        ledger: Arc<dyn LedgerAccessor>,
        roles: Arc<dyn RoleProvider>,
        audit: AuditLog,
    ) -> Self {
        let audit = Arc::new(audit);
        let bus = EventBus::with_audit(Arc::clone(&audit));
        Self {
            detector: PatternDetector::new(config),
            ledger,
            queue: Arc::new(ReviewQueue::new(Arc::clone(&roles), bus.clone())),
            cases: Arc::new(CaseManager::new(roles, bus.clone())),
            bus,
            audit,
            actor_locks: Mutex::new(HashMap::new()),
            results: RwLock::new(HashMap::new()),
        }
    }

    /// The review queue fed by this engine
    pub fn queue(&self) -> &ReviewQueue {
        &self.queue
    }

    /// The case manager fed by this engine
    pub fn cases(&self) -> &CaseManager {
        &self.cases
    }

    /// The event bus every pipeline stage publishes to
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The audit trail
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Stored outcome of a previous evaluation, if any
    pub fn result(&self, transaction_id: &str) -> Option<EvaluationResult> {
        self.results
            .read()
            .expect("engine results lock poisoned")
            .get(transaction_id)
            .cloned()
    }

    fn actor_lock(&self, actor_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.actor_locks.lock().expect("actor lock table poisoned");
        Arc::clone(locks.entry(actor_id.to_string()).or_default())
    }

    fn snapshot(&self, candidate: &Transaction) -> LedgerResult<HistorySnapshot> {
        let since = candidate.timestamp - self.detector.config().history_window();
        let actor = self.ledger.history(&candidate.actor_id, since)?;
        let received = self
            .ledger
            .received_history(&candidate.counterparty_id, since)?;
        Ok(HistorySnapshot::new(actor, received, candidate.timestamp))
    }

    /// Evaluate one candidate transaction.
    ///
    /// Exactly-once per transaction id: a repeat call returns the stored
    /// result and re-runs none of the side effects. Malformed candidates
    /// are rejected whole before anything else happens.
    pub fn evaluate(&self, candidate: Transaction) -> EngineResult<EvaluationResult> {
        candidate.validate()?;

        if let Some(prior) = self.result(&candidate.id) {
            return Ok(prior);
        }

        let lock = self.actor_lock(&candidate.actor_id);
        let _held = lock.lock().expect("actor lock poisoned");

        // A racing same-id evaluation may have finished while we waited
        if let Some(prior) = self.result(&candidate.id) {
            return Ok(prior);
        }

        let (detection, degraded) = match self.snapshot(&candidate) {
            Ok(snapshot) => (self.detector.detect(&candidate, &snapshot), false),
            Err(err) => {
                self.bus.publish(FraudEvent::degraded_evaluation(
                    &candidate.id,
                    &candidate.actor_id,
                    err.to_string(),
                ));
                (self.detector.detect_degraded(&candidate), true)
            }
        };

        let (risk_level, recommendation) = recommend(&detection.flags, &detection.warnings);

        tracing::info!(
            tx = %candidate.id,
            actor = %candidate.actor_id,
            risk_level = %risk_level,
            action = %recommendation.action,
            flags = detection.flags.len(),
            warnings = detection.warnings.len(),
            degraded,
            "Transaction evaluated"
        );

        // Blocked transactions never enter history
        if recommendation.action != Action::Block {
            if let Err(err) = self.ledger.record(candidate.clone()) {
                tracing::warn!(tx = %candidate.id, %err, "Transaction not admitted to history");
            }
        }

        if recommendation.requires_review {
            self.queue
                .enqueue(candidate.clone(), detection.flags.clone(), risk_level);
        }

        if recommendation.auto_flag {
            self.open_auto_report(&candidate, &detection, risk_level);
        }

        if !detection.flags.is_empty() {
            self.bus.publish(FraudEvent::transaction_flagged(
                &candidate.id,
                &candidate.actor_id,
                risk_level,
                recommendation.action,
                detection.flags.len(),
            ));
        }

        let result = EvaluationResult {
            transaction_id: candidate.id.clone(),
            flags: detection.flags,
            warnings: detection.warnings,
            risk_level,
            recommendation,
            degraded,
            evaluated_at: Utc::now(),
        };
        self.results
            .write()
            .expect("engine results lock poisoned")
            .insert(candidate.id, result.clone());
        Ok(result)
    }

    fn open_auto_report(
        &self,
        candidate: &Transaction,
        detection: &Detection,
        risk_level: RiskLevel,
    ) {
        let evidence: Vec<Value> = detection
            .flags
            .iter()
            .map(|f| serde_json::to_value(f).unwrap_or(Value::Null))
            .collect();
        let description = format!(
            "Automatic report: transaction {} evaluated at {} risk with {} flag(s)",
            candidate.id,
            risk_level,
            detection.flags.len()
        );

        if let Err(err) = self.cases.submit_auto(
            &candidate.actor_id,
            candidate.actor_kind,
            risk_level,
            description,
            evidence,
        ) {
            tracing::warn!(tx = %candidate.id, %err, "Auto report not opened");
        }
    }
}
