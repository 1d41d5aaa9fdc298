//! ReliefGuard Fraud Engine
//!
//! The evaluation pipeline for candidate transactions:
//!
//! 1. validate the candidate (malformed candidates are rejected whole)
//! 2. take a consistent history snapshot inside a per-actor critical section
//! 3. run the pattern checks (degrading to warnings when history is down)
//! 4. compute the risk level and action recommendation
//! 5. admit the transaction to history unless blocked
//! 6. route to the review queue and open an auto report as the policy demands
//! 7. announce events and append to the audit trail
//!
//! Evaluation is exactly-once per transaction id: a repeat call returns the
//! stored result without re-running the side effects.

pub mod engine;
pub mod error;
pub mod result;

pub use engine::FraudEngine;
pub use error::{EngineError, EngineResult};
pub use result::EvaluationResult;
