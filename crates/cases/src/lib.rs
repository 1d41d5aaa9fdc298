//! ReliefGuard Case Manager
//!
//! Owns the lifecycle of human-filed or auto-generated fraud reports against
//! an entity (vendor or beneficiary), independent of the per-transaction
//! pipeline but sharing its severity/risk vocabulary.
//!
//! The report lifecycle is a closed finite-state machine:
//!
//! ```text
//! pending ──assign──► under_investigation ──resolve──► resolved
//!    │                     │        │
//!    │                     │        └──dismiss──► dismissed
//!    └───────escalate──────┴──► escalated ──► resolved | dismissed
//! ```
//!
//! Any transition not in the table fails with `InvalidStateTransition` and
//! leaves the report untouched. Terminal reports are retained for audit.

pub mod error;
pub mod manager;
pub mod report;

pub use error::{CaseError, CaseResult};
pub use manager::{CaseManager, ReportInput};
pub use report::{FraudReport, ReportStatus, ReportType};
