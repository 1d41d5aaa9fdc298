//! ReliefGuard Risk Calculator & Recommendation Engine
//!
//! Pure functions combining the flag/warning set into one of four ordinal
//! risk levels, and mapping the risk level onto a stable action policy.
//! No hidden state: repeated calls with identical input yield identical
//! output, and adding a high-severity flag never decreases the level.

pub mod level;
pub mod policy;

pub use level::{calculate_risk_level, RiskLevel};
pub use policy::{recommend, Action, Recommendation};
