//! ReliefGuard Pattern Detector
//!
//! Given a candidate transaction and a read-only snapshot of the actor's
//! recent history, produce the flag/warning set. Each check is an
//! independent, named, pure function; the detector runs all of them and
//! unions their outputs - a transaction may accumulate multiple flags.
//!
//! ## Key components
//!
//! - [`config::DetectorConfig`] - configurable thresholds (never hardcoded globals)
//! - [`signal::Pattern`] / [`signal::Flag`] / [`signal::Warning`] - signal vocabulary
//! - [`history::HistorySnapshot`] - consistent windowed aggregates for one evaluation
//! - [`checks`] - the check registry
//! - [`detector::PatternDetector`] - runs the registry, handles degraded mode

pub mod checks;
pub mod config;
pub mod detector;
pub mod history;
pub mod signal;

pub use config::DetectorConfig;
pub use detector::{Detection, PatternDetector};
pub use history::HistorySnapshot;
pub use signal::{Flag, Pattern, Severity, Warning};
