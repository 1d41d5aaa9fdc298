//! ReliefGuard Review Queue
//!
//! Holds transactions whose recommendation required a human decision.
//! Enqueueing the same transaction twice is idempotent; each record accepts
//! exactly one decision, and a second, conflicting decision is rejected no
//! matter how the calls interleave.

pub mod error;
pub mod queue;
pub mod record;

pub use error::{ReviewError, ReviewResult};
pub use queue::ReviewQueue;
pub use record::{FlaggedRecord, ReviewDecision, ReviewStatus};
