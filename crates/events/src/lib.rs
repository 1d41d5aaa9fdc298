//! ReliefGuard Events
//!
//! Fire-and-forget event surface of the fraud engine. Delivery and ordering
//! guarantees for external notification belong to the notifier consuming the
//! bus, not to the core.
//!
//! - [`event::FraudEvent`] - everything the engine announces
//! - [`bus::EventBus`] - in-process broadcast fan-out, publish never blocks
//! - [`audit::AuditLog`] - append-only JSONL trail of published events

pub mod audit;
pub mod bus;
pub mod error;
pub mod event;

pub use audit::AuditLog;
pub use bus::EventBus;
pub use error::{EventError, EventResult};
pub use event::FraudEvent;
