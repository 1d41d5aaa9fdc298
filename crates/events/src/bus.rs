//! In-process event bus
//!
//! Broadcast fan-out: any number of subscribers, publishing never blocks and
//! never fails the caller. A subscriber that falls behind loses old events
//! (the notifier owns delivery guarantees, not the core). When an audit log
//! is attached, every published event is appended to it before fan-out.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::audit::AuditLog;
use crate::event::FraudEvent;

const DEFAULT_CAPACITY: usize = 1024;

/// Cloneable handle for publishing and subscribing to fraud events
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<FraudEvent>,
    audit: Option<Arc<AuditLog>>,
}

impl EventBus {
    /// Create a bus with the default buffer capacity and no audit log
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a bus with an explicit per-subscriber buffer capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            audit: None,
        }
    }

    /// Create a bus whose published events are also appended to `audit`
    pub fn with_audit(audit: Arc<AuditLog>) -> Self {
        Self {
            audit: Some(audit),
            ..Self::new()
        }
    }

    /// Publish an event, fire-and-forget.
    ///
    /// The event lands on the audit trail first, then fans out. Having no
    /// subscribers is not an error; it just means nobody is listening right
    /// now.
    pub fn publish(&self, event: FraudEvent) {
        if let Some(audit) = &self.audit {
            if let Err(err) = audit.append(&event) {
                tracing::error!(event_id = event.id(), %err, "Audit append failed");
            }
        }
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::debug!(receivers, "Event published");
            }
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!(event_id = event.id(), "Event published with no subscribers");
            }
        }
    }

    /// Subscribe to all events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<FraudEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reliefguard_risk::{Action, RiskLevel};

    #[test]
    fn test_publish_without_subscribers_is_ok() {
        let bus = EventBus::new();
        bus.publish(FraudEvent::review_decided("TX-1", "approve", "alice"));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(FraudEvent::transaction_flagged(
            "TX-1",
            "BEN-001",
            RiskLevel::Critical,
            Action::Block,
            2,
        ));

        let event = rx.recv().await.unwrap();
        match event {
            FraudEvent::TransactionFlagged { transaction_id, risk_level, .. } => {
                assert_eq!(transaction_id, "TX-1");
                assert_eq!(risk_level, RiskLevel::Critical);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_multiple_subscribers_fan_out() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(FraudEvent::report_created(
            "FR-2024-001",
            "VEN-001",
            "vendor",
            "high",
            true,
        ));

        assert_eq!(rx1.recv().await.unwrap().id(), rx2.recv().await.unwrap().id());
    }

    #[test]
    fn test_attached_audit_log_records_published_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let audit = Arc::new(AuditLog::new(&path).unwrap());
        let bus = EventBus::with_audit(Arc::clone(&audit));

        let event = FraudEvent::review_decided("TX-1", "approve", "alice");
        let event_id = event.id().to_string();
        bus.publish(event);

        let events = audit.read_all().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id(), event_id);
    }
}
