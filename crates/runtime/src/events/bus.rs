//! Broadcast bus for decision events.

use tokio::sync::broadcast;

use super::types::DecisionEvent;

/// Best-effort broadcast of [`DecisionEvent`]s.
///
/// Publishing never blocks and never fails: with no subscribers the event is
/// dropped, and lagging subscribers lose the oldest events.
#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<DecisionEvent>,
}

impl EventBus {
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Creates a new event bus with default capacity
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: DecisionEvent) {
        if self.tx.send(event).is_err() {
            // No subscribers - this is normal, not an error
            tracing::trace!("no subscribers for decision events");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DecisionEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use companion_core::Branch;

    use super::*;

    #[test]
    fn publish_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(DecisionEvent::SurvivalReleased { tick: 1 });
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn subscribers_receive_events_in_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(DecisionEvent::BranchChanged {
            tick: 0,
            from: None,
            to: Branch::Utility,
        });
        bus.publish(DecisionEvent::SurvivalReleased { tick: 1 });

        assert_eq!(rx.try_recv().map(|e| e.tick()), Ok(0));
        assert_eq!(rx.try_recv().map(|e| e.tick()), Ok(1));
    }
}
