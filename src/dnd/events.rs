//! Board-wide events every list must observe, such as a drag ending
//! somewhere the list never heard about.

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::warn;

const CHANNEL_CAPACITY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalEvent {
    /// A pointer drag ended anywhere on the page
    DragEnd,
    /// Escape was pressed outside any grabbed item
    Escape,
}

/// Fan-out of [`GlobalEvent`]s to subscribed lists
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<GlobalEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: GlobalEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live subscriptions
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// A registration on an [`EventBus`]; dropping it deregisters.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<GlobalEvent>,
}

impl Subscription {
    /// Takes every event published since the last call
    pub fn drain(&mut self) -> Vec<GlobalEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "global event subscription lagged");
                    // Lost events may have included a drag end
                    events.push(GlobalEvent::DragEnd);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_reach_every_subscriber() {
        let bus = EventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(GlobalEvent::DragEnd);
        bus.publish(GlobalEvent::Escape);

        assert_eq!(a.drain(), vec![GlobalEvent::DragEnd, GlobalEvent::Escape]);
        assert_eq!(b.drain(), vec![GlobalEvent::DragEnd, GlobalEvent::Escape]);
        assert!(a.drain().is_empty());
    }

    #[test]
    fn test_dropping_subscription_deregisters() {
        let bus = EventBus::new();
        let subscription = bus.subscribe();
        assert_eq!(bus.listener_count(), 1);

        drop(subscription);
        assert_eq!(bus.listener_count(), 0);

        bus.publish(GlobalEvent::DragEnd);
    }

    #[test]
    fn test_lagging_subscriber_sees_drag_end() {
        let bus = EventBus::new();
        let mut subscription = bus.subscribe();

        for _ in 0..(CHANNEL_CAPACITY + 5) {
            bus.publish(GlobalEvent::Escape);
        }

        assert!(subscription.drain().contains(&GlobalEvent::DragEnd));
    }
}
