//! In-process event bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use pageshell_domain::event::ShellEvent;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped).
#[derive(Clone)]
pub struct InProcessEventBus {
    sender: broadcast::Sender<ShellEvent>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ShellEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all current subscribers.
    pub fn emit(&self, event: ShellEvent) {
        // Only fails without receivers.
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(path: &str) -> ShellEvent {
        ShellEvent::LocationChanged {
            path: path.to_string(),
            replace: false,
        }
    }

    #[tokio::test]
    async fn should_deliver_event_to_subscriber() {
        let bus = InProcessEventBus::new(16);
        let mut rx = bus.subscribe();

        bus.emit(location("/hassio/dashboard"));

        let received = rx.recv().await.unwrap();
        assert_eq!(received, location("/hassio/dashboard"));
    }

    #[tokio::test]
    async fn should_deliver_event_to_multiple_subscribers() {
        let bus = InProcessEventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(location("/hassio/store"));

        assert_eq!(rx1.recv().await.unwrap(), location("/hassio/store"));
        assert_eq!(rx2.recv().await.unwrap(), location("/hassio/store"));
    }

    #[test]
    fn should_drop_events_without_subscribers() {
        let bus = InProcessEventBus::new(16);
        bus.emit(location("/"));

        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_not_deliver_events_published_before_subscription() {
        let bus = InProcessEventBus::new(16);
        bus.emit(location("/early"));

        let mut rx = bus.subscribe();
        bus.emit(location("/later"));

        assert_eq!(rx.recv().await.unwrap(), location("/later"));
    }
}
