//! Identity lifecycle notifications.

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::utility::tracing_targets::IDENTITY_EVENTS as TRACING_TARGET;

const CHANNEL_CAPACITY: usize = 256;

/// Change to an identity that dependent resources may react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    /// The identity was deleted; resources it owns should be cleaned up.
    Deleted { id: Uuid },
}

/// In-process publisher of [`IdentityEvent`]s.
///
/// Cheap to clone; clones publish to the same channel.
#[derive(Debug, Clone)]
pub struct IdentityEvents {
    sender: broadcast::Sender<IdentityEvent>,
}

impl IdentityEvents {
    /// Creates a publisher with no subscribers.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribes to events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<IdentityEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event. Having no subscribers is not an error.
    pub fn publish(&self, event: IdentityEvent) {
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::debug!(target: TRACING_TARGET, receivers, "Identity event published");
            }
            Err(broadcast::error::SendError(event)) => {
                tracing::trace!(target: TRACING_TARGET, ?event, "Identity event dropped, no subscribers");
            }
        }
    }
}

impl Default for IdentityEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_events() -> anyhow::Result<()> {
        let events = IdentityEvents::new();
        let mut receiver = events.subscribe();

        let id = Uuid::now_v7();
        events.publish(IdentityEvent::Deleted { id });

        assert_eq!(receiver.recv().await?, IdentityEvent::Deleted { id });
        Ok(())
    }

    #[test]
    fn publish_without_subscribers() {
        IdentityEvents::new().publish(IdentityEvent::Deleted { id: Uuid::now_v7() });
    }
}
