//! Cart change notifications.
//!
//! Every cart mutation publishes a [`CartEvent`]. Subscribers (the HTTP
//! server streams them to browsers) receive events published after they
//! subscribed; a subscriber that falls too far behind skips the oldest ones.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default number of buffered events per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// A change to some user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CartEvent {
    /// The cart contents changed.
    #[serde(rename_all = "camelCase")]
    Updated { user_id: UserId, item_count: i64 },
}

impl CartEvent {
    /// The user whose cart changed.
    pub fn user_id(&self) -> &UserId {
        match self {
            CartEvent::Updated { user_id, .. } => user_id,
        }
    }

    /// Event name used on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            CartEvent::Updated { .. } => "cart-updated",
        }
    }
}

/// Publish/subscribe channel for cart events.
///
/// Cloning yields another handle to the same channel.
#[derive(Debug, Clone)]
pub struct CartEvents {
    sender: broadcast::Sender<CartEvent>,
}

impl CartEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event, returning how many subscribers received it.
    ///
    /// Publishing with no subscribers is not an error.
    pub fn publish(&self, event: CartEvent) -> usize {
        tracing::trace!(user_id = %event.user_id(), event = event.name(), "cart event");
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for CartEvents {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
