//! Notification hub
//!
//! Per-user broadcast channels backed by a DashMap registry. A user may
//! hold several live subscriptions (multiple browser tabs); each gets its
//! own receiver on the same channel.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use desk_core::NotificationEvent;

/// Buffered events per user channel; slow consumers lose oldest events
const CHANNEL_CAPACITY: usize = 64;

/// Registry of per-user notification channels
pub struct NotificationHub {
    channels: DashMap<i64, broadcast::Sender<NotificationEvent>>,
}

impl NotificationHub {
    /// Create a new hub
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Create a new hub wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Subscribe to a user's notification stream
    pub fn subscribe(&self, user_id: i64) -> broadcast::Receiver<NotificationEvent> {
        self.channels
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Publish an event to one user. Returns the number of live receivers.
    pub fn publish_to_user(&self, user_id: i64, event: NotificationEvent) -> usize {
        let Some(sender) = self.channels.get(&user_id) else {
            tracing::debug!(user_id, "No notification channel for user");
            return 0;
        };

        match sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                // Last receiver is gone; drop the stale channel entry
                drop(sender);
                self.channels
                    .remove_if(&user_id, |_, sender| sender.receiver_count() == 0);
                0
            }
        }
    }

    /// Number of users with at least one live subscription
    pub fn connected_users(&self) -> usize {
        self.channels
            .iter()
            .filter(|entry| entry.value().receiver_count() > 0)
            .count()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}
