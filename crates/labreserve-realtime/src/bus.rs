//! Topic-based notification bus.

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

use labreserve_core::events::Notification;
use labreserve_core::types::Topic;

/// In-process pub/sub over broadcast channels, one per topic.
///
/// Publishing is fire-and-forget: a topic with no live subscribers drops
/// the notification, and a slow subscriber that overruns the channel
/// buffer loses the oldest messages. Subscribers that need authoritative
/// state re-poll using the ids carried in the payload.
#[derive(Debug)]
pub struct NotificationBus {
    /// Topic wire name → broadcast sender.
    channels: DashMap<String, broadcast::Sender<Notification>>,
    /// Buffer size for newly created topic channels.
    buffer_size: usize,
}

impl NotificationBus {
    /// Create a new bus. `buffer_size` bounds how far a subscriber may
    /// lag before it starts losing messages.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: DashMap::new(),
            buffer_size,
        }
    }

    /// Publish a notification on its topic. Returns the number of
    /// subscribers it reached.
    pub fn publish(&self, notification: Notification) -> usize {
        let Some(tx) = self.channels.get(&notification.topic) else {
            debug!(topic = %notification.topic, "No subscribers, dropping notification");
            return 0;
        };
        match tx.send(notification) {
            Ok(count) => count,
            Err(_) => 0,
        }
    }

    /// Subscribe to a topic, creating its channel if needed.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Notification> {
        self.channels
            .entry(topic.name())
            .or_insert_with(|| broadcast::channel(self.buffer_size).0)
            .subscribe()
    }

    /// Number of topics with at least one live subscriber.
    pub fn active_topics(&self) -> usize {
        self.channels
            .iter()
            .filter(|tx| tx.receiver_count() > 0)
            .count()
    }
}
