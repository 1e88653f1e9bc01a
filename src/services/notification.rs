//! Notification service implementation
//!
//! Completed registrations and administrative deletes publish domain events
//! on a broadcast channel so listing views know to re-fetch. Subscribers
//! come and go freely; publishing to nobody is not an error.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};
use uuid::Uuid;

/// Domain events that listing views react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainEvent {
    RegistrationCompleted { event_id: Uuid, user_id: Uuid },
    EventDeleted { event_id: Uuid },
    GroupChanged { group_id: Uuid },
}

/// Notification statistics
#[derive(Debug, Clone, Serialize)]
pub struct NotificationStats {
    pub total_published: u64,
    pub subscribers: usize,
}

/// Notification service for refresh events
#[derive(Clone, Debug)]
pub struct NotificationService {
    sender: broadcast::Sender<DomainEvent>,
    published: Arc<AtomicU64>,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Publish a domain event to all current subscribers
    pub fn publish(&self, event: DomainEvent) {
        self.published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event.clone()) {
            Ok(receivers) => {
                debug!(event = ?event, receivers = receivers, "Domain event published");
            }
            Err(_) => {
                // No subscriber is listening right now; the event is only a
                // refresh hint, so this is fine.
                debug!(event = ?event, "Domain event published with no subscribers");
            }
        }
    }

    /// Subscribe to domain events
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        info!("New domain event subscriber");
        self.sender.subscribe()
    }

    /// Get notification statistics
    pub fn stats(&self) -> NotificationStats {
        NotificationStats {
            total_published: self.published.load(Ordering::Relaxed),
            subscribers: self.sender.receiver_count(),
        }
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let service = NotificationService::new(8);
        let mut receiver = service.subscribe();

        let event_id = Uuid::new_v4();
        service.publish(DomainEvent::EventDeleted { event_id });

        let received = receiver.recv().await.unwrap();
        assert_eq!(received, DomainEvent::EventDeleted { event_id });
    }

    #[test]
    fn test_publish_without_subscribers_is_not_an_error() {
        let service = NotificationService::new(8);
        service.publish(DomainEvent::GroupChanged {
            group_id: Uuid::new_v4(),
        });
        assert_eq!(service.stats().total_published, 1);
        assert_eq!(service.stats().subscribers, 0);
    }
}
