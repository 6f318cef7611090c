//! In-process event bus with one bounded queue per subscriber.
//!
//! [`EventBus`] is the publish/subscribe hub for [`ServerEvent`]s. It is
//! shared via `Arc<EventBus>` across the application.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::mpsc;

use crate::event::ServerEvent;

/// Identifier handed out by [`EventBus::subscribe`].
pub type SubscriberId = u64;

/// Default per-subscriber queue capacity.
const DEFAULT_CAPACITY: usize = 64;

/// Fan-out event bus.
///
/// Each subscriber owns a bounded FIFO queue. [`publish`](Self::publish)
/// enqueues without waiting; a subscriber whose queue is closed (client
/// gone) or full (client stalled) is removed from the set immediately.
///
/// # Usage
///
/// ```rust
/// use std::sync::Arc;
/// use slidekiosk_events::{EventBus, ServerEvent, ServerEventKind};
///
/// let bus = Arc::new(EventBus::default());
/// let _sub = bus.subscribe();
///
/// bus.publish(ServerEvent::new(ServerEventKind::DeviceName, serde_json::json!({"name": "hall"})));
/// ```
pub struct EventBus {
    subscribers: Mutex<HashMap<SubscriberId, mpsc::Sender<ServerEvent>>>,
    next_id: AtomicU64,
    capacity: usize,
}

impl EventBus {
    /// Create a bus whose subscriber queues hold `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SubscriberId, mpsc::Sender<ServerEvent>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new subscriber.
    ///
    /// The returned [`Subscription`] unsubscribes itself when dropped.
    pub fn subscribe(self: &Arc<Self>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.capacity);
        self.lock().insert(id, tx);
        tracing::debug!(subscriber = id, "Event subscriber added");

        Subscription {
            id,
            receiver: rx,
            bus: Arc::downgrade(self),
        }
    }

    /// Remove a subscriber by id. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: SubscriberId) {
        if self.lock().remove(&id).is_some() {
            tracing::debug!(subscriber = id, "Event subscriber removed");
        }
    }

    /// Enqueue `event` for every live subscriber.
    ///
    /// Subscribers whose enqueue fails are pruned. Returns the number of
    /// subscribers the event was delivered to.
    pub fn publish(&self, event: ServerEvent) -> usize {
        let mut subs = self.lock();
        let mut delivered = 0;
        subs.retain(|id, tx| match tx.try_send(event.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(subscriber = *id, "Pruning closed event subscriber");
                false
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(subscriber = *id, "Pruning stalled event subscriber");
                false
            }
        });
        tracing::trace!(kind = %event.kind, delivered, "Event published");
        delivered
    }

    /// Current number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    /// Drop every subscriber queue so their streams end.
    ///
    /// Used during graceful shutdown.
    pub fn close_all(&self) {
        let mut subs = self.lock();
        let count = subs.len();
        subs.clear();
        tracing::info!(count, "Closed all event subscribers");
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// A live registration on an [`EventBus`].
pub struct Subscription {
    id: SubscriberId,
    receiver: mpsc::Receiver<ServerEvent>,
    bus: Weak<EventBus>,
}

impl Subscription {
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next event. `None` once the bus dropped this subscriber.
    pub async fn recv(&mut self) -> Option<ServerEvent> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.unsubscribe(self.id);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
