/**
 * Connection Registry & Broadcaster
 *
 * This module tracks every live notification channel, keyed by subscriber
 * identity, and fans out change events to all of them on every mutation.
 *
 * # Design
 *
 * The registry is an explicit component injected into handlers through
 * `AppState` - there is no module-level singleton. The shared map is the
 * only mutable state this subsystem owns and is guarded by a single coarse
 * `std::sync::Mutex`; register, unregister, and iterate-and-publish each
 * take the lock exactly once, so a publish never iterates a map another
 * task is mutating.
 *
 * # Delivery Model
 *
 * Each channel is the sending half of a bounded `tokio::sync::mpsc` queue.
 * The WebSocket task that registered the channel owns the receiving half
 * and forwards frames to the socket, decoupling `publish` from per-channel
 * I/O latency entirely. `publish` uses `try_send`: a full or closed queue
 * counts as a delivery failure, that channel is pruned in the same critical
 * section, the remaining channels still receive the event, and the call
 * never reports failure to the mutation that triggered it - the write has
 * already committed.
 *
 * # Ordering
 *
 * Events enter each channel's queue in the order `publish` was called
 * (single lock, single pass). There is no cross-channel ordering and no
 * replay: a channel that is down at publish time simply misses the event.
 */

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::realtime::events::ChangeEvent;

/// Bounded capacity of each per-channel delivery queue.
///
/// A viewer that falls this far behind is treated as dead and dropped
/// rather than blocking or buffering without bound.
pub const CHANNEL_QUEUE_CAPACITY: usize = 64;

/// Sending half of one subscriber channel. Carries pre-serialized
/// envelope text so serialization happens once per publish, not once
/// per channel.
pub type ChannelSender = mpsc::Sender<String>;

/// Registry of live notification channels.
///
/// Cloning is cheap; all clones share the same underlying map.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    // subscriber identity -> channel id -> sender
    inner: Arc<Mutex<HashMap<String, HashMap<Uuid, ChannelSender>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a channel under a subscriber identity.
    ///
    /// Set semantics: registering the same (subscriber, channel id) pair
    /// twice replaces the sender rather than duplicating delivery.
    pub fn register(&self, subscriber: &str, channel_id: Uuid, tx: ChannelSender) {
        let mut map = self.inner.lock().expect("registry lock poisoned");
        map.entry(subscriber.to_string())
            .or_default()
            .insert(channel_id, tx);
        tracing::debug!(
            "[Registry] Registered channel {} for subscriber {}",
            channel_id,
            subscriber
        );
    }

    /// Remove a channel. Drops the subscriber entry entirely when its
    /// channel set empties, so connection churn never grows the map.
    pub fn unregister(&self, subscriber: &str, channel_id: Uuid) {
        let mut map = self.inner.lock().expect("registry lock poisoned");
        if let Some(channels) = map.get_mut(subscriber) {
            channels.remove(&channel_id);
            if channels.is_empty() {
                map.remove(subscriber);
            }
        }
        tracing::debug!(
            "[Registry] Unregistered channel {} for subscriber {}",
            channel_id,
            subscriber
        );
    }

    /// Total number of registered channels across all subscribers.
    pub fn channel_count(&self) -> usize {
        let map = self.inner.lock().expect("registry lock poisoned");
        map.values().map(|channels| channels.len()).sum()
    }

    /// Number of distinct subscriber identities currently registered.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().expect("registry lock poisoned").len()
    }

    /// Deliver a change event to every registered channel.
    ///
    /// Returns the number of channels the event was queued for. Channels
    /// whose queue is full or whose receiver is gone are pruned; delivery
    /// failure is resolved here and never propagates to the caller.
    pub fn publish(&self, event: &ChangeEvent) -> usize {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("[Registry] Failed to serialize change event: {:?}", e);
                return 0;
            }
        };

        let mut map = self.inner.lock().expect("registry lock poisoned");
        let mut delivered = 0usize;
        let mut dead: Vec<(String, Uuid)> = Vec::new();

        for (subscriber, channels) in map.iter() {
            for (channel_id, tx) in channels.iter() {
                match tx.try_send(payload.clone()) {
                    Ok(()) => delivered += 1,
                    Err(e) => {
                        tracing::warn!(
                            "[Registry] Dropping channel {} for subscriber {}: {}",
                            channel_id,
                            subscriber,
                            e
                        );
                        dead.push((subscriber.clone(), *channel_id));
                    }
                }
            }
        }

        for (subscriber, channel_id) in dead {
            if let Some(channels) = map.get_mut(&subscriber) {
                channels.remove(&channel_id);
                if channels.is_empty() {
                    map.remove(&subscriber);
                }
            }
        }

        tracing::debug!(
            "[Registry] Published {:?} event for {} to {} channels",
            event.change_type,
            event.entity_type.as_str(),
            delivered
        );
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::events::EntityType;
    use pretty_assertions::assert_eq;

    fn update_event() -> ChangeEvent {
        ChangeEvent::updated(
            EntityType::Client,
            Uuid::new_v4(),
            serde_json::json!({"name": "Ada"}),
        )
    }

    #[tokio::test]
    async fn test_publish_reaches_every_registered_channel() {
        let registry = ConnectionRegistry::new();
        let (tx1, mut rx1) = mpsc::channel(CHANNEL_QUEUE_CAPACITY);
        let (tx2, mut rx2) = mpsc::channel(CHANNEL_QUEUE_CAPACITY);
        registry.register("s1", Uuid::new_v4(), tx1);
        registry.register("s2", Uuid::new_v4(), tx2);

        let delivered = registry.publish(&update_event());
        assert_eq!(delivered, 2);

        let m1 = rx1.try_recv().unwrap();
        let m2 = rx2.try_recv().unwrap();
        assert!(m1.contains("\"data_change\""));
        assert_eq!(m1, m2);

        // Exactly one copy each.
        assert!(rx1.try_recv().is_err());
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unregistered_channel_receives_nothing() {
        let registry = ConnectionRegistry::new();
        let (tx1, mut rx1) = mpsc::channel(CHANNEL_QUEUE_CAPACITY);
        let (tx2, mut rx2) = mpsc::channel(CHANNEL_QUEUE_CAPACITY);
        let c1 = Uuid::new_v4();
        registry.register("s1", c1, tx1);
        registry.register("s2", Uuid::new_v4(), tx2);

        registry.publish(&update_event());
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());

        registry.unregister("s1", c1);
        let delivered = registry.publish(&update_event());
        assert_eq!(delivered, 1);
        assert!(rx1.try_recv().is_err());
        assert!(rx2.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_closed_channel_is_pruned_on_publish() {
        let registry = ConnectionRegistry::new();
        let (tx, rx) = mpsc::channel(CHANNEL_QUEUE_CAPACITY);
        registry.register("s1", Uuid::new_v4(), tx);
        assert_eq!(registry.channel_count(), 1);

        drop(rx);
        let delivered = registry.publish(&update_event());
        assert_eq!(delivered, 0);
        assert_eq!(registry.channel_count(), 0);
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_full_queue_counts_as_delivery_failure() {
        let registry = ConnectionRegistry::new();
        let (tx, _rx) = mpsc::channel(1);
        registry.register("s1", Uuid::new_v4(), tx);

        // First publish fills the queue; second finds it full and prunes.
        assert_eq!(registry.publish(&update_event()), 1);
        assert_eq!(registry.publish(&update_event()), 0);
        assert_eq!(registry.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_one_dead_channel_does_not_abort_delivery_to_others() {
        let registry = ConnectionRegistry::new();
        let (dead_tx, dead_rx) = mpsc::channel(CHANNEL_QUEUE_CAPACITY);
        let (live_tx, mut live_rx) = mpsc::channel(CHANNEL_QUEUE_CAPACITY);
        registry.register("dead", Uuid::new_v4(), dead_tx);
        registry.register("live", Uuid::new_v4(), live_tx);
        drop(dead_rx);

        let delivered = registry.publish(&update_event());
        assert_eq!(delivered, 1);
        assert!(live_rx.try_recv().is_ok());
        assert_eq!(registry.channel_count(), 1);
    }

    #[tokio::test]
    async fn test_per_channel_ordering_follows_publish_order() {
        let registry = ConnectionRegistry::new();
        let (tx, mut rx) = mpsc::channel(CHANNEL_QUEUE_CAPACITY);
        registry.register("s1", Uuid::new_v4(), tx);

        let first = update_event();
        let second = ChangeEvent::deleted(EntityType::Case, Uuid::new_v4());
        registry.publish(&first);
        registry.publish(&second);

        let got_first = rx.try_recv().unwrap();
        let got_second = rx.try_recv().unwrap();
        assert!(got_first.contains("\"update\""));
        assert!(got_second.contains("\"delete\""));
    }

    #[tokio::test]
    async fn test_register_same_pair_twice_keeps_set_semantics() {
        let registry = ConnectionRegistry::new();
        let channel_id = Uuid::new_v4();
        let (tx1, mut rx1) = mpsc::channel(CHANNEL_QUEUE_CAPACITY);
        let (tx2, mut rx2) = mpsc::channel(CHANNEL_QUEUE_CAPACITY);
        registry.register("s1", channel_id, tx1);
        registry.register("s1", channel_id, tx2);

        assert_eq!(registry.channel_count(), 1);
        registry.publish(&update_event());
        assert!(rx1.try_recv().is_err());
        assert!(rx2.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_subscriber_with_multiple_channels() {
        // One viewer, several browser tabs.
        let registry = ConnectionRegistry::new();
        let (tx1, mut rx1) = mpsc::channel(CHANNEL_QUEUE_CAPACITY);
        let (tx2, mut rx2) = mpsc::channel(CHANNEL_QUEUE_CAPACITY);
        registry.register("s1", Uuid::new_v4(), tx1);
        registry.register("s1", Uuid::new_v4(), tx2);

        assert_eq!(registry.subscriber_count(), 1);
        assert_eq!(registry.publish(&update_event()), 2);
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_ok());
    }
}
