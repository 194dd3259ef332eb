//! In-process event bus.

use super::{Callback, EventSource, SubscriptionId};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-process [`EventSource`] keyed by trigger id.
///
/// `publish` runs callbacks on the publishing thread, outside the bus lock,
/// against a snapshot of the subscribers taken when the publish started.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<HashMap<String, Vec<(SubscriptionId, Callback)>>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscriptions for `trigger`.
    pub fn subscriber_count(&self, trigger: &str) -> usize {
        self.subscribers
            .read()
            .get(trigger)
            .map_or(0, |subs| subs.len())
    }

    /// Number of live subscriptions across all triggers.
    pub fn total_subscribers(&self) -> usize {
        self.subscribers.read().values().map(Vec::len).sum()
    }
}

impl EventSource for EventBus {
    fn subscribe(&self, trigger: &str, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .entry(trigger.to_string())
            .or_default()
            .push((id, callback));
        tracing::trace!(%id, trigger, "subscribed");
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let mut subscribers = self.subscribers.write();
        subscribers.retain(|_, subs| {
            subs.retain(|(sub_id, _)| *sub_id != id);
            !subs.is_empty()
        });
    }

    fn publish(&self, trigger: &str) {
        let callbacks: Vec<Callback> = match self.subscribers.read().get(trigger) {
            Some(subs) => subs.iter().map(|(_, cb)| Callback::clone(cb)).collect(),
            None => return,
        };

        for callback in callbacks {
            callback();
        }
    }
}
