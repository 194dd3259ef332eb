//! Event sources that deliver events to machines.
//!
//! A machine never talks to a transport directly. It subscribes one callback
//! per event through an injected [`EventSource`] and drops those
//! subscriptions on teardown. Producers publish by trigger id, usually via
//! [`post_event`].
//!
//! [`EventBus`] is the in-process implementation; anything else (a message
//! broker, an OS notification center) only needs to implement the trait.

mod bus;

pub use bus::EventBus;

use crate::core::Event;
use std::fmt;
use std::sync::Arc;

/// Callback invoked when a trigger is published.
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Opaque handle to a subscription, used to remove it later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wrap a raw id. Sources are responsible for keeping ids unique.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id, for sources that key their own storage by it.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Publish/subscribe transport keyed by trigger id.
///
/// Implementations must tolerate callbacks that publish, subscribe or
/// unsubscribe while being invoked.
pub trait EventSource: Send + Sync {
    /// Register `callback` for `trigger`.
    fn subscribe(&self, trigger: &str, callback: Callback) -> SubscriptionId;

    /// Remove a subscription. Unknown or already removed ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);

    /// Invoke every callback currently subscribed to `trigger`.
    fn publish(&self, trigger: &str);
}

/// Publish `event` on `source` under its trigger id.
///
/// # Example
///
/// ```rust
/// use espresso::source::{post_event, EventBus, EventSource};
/// use espresso::event_enum;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// event_enum! {
///     enum Bell {
///         Ring => "door.bell",
///     }
/// }
///
/// let bus = EventBus::new();
/// let rang = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&rang);
/// bus.subscribe("door.bell", Arc::new(move || flag.store(true, Ordering::SeqCst)));
///
/// post_event(&bus, &Bell::Ring);
/// assert!(rang.load(Ordering::SeqCst));
/// ```
pub fn post_event<E, Src>(source: &Src, event: &E)
where
    E: Event,
    Src: EventSource + ?Sized,
{
    tracing::trace!(event = event.name(), trigger = event.trigger_id(), "posting event");
    source.publish(event.trigger_id());
}
