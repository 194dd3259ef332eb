//! Core Event trait for machine events.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for events that drive a machine.
///
/// Like states, the event universe is closed and enumerated by
/// [`Event::all_events`]. Each event also maps to a trigger identifier, the
/// channel name an [`EventSource`](crate::source::EventSource) uses to deliver
/// it. The engine itself only compares events; the trigger id is for the
/// source adapter.
///
/// # Example
///
/// ```rust
/// use espresso::core::Event;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum DoorEvent {
///     Push,
///     Pull,
/// }
///
/// impl Event for DoorEvent {
///     fn all_events() -> Vec<Self> {
///         vec![Self::Push, Self::Pull]
///     }
///
///     fn name(&self) -> &str {
///         match self {
///             Self::Push => "Push",
///             Self::Pull => "Pull",
///         }
///     }
///
///     fn trigger_id(&self) -> &str {
///         match self {
///             Self::Push => "door.push",
///             Self::Pull => "door.pull",
///         }
///     }
/// }
///
/// assert_eq!(DoorEvent::Push.trigger_id(), "door.push");
/// ```
pub trait Event:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Every value of this type, in declaration order.
    fn all_events() -> Vec<Self>;

    /// Get the event's name for display/logging.
    fn name(&self) -> &str;

    /// Channel name used by the event source to deliver this event.
    ///
    /// Must be unique per event within a machine's event type. Debug builds
    /// check this when a machine subscribes; in release builds a shared id
    /// delivers every event that uses it on a single publish.
    fn trigger_id(&self) -> &str;
}
