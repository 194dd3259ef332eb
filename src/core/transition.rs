//! Transition records that make up a machine's table.

use super::event::Event;
use super::state::State;
use std::fmt;
use std::sync::Arc;

/// Side effect run after a transition has been applied.
///
/// Actions run on the machine's dispatch worker. They may post further events
/// (through the event source or [`Machine::handle`](crate::Machine::handle));
/// those are queued behind the current one.
pub type Action = Arc<dyn Fn() + Send + Sync>;

/// Lookup key of a transition: the source state and the triggering event.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TransitionKey<S: State, E: Event> {
    pub from: S,
    pub event: E,
}

/// A declared `(from, event) -> to` transition with an optional action.
///
/// Equality ignores the action: two transitions with the same source, event
/// and target are the same transition.
///
/// # Example
///
/// ```rust
/// use espresso::core::Transition;
/// use espresso::{event_enum, state_enum};
///
/// state_enum! {
///     enum Light { Off, On }
/// }
///
/// event_enum! {
///     enum Switch { Flip }
/// }
///
/// let plain = Transition::new(Light::Off, Switch::Flip, Light::On);
/// let noisy = Transition::new(Light::Off, Switch::Flip, Light::On).with_action(|| {});
///
/// assert_eq!(plain, noisy);
/// assert!(noisy.action.is_some());
/// ```
pub struct Transition<S: State, E: Event> {
    pub from: S,
    pub event: E,
    pub to: S,
    pub action: Option<Action>,
}

impl<S: State, E: Event> Transition<S, E> {
    /// Create a transition without an action.
    pub fn new(from: S, event: E, to: S) -> Self {
        Self {
            from,
            event,
            to,
            action: None,
        }
    }

    /// Attach an action, replacing any previous one.
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(action));
        self
    }

    /// The `(from, event)` key this transition is looked up by.
    pub fn key(&self) -> TransitionKey<S, E> {
        TransitionKey {
            from: self.from.clone(),
            event: self.event.clone(),
        }
    }

    /// Check whether this transition fires for `event` in `current` (pure)
    pub fn matches(&self, current: &S, event: &E) -> bool {
        self.from == *current && self.event == *event
    }

    /// A self-loop leaves the state unchanged and does not count toward liveness.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl<S: State, E: Event> Clone for Transition<S, E> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            event: self.event.clone(),
            to: self.to.clone(),
            action: self.action.as_ref().map(Arc::clone),
        }
    }
}

impl<S: State, E: Event> PartialEq for Transition<S, E> {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.event == other.event && self.to == other.to
    }
}

impl<S: State, E: Event> Eq for Transition<S, E> {}

impl<S: State, E: Event> fmt::Debug for Transition<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("event", &self.event)
            .field("to", &self.to)
            .field("action", &self.action.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_enum, state_enum};
    use std::sync::atomic::{AtomicUsize, Ordering};

    state_enum! {
        enum TestState {
            Start,
            Middle,
            End,
        }
    }

    event_enum! {
        enum TestEvent {
            Go,
            Stop,
        }
    }

    #[test]
    fn equality_ignores_action() {
        let a = Transition::new(TestState::Start, TestEvent::Go, TestState::Middle);
        let b = Transition::new(TestState::Start, TestEvent::Go, TestState::Middle)
            .with_action(|| {});
        let c = Transition::new(TestState::Start, TestEvent::Go, TestState::End);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn key_is_from_and_event() {
        let a = Transition::new(TestState::Start, TestEvent::Go, TestState::Middle);
        let b = Transition::new(TestState::Start, TestEvent::Go, TestState::End);

        assert_eq!(a.key(), b.key());
        assert_eq!(a.key().from, TestState::Start);
        assert_eq!(a.key().event, TestEvent::Go);
    }

    #[test]
    fn matches_requires_state_and_event() {
        let t = Transition::new(TestState::Start, TestEvent::Go, TestState::Middle);

        assert!(t.matches(&TestState::Start, &TestEvent::Go));
        assert!(!t.matches(&TestState::Start, &TestEvent::Stop));
        assert!(!t.matches(&TestState::Middle, &TestEvent::Go));
    }

    #[test]
    fn self_loop_detection() {
        let looped = Transition::new(TestState::End, TestEvent::Stop, TestState::End);
        let moving = Transition::new(TestState::Middle, TestEvent::Stop, TestState::End);

        assert!(looped.is_self_loop());
        assert!(!moving.is_self_loop());
    }

    #[test]
    fn clone_shares_action() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let t = Transition::new(TestState::Start, TestEvent::Go, TestState::Middle)
            .with_action(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        let cloned = t.clone();

        (t.action.as_ref().unwrap())();
        (cloned.action.as_ref().unwrap())();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
