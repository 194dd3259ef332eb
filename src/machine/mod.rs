//! The running state machine.
//!
//! A [`Machine`] owns the current state and a validated, immutable transition
//! table. Events reach it through [`Machine::handle`] or through the
//! [`EventSource`] it subscribed to at construction. Both paths only enqueue;
//! a single dispatch worker applies events one at a time in arrival order.

mod config;
mod dispatch;
mod error;

pub use config::{MachineConfig, DEFAULT_HISTORY_LIMIT, DEFAULT_WORKER_NAME};
pub use error::{DispatchError, MachineError};

use crate::core::{Event, State, StateHistory, Transition};
use crate::source::{Callback, EventSource, SubscriptionId};
use crate::validation;
use dispatch::{Command, Shared, Table, Worker};
use flume::{RecvTimeoutError, Sender};
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;

const BARRIER_POLL: Duration = Duration::from_millis(50);

/// A validated finite state machine with serialized event dispatch.
///
/// # Example
///
/// ```rust
/// use espresso::core::Transition;
/// use espresso::source::{post_event, EventBus};
/// use espresso::{event_enum, state_enum, Machine};
/// use std::sync::Arc;
///
/// state_enum! {
///     enum Door { Closed, Open }
/// }
///
/// event_enum! {
///     enum DoorEvent {
///         Push => "door.push",
///         Pull => "door.pull",
///     }
/// }
///
/// let bus = Arc::new(EventBus::new());
/// let machine = Machine::new(
///     Door::Closed,
///     vec![
///         Transition::new(Door::Closed, DoorEvent::Push, Door::Open),
///         Transition::new(Door::Open, DoorEvent::Pull, Door::Closed),
///     ],
///     [],
///     bus.clone(),
/// )
/// .unwrap();
///
/// post_event(bus.as_ref(), &DoorEvent::Push);
/// machine.wait_idle().unwrap();
/// assert_eq!(machine.current_state(), Door::Open);
/// ```
pub struct Machine<S: State, E: Event> {
    table: Arc<Table<S, E>>,
    shared: Arc<Shared<S, E>>,
    tx: Sender<Command<E>>,
    source: Option<Arc<dyn EventSource>>,
    subscriptions: Mutex<Vec<SubscriptionId>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    worker_thread: ThreadId,
    stopped: AtomicBool,
}

impl<S: State, E: Event> Machine<S, E> {
    /// Validate the table, subscribe to `source` for every event and start
    /// dispatching, using the default [`MachineConfig`].
    pub fn new<Src>(
        initial: S,
        transitions: Vec<Transition<S, E>>,
        accepting: impl IntoIterator<Item = S>,
        source: Arc<Src>,
    ) -> Result<Self, MachineError<S, E>>
    where
        Src: EventSource + 'static,
    {
        let source: Arc<dyn EventSource> = source;
        Self::with_config(
            initial,
            transitions,
            accepting,
            Some(source),
            MachineConfig::default(),
        )
    }

    /// Like [`Machine::new`], but without an event source.
    ///
    /// The machine is driven through [`Machine::handle`] only.
    pub fn detached(
        initial: S,
        transitions: Vec<Transition<S, E>>,
        accepting: impl IntoIterator<Item = S>,
    ) -> Result<Self, MachineError<S, E>> {
        Self::with_config(initial, transitions, accepting, None, MachineConfig::default())
    }

    /// Construct with an optional event source and explicit configuration.
    ///
    /// Subscriptions are made before validation and removed again if any
    /// check fails, so a rejected table leaves nothing registered.
    pub fn with_config(
        initial: S,
        transitions: Vec<Transition<S, E>>,
        accepting: impl IntoIterator<Item = S>,
        source: Option<Arc<dyn EventSource>>,
        config: MachineConfig,
    ) -> Result<Self, MachineError<S, E>> {
        let accepting: HashSet<S> = accepting.into_iter().collect();
        let (tx, rx) = flume::unbounded();

        let subscriptions = match &source {
            Some(source) => subscribe_all::<E>(source.as_ref(), &tx),
            None => Vec::new(),
        };

        if let Err(err) = validation::validate(&initial, &transitions, &accepting) {
            unsubscribe_all(source.as_deref(), subscriptions);
            return Err(err.into());
        }

        let table = Arc::new(Table::new(transitions, accepting));
        let shared = Arc::new(Shared {
            current: RwLock::new(initial.clone()),
            history: config
                .records_history()
                .then(|| Mutex::new(StateHistory::with_limit(config.history_limit))),
        });

        let worker = Worker::new(Arc::clone(&table), Arc::clone(&shared), rx);
        let handle = match thread::Builder::new()
            .name(config.worker_name.clone())
            .spawn(move || worker.run())
        {
            Ok(handle) => handle,
            Err(err) => {
                unsubscribe_all(source.as_deref(), subscriptions);
                return Err(MachineError::Worker(err));
            }
        };

        tracing::info!(
            initial = initial.name(),
            transitions = table.transitions.len(),
            subscriptions = subscriptions.len(),
            worker = %config.worker_name,
            "machine started"
        );

        Ok(Self {
            worker_thread: handle.thread().id(),
            table,
            shared,
            tx,
            source,
            subscriptions: Mutex::new(subscriptions),
            worker: Mutex::new(Some(handle)),
            stopped: AtomicBool::new(false),
        })
    }

    /// Enqueue `event` for dispatch and return immediately.
    ///
    /// Safe to call from any thread, including from inside a transition
    /// action. Events with no transition from the state current at dispatch
    /// time are ignored. After [`Machine::teardown`] this is a no-op.
    pub fn handle(&self, event: E) {
        if self.stopped.load(Ordering::Acquire) {
            tracing::trace!(event = event.name(), "machine stopped, event dropped");
            return;
        }
        if self.tx.send(Command::Event(event)).is_err() {
            tracing::trace!("dispatch worker gone, event dropped");
        }
    }

    /// State after the most recently completed transition.
    pub fn current_state(&self) -> S {
        self.shared.current.read().clone()
    }

    /// Check if the current state is one of the accepting states.
    pub fn is_accepting(&self) -> bool {
        self.table.accepting.contains(&*self.shared.current.read())
    }

    pub fn accepting_states(&self) -> &HashSet<S> {
        &self.table.accepting
    }

    /// The transition table, in declaration order.
    pub fn transitions(&self) -> &[Transition<S, E>] {
        &self.table.transitions
    }

    /// Snapshot of applied transitions. Empty when history is disabled.
    pub fn history(&self) -> StateHistory<S, E> {
        match &self.shared.history {
            Some(history) => history.lock().clone(),
            None => StateHistory::new(),
        }
    }

    /// Whether the machine still accepts events.
    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::Acquire)
    }

    /// Block until every queued event, including events posted by actions
    /// while draining, has been dispatched.
    pub fn wait_idle(&self) -> Result<(), DispatchError> {
        self.ensure_waitable()?;
        loop {
            let (ack_tx, ack_rx) = flume::bounded(1);
            self.tx
                .send(Command::Barrier(ack_tx))
                .map_err(|_| DispatchError::Stopped)?;

            let idle = loop {
                match ack_rx.recv_timeout(BARRIER_POLL) {
                    Ok(idle) => break idle,
                    Err(RecvTimeoutError::Timeout) if self.is_running() => continue,
                    Err(_) => return Err(DispatchError::Stopped),
                }
            };
            if idle {
                return Ok(());
            }
        }
    }

    /// Async counterpart of [`Machine::wait_idle`].
    pub async fn wait_idle_async(&self) -> Result<(), DispatchError> {
        self.ensure_waitable()?;
        loop {
            let (ack_tx, ack_rx) = flume::bounded(1);
            self.tx
                .send(Command::Barrier(ack_tx))
                .map_err(|_| DispatchError::Stopped)?;

            match ack_rx.recv_async().await {
                Ok(true) => return Ok(()),
                Ok(false) => continue,
                Err(_) => return Err(DispatchError::Stopped),
            }
        }
    }

    /// Remove every subscription and stop the dispatch worker.
    ///
    /// Events queued before the call are still dispatched. Only the first
    /// call does anything; later and concurrent calls return immediately.
    /// Called from a transition action, the worker stops once that action
    /// returns instead of being joined.
    pub fn teardown(&self) {
        if self.stopped.swap(true, Ordering::AcqRel) {
            return;
        }

        let subscriptions = std::mem::take(&mut *self.subscriptions.lock());
        let removed = subscriptions.len();
        unsubscribe_all(self.source.as_deref(), subscriptions);

        let _ = self.tx.send(Command::Shutdown);
        if thread::current().id() != self.worker_thread {
            if let Some(handle) = self.worker.lock().take() {
                if handle.join().is_err() {
                    tracing::error!("dispatch worker panicked");
                }
            }
        }

        tracing::info!(
            state = self.shared.current.read().name(),
            subscriptions = removed,
            "machine torn down"
        );
    }

    fn ensure_waitable(&self) -> Result<(), DispatchError> {
        if !self.is_running() {
            Err(DispatchError::Stopped)
        } else if thread::current().id() == self.worker_thread {
            Err(DispatchError::WouldDeadlock)
        } else {
            Ok(())
        }
    }
}

impl<S: State, E: Event> Drop for Machine<S, E> {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Subscribe one forwarding callback per event.
///
/// Callbacks hold a weak sender, so a subscription never keeps the dispatch
/// channel alive on its own. Debug builds panic if two events share a trigger
/// id, since one publish would then enqueue both.
fn subscribe_all<E: Event>(
    source: &dyn EventSource,
    tx: &Sender<Command<E>>,
) -> Vec<SubscriptionId> {
    let events = E::all_events();
    debug_assert_eq!(
        events.iter().map(|e| e.trigger_id()).collect::<HashSet<_>>().len(),
        events.len(),
        "trigger ids must be unique per event"
    );

    events
        .into_iter()
        .map(|event| {
            let trigger = event.trigger_id().to_string();
            let weak = tx.downgrade();
            let callback: Callback = Arc::new(move || {
                if let Some(tx) = weak.upgrade() {
                    let _ = tx.send(Command::Event(event.clone()));
                }
            });
            source.subscribe(&trigger, callback)
        })
        .collect()
}

fn unsubscribe_all(source: Option<&dyn EventSource>, subscriptions: Vec<SubscriptionId>) {
    if let Some(source) = source {
        for id in subscriptions {
            source.unsubscribe(id);
        }
    }
}
