//! Single-consumer dispatch worker.
//!
//! Every event a machine receives becomes a [`Command`] on one FIFO channel.
//! One worker thread drains it, so the lookup, state write and action for an
//! event never interleave with those of another event.

use crate::core::{Event, State, StateHistory, Transition, TransitionKey};
use flume::{Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Messages understood by the worker.
pub(crate) enum Command<E> {
    /// Look up and apply the transition for this event
    Event(E),

    /// Reply `true` if the queue was empty when the barrier was reached
    Barrier(Sender<bool>),

    /// Stop after everything queued before this command
    Shutdown,
}

/// Immutable transition table with its lookup index.
pub(crate) struct Table<S: State, E: Event> {
    pub(crate) transitions: Vec<Transition<S, E>>,
    pub(crate) accepting: HashSet<S>,
    index: HashMap<TransitionKey<S, E>, usize>,
}

impl<S: State, E: Event> Table<S, E> {
    /// Build the index. The table must already have passed the determinism check.
    pub(crate) fn new(transitions: Vec<Transition<S, E>>, accepting: HashSet<S>) -> Self {
        let index = transitions
            .iter()
            .enumerate()
            .map(|(i, t)| (t.key(), i))
            .collect();
        Self {
            transitions,
            accepting,
            index,
        }
    }

    pub(crate) fn lookup(&self, from: &S, event: &E) -> Option<&Transition<S, E>> {
        let key = TransitionKey {
            from: from.clone(),
            event: event.clone(),
        };
        self.index.get(&key).map(|&i| &self.transitions[i])
    }
}

/// State shared between the worker and readers.
pub(crate) struct Shared<S: State, E: Event> {
    pub(crate) current: RwLock<S>,
    pub(crate) history: Option<Mutex<StateHistory<S, E>>>,
}

pub(crate) struct Worker<S: State, E: Event> {
    table: Arc<Table<S, E>>,
    shared: Arc<Shared<S, E>>,
    rx: Receiver<Command<E>>,
}

impl<S: State, E: Event> Worker<S, E> {
    pub(crate) fn new(
        table: Arc<Table<S, E>>,
        shared: Arc<Shared<S, E>>,
        rx: Receiver<Command<E>>,
    ) -> Self {
        Self { table, shared, rx }
    }

    pub(crate) fn run(self) {
        tracing::info!("dispatch worker started");
        while let Ok(command) = self.rx.recv() {
            match command {
                Command::Event(event) => self.dispatch(event),
                Command::Barrier(ack) => {
                    let _ = ack.send(self.rx.is_empty());
                }
                Command::Shutdown => break,
            }
        }
        tracing::info!(pending = self.rx.len(), "dispatch worker stopped");
    }

    fn dispatch(&self, event: E) {
        let transition = {
            let mut current = self.shared.current.write();
            let Some(transition) = self.table.lookup(&current, &event) else {
                tracing::trace!(
                    state = current.name(),
                    event = event.name(),
                    "no transition, event ignored"
                );
                return;
            };

            let from = std::mem::replace(&mut *current, transition.to.clone());
            if let Some(history) = &self.shared.history {
                history
                    .lock()
                    .push(from.clone(), event.clone(), transition.to.clone());
            }
            tracing::debug!(
                event = event.name(),
                "state changed: {} -> {}",
                from.name(),
                transition.to.name()
            );
            transition
        };

        // The write lock is released, so the new state is visible to the action.
        if let Some(action) = &transition.action {
            if panic::catch_unwind(AssertUnwindSafe(|| action())).is_err() {
                tracing::error!(
                    event = event.name(),
                    to = transition.to.name(),
                    "transition action panicked"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_enum, state_enum};
    use std::sync::atomic::{AtomicBool, Ordering};

    state_enum! {
        enum Lamp {
            Off,
            On,
        }
    }

    event_enum! {
        enum Switch {
            Toggle,
            Unplug,
        }
    }

    fn worker_with(
        transitions: Vec<Transition<Lamp, Switch>>,
    ) -> (Worker<Lamp, Switch>, Arc<Shared<Lamp, Switch>>, Sender<Command<Switch>>) {
        let (tx, rx) = flume::unbounded();
        let table = Arc::new(Table::new(transitions, HashSet::new()));
        let shared = Arc::new(Shared {
            current: RwLock::new(Lamp::Off),
            history: Some(Mutex::new(StateHistory::new())),
        });
        (Worker::new(table, Arc::clone(&shared), rx), shared, tx)
    }

    #[test]
    fn lookup_finds_declared_transition() {
        let table = Table::new(
            vec![Transition::new(Lamp::Off, Switch::Toggle, Lamp::On)],
            HashSet::new(),
        );

        assert_eq!(
            table.lookup(&Lamp::Off, &Switch::Toggle).map(|t| t.to.clone()),
            Some(Lamp::On)
        );
        assert!(table.lookup(&Lamp::On, &Switch::Toggle).is_none());
    }

    #[test]
    fn worker_applies_transitions_in_queue_order() {
        let (worker, shared, tx) = worker_with(vec![
            Transition::new(Lamp::Off, Switch::Toggle, Lamp::On),
            Transition::new(Lamp::On, Switch::Toggle, Lamp::Off),
        ]);

        tx.send(Command::Event(Switch::Toggle)).unwrap();
        tx.send(Command::Event(Switch::Unplug)).unwrap();
        tx.send(Command::Event(Switch::Toggle)).unwrap();
        tx.send(Command::Event(Switch::Toggle)).unwrap();
        tx.send(Command::Shutdown).unwrap();
        worker.run();

        assert_eq!(*shared.current.read(), Lamp::On);
        let history = shared.history.as_ref().unwrap().lock();
        assert_eq!(history.total(), 3);
    }

    #[test]
    fn action_sees_new_state() {
        let (tx, rx) = flume::unbounded();
        let shared = Arc::new(Shared {
            current: RwLock::new(Lamp::Off),
            history: None,
        });
        let observed = Arc::new(AtomicBool::new(false));

        let reader = Arc::clone(&shared);
        let flag = Arc::clone(&observed);
        let table = Arc::new(Table::new(
            vec![
                Transition::new(Lamp::Off, Switch::Toggle, Lamp::On).with_action(move || {
                    flag.store(*reader.current.read() == Lamp::On, Ordering::SeqCst);
                }),
            ],
            HashSet::new(),
        ));

        tx.send(Command::Event(Switch::Toggle)).unwrap();
        tx.send(Command::Shutdown).unwrap();
        Worker::new(table, shared, rx).run();

        assert!(observed.load(Ordering::SeqCst));
    }

    #[test]
    fn panicking_action_does_not_stop_worker() {
        let (worker, shared, tx) = worker_with(vec![
            Transition::new(Lamp::Off, Switch::Toggle, Lamp::On).with_action(|| panic!("boom")),
            Transition::new(Lamp::On, Switch::Toggle, Lamp::Off),
        ]);

        tx.send(Command::Event(Switch::Toggle)).unwrap();
        tx.send(Command::Event(Switch::Toggle)).unwrap();
        tx.send(Command::Shutdown).unwrap();
        worker.run();

        assert_eq!(*shared.current.read(), Lamp::Off);
    }

    #[test]
    fn barrier_reports_pending_commands() {
        let (worker, _shared, tx) = worker_with(vec![]);
        let (ack_tx, ack_rx) = flume::unbounded();

        tx.send(Command::Barrier(ack_tx.clone())).unwrap();
        tx.send(Command::Barrier(ack_tx)).unwrap();
        tx.send(Command::Shutdown).unwrap();
        worker.run();

        assert_eq!(ack_rx.try_iter().collect::<Vec<_>>(), vec![false, false]);
    }
}
