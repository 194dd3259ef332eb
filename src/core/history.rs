//! Log of transitions a machine has applied.
//!
//! The dispatch worker appends one record per applied transition. Callers get
//! snapshots through [`Machine::history`](crate::Machine::history).

use super::event::Event;
use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single applied transition.
///
/// # Example
///
/// ```rust
/// use espresso::core::TransitionRecord;
/// use espresso::{event_enum, state_enum};
/// use chrono::Utc;
///
/// state_enum! {
///     enum Task { Pending, Running }
/// }
///
/// event_enum! {
///     enum TaskEvent { Start }
/// }
///
/// let record = TransitionRecord {
///     sequence: 0,
///     from: Task::Pending,
///     event: TaskEvent::Start,
///     to: Task::Running,
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, Task::Running);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State, E: Event> {
    /// Position of this transition among all transitions the machine applied
    pub sequence: u64,
    /// The state being transitioned from
    pub from: S,
    /// The event that fired the transition
    pub event: E,
    /// The state being transitioned to
    pub to: S,
    /// When the state was changed
    pub timestamp: DateTime<Utc>,
}

/// Ordered, optionally bounded history of applied transitions.
///
/// When a limit is set, the oldest records are evicted first. `total()` keeps
/// counting evicted records so sequence numbers stay meaningful.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State, E: Event> {
    records: VecDeque<TransitionRecord<S, E>>,
    limit: Option<usize>,
    total: u64,
}

impl<S: State, E: Event> Default for StateHistory<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> StateHistory<S, E> {
    /// Create a new, unbounded history.
    pub fn new() -> Self {
        Self {
            records: VecDeque::new(),
            limit: None,
            total: 0,
        }
    }

    /// Create a history that keeps at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(limit.min(1024)),
            limit: Some(limit),
            total: 0,
        }
    }

    /// Append a record for a transition just applied.
    ///
    /// The record's sequence number is assigned here.
    pub fn push(&mut self, from: S, event: E, to: S) {
        let record = TransitionRecord {
            sequence: self.total,
            from,
            event,
            to,
            timestamp: Utc::now(),
        };
        self.total += 1;
        self.records.push_back(record);

        if let Some(limit) = self.limit {
            while self.records.len() > limit {
                self.records.pop_front();
            }
        }
    }

    /// Retained records, oldest first.
    pub fn records(&self) -> &VecDeque<TransitionRecord<S, E>> {
        &self.records
    }

    /// Number of transitions ever pushed, including evicted ones.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Get the path of states traversed by the retained records.
    ///
    /// Returns the `from` state of the oldest record, then the `to` state of
    /// each record in order.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.records.front() {
            path.push(&first.from);
        }
        for record in &self.records {
            path.push(&record.to);
        }
        path
    }

    /// Events in the order they were applied.
    pub fn events(&self) -> Vec<&E> {
        self.records.iter().map(|r| &r.event).collect()
    }

    /// Time between the oldest and newest retained record.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.front(), self.records.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }
}
