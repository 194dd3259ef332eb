//! Validation errors reported when a transition table is rejected.

use crate::core::{Event, State};
use thiserror::Error;

/// Transitions that share a `(from, event)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup<S: State, E: Event> {
    pub from: S,
    pub event: E,
    /// Every declared target, in table order. May repeat the same state.
    pub targets: Vec<S>,
}

/// Reasons a transition table is refused at construction.
///
/// Each variant carries the exact offending set so callers can report or fix
/// the table without re-running the checks.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError<S: State, E: Event> {
    /// Declared states with no incoming transition that are not the initial state
    #[error("Reachability check failed, unreachable states: {unreachable:?}")]
    Reachability { unreachable: Vec<S> },

    /// States that can never change state and are not declared accepting
    #[error("Liveness check failed, sink states: {sinks:?}")]
    Liveness { sinks: Vec<S> },

    /// `(from, event)` pairs that map to more than one transition
    #[error("Determinism check failed, ambiguous transitions: {groups:?}")]
    Determinism { groups: Vec<DuplicateGroup<S, E>> },
}

impl<S: State, E: Event> ValidationError<S, E> {
    /// Short name of the check that failed.
    pub fn check_name(&self) -> &'static str {
        match self {
            Self::Reachability { .. } => "reachability",
            Self::Liveness { .. } => "liveness",
            Self::Determinism { .. } => "determinism",
        }
    }
}
