//! Machine construction and dispatch errors.

use crate::core::{Event, State};
use crate::validation::ValidationError;
use thiserror::Error;

/// Errors that prevent a machine from being constructed.
#[derive(Debug, Error)]
pub enum MachineError<S: State, E: Event> {
    /// The transition table failed a static check
    #[error(transparent)]
    Invalid(#[from] ValidationError<S, E>),

    /// The dispatch worker thread could not be spawned
    #[error("Failed to start dispatch worker: {0}")]
    Worker(#[source] std::io::Error),
}

impl<S: State, E: Event> MachineError<S, E> {
    /// The validation failure, if that is why construction failed.
    pub fn validation(&self) -> Option<&ValidationError<S, E>> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Worker(_) => None,
        }
    }
}

/// Errors from waiting on the dispatch queue.
///
/// `handle` itself never fails; these only come from
/// [`Machine::wait_idle`](crate::Machine::wait_idle).
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Machine has been torn down")]
    Stopped,

    #[error("Cannot wait for the dispatch queue from inside a transition action")]
    WouldDeadlock,
}
