//! Core data model of a state machine.
//!
//! This module contains the value types the rest of the crate is built on:
//! - State and event universes via the `State` and `Event` traits
//! - Declared transitions and their lookup keys
//! - The log of applied transitions
//!
//! Nothing in here performs side effects; actions are only stored.

mod event;
mod history;
mod state;
mod transition;

pub use event::Event;
pub use history::{StateHistory, TransitionRecord};
pub use state::State;
pub use transition::{Action, Transition, TransitionKey};
