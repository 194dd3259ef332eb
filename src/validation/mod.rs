//! Static checks over a transition table.
//!
//! A machine refuses to start with a table that has dead configuration:
//!
//! - **Reachability**: every state is the initial state or some transition's target
//! - **Liveness**: every state can move to another state, or is declared accepting
//! - **Determinism**: every `(state, event)` pair selects at most one transition
//!
//! Each check is a pure function returning the exact offending set on failure.
//! [`validate`] runs them fail-fast in that order; [`diagnose`] runs all three
//! and accumulates every failure with Stillwater's `Validation`.

mod checks;
mod error;

pub use checks::{check_determinism, check_liveness, check_reachability, diagnose, validate};
pub use error::{DuplicateGroup, ValidationError};
