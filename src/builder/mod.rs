//! Builder API for ergonomic machine construction.
//!
//! This module provides fluent builders and macros for declaring state and
//! event universes and assembling machines with minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use transition::TransitionBuilder;
