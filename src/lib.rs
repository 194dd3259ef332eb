//! Espresso: a validated finite state machine engine
//!
//! A machine is declared as a closed set of states, a closed set of events and
//! a table of `(from, event) -> to` transitions, each with an optional action.
//! The table is checked once at construction and the machine refuses to start
//! if it contains dead configuration. At runtime, events from any thread are
//! funneled through a single dispatch worker so that no two transitions ever
//! interleave.
//!
//! # Core Concepts
//!
//! - **State / Event**: closed universes via the `State` and `Event` traits
//! - **Transition**: a declared `(from, event) -> to` with an optional action
//! - **Validation**: reachability, liveness and determinism checks
//! - **Event source**: an injected publish/subscribe transport
//! - **Machine**: owns the current state and serializes dispatch
//!
//! # Example
//!
//! ```rust
//! use espresso::core::Transition;
//! use espresso::{event_enum, state_enum, Machine};
//!
//! state_enum! {
//!     enum Cup {
//!         Empty,
//!         Full,
//!     }
//! }
//!
//! event_enum! {
//!     enum CupEvent {
//!         Pour,
//!         Drink,
//!     }
//! }
//!
//! let machine = Machine::detached(
//!     Cup::Empty,
//!     vec![
//!         Transition::new(Cup::Empty, CupEvent::Pour, Cup::Full),
//!         Transition::new(Cup::Full, CupEvent::Drink, Cup::Empty),
//!     ],
//!     [],
//! )
//! .unwrap();
//!
//! machine.handle(CupEvent::Pour);
//! machine.wait_idle().unwrap();
//! assert_eq!(machine.current_state(), Cup::Full);
//! ```

pub mod builder;
pub mod core;
pub mod machine;
pub mod source;
pub mod validation;

// Re-export commonly used types
pub use crate::core::{Event, State, StateHistory, Transition, TransitionRecord};
pub use machine::{DispatchError, Machine, MachineConfig, MachineError};
pub use source::{post_event, EventBus, EventSource};
pub use validation::ValidationError;
