//! Core State trait for machine states.
//!
//! A state universe is closed: every value a machine can ever hold is listed
//! by `all_states`, and the validator reasons over that complete list.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// States are plain values. They are never created or destroyed at runtime;
/// the full universe is fixed at compile time and enumerated by
/// [`State::all_states`].
///
/// # Required Traits
///
/// - `Clone` + `Eq` + `Hash`: states key the transition table
/// - `Debug`: states appear in diagnostics and validation errors
/// - `Serialize` + `Deserialize`: states appear in serializable history records
///
/// # Example
///
/// ```rust
/// use espresso::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// impl State for Door {
///     fn all_states() -> Vec<Self> {
///         vec![Self::Open, Self::Closed]
///     }
///
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// assert_eq!(Door::all_states().len(), 2);
/// ```
///
/// Most callers should use [`state_enum!`](crate::state_enum) instead of
/// writing the impl by hand.
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Every value of this type, in declaration order.
    fn all_states() -> Vec<Self>;

    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}
