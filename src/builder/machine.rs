//! Builder for constructing machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Event, State, Transition};
use crate::machine::{Machine, MachineConfig};
use crate::source::EventSource;
use std::sync::Arc;

/// Builder for constructing machines with a fluent API.
///
/// # Example
///
/// ```
/// use espresso::builder::{MachineBuilder, TransitionBuilder};
/// use espresso::source::EventBus;
/// use espresso::{event_enum, state_enum};
/// use std::sync::Arc;
///
/// state_enum! {
///     enum Grinder { Empty, Loaded, Ground }
/// }
///
/// event_enum! {
///     enum GrinderEvent { Fill, Grind }
/// }
///
/// let machine = MachineBuilder::new()
///     .initial(Grinder::Empty)
///     .transition(
///         TransitionBuilder::new()
///             .from(Grinder::Empty)
///             .on(GrinderEvent::Fill)
///             .to(Grinder::Loaded),
///     )
///     .unwrap()
///     .transition(
///         TransitionBuilder::new()
///             .from(Grinder::Loaded)
///             .on(GrinderEvent::Grind)
///             .to(Grinder::Ground),
///     )
///     .unwrap()
///     .accepting([Grinder::Ground])
///     .source(Arc::new(EventBus::new()))
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.current_state(), Grinder::Empty);
/// ```
pub struct MachineBuilder<S: State, E: Event> {
    initial: Option<S>,
    transitions: Vec<Transition<S, E>>,
    accepting: Vec<S>,
    source: Option<Arc<dyn EventSource>>,
    config: MachineConfig,
}

impl<S: State, E: Event> MachineBuilder<S, E> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            transitions: Vec::new(),
            accepting: Vec::new(),
            source: None,
            config: MachineConfig::default(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<S, E>) -> Result<Self, BuildError<S, E>> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<S, E>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<S, E>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Declare states that may be sinks.
    pub fn accepting(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.accepting.extend(states);
        self
    }

    /// Subscribe the machine to `source`. Without one the machine is detached.
    pub fn source<Src>(mut self, source: Arc<Src>) -> Self
    where
        Src: EventSource + 'static,
    {
        let source: Arc<dyn EventSource> = source;
        self.source = Some(source);
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build and start the machine.
    /// Fails if the initial state is missing or the table is rejected.
    pub fn build(self) -> Result<Machine<S, E>, BuildError<S, E>> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        let machine = Machine::with_config(
            initial,
            self.transitions,
            self.accepting,
            self.source,
            self.config,
        )?;

        Ok(machine)
    }
}

impl<S: State, E: Event> Default for MachineBuilder<S, E> {
    fn default() -> Self {
        Self::new()
    }
}
