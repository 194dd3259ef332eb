//! Macros that declare closed state and event universes.

/// Declare a state enum and implement [`State`](crate::core::State) for it.
///
/// The variant list is the single source of `all_states()`, and `name()` is
/// an exhaustive match, so the universe cannot drift from the enum.
///
/// # Example
///
/// ```
/// use espresso::core::State;
/// use espresso::state_enum;
///
/// state_enum! {
///     pub enum Kettle {
///         Cold,
///         Heating,
///         Boiled,
///     }
/// }
///
/// assert_eq!(Kettle::all_states(), vec![Kettle::Cold, Kettle::Heating, Kettle::Boiled]);
/// assert_eq!(Kettle::Heating.name(), "Heating");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn all_states() -> Vec<Self> {
                vec![$(Self::$variant),*]
            }

            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Declare an event enum and implement [`Event`](crate::core::Event) for it.
///
/// Each variant may name its trigger id with `=> "id"`; otherwise the id is
/// `"<Enum>.<Variant>"`.
///
/// # Example
///
/// ```
/// use espresso::core::Event;
/// use espresso::event_enum;
///
/// event_enum! {
///     pub enum KettleEvent {
///         SwitchOn => "kettle.on",
///         Boil,
///     }
/// }
///
/// assert_eq!(KettleEvent::SwitchOn.trigger_id(), "kettle.on");
/// assert_eq!(KettleEvent::Boil.trigger_id(), "KettleEvent.Boil");
/// assert_eq!(KettleEvent::all_events().len(), 2);
/// ```
#[macro_export]
macro_rules! event_enum {
    (@trigger $name:ident $variant:ident) => {
        concat!(stringify!($name), ".", stringify!($variant))
    };
    (@trigger $name:ident $variant:ident $trigger:literal) => {
        $trigger
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $(=> $trigger:literal)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Event for $name {
            fn all_events() -> Vec<Self> {
                vec![$(Self::$variant),*]
            }

            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn trigger_id(&self) -> &str {
                match self {
                    $(Self::$variant => $crate::event_enum!(@trigger $name $variant $($trigger)?)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Event, State};
    use std::collections::HashSet;

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
        }
    }

    event_enum! {
        enum TestEvent {
            Start => "job.start",
            Finish,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(
            TestState::all_states(),
            vec![TestState::Initial, TestState::Processing, TestState::Complete]
        );
        assert_eq!(TestState::Processing.name(), "Processing");
    }

    #[test]
    fn event_enum_uses_explicit_or_default_triggers() {
        assert_eq!(TestEvent::Start.trigger_id(), "job.start");
        assert_eq!(TestEvent::Finish.trigger_id(), "TestEvent.Finish");
        assert_eq!(TestEvent::Finish.name(), "Finish");
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            pub enum PublicState {
                A,
                B,
            }
        }

        assert_eq!(PublicState::all_states().len(), 2);
    }

    #[test]
    fn generated_universes_have_no_duplicates() {
        let states: HashSet<_> = TestState::all_states().into_iter().collect();
        let events: HashSet<_> = TestEvent::all_events().into_iter().collect();

        assert_eq!(states.len(), TestState::all_states().len());
        assert_eq!(events.len(), TestEvent::all_events().len());
    }
}
