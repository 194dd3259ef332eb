//! The three static checks run over a transition table.

use crate::core::{Event, State, Transition, TransitionKey};
use crate::validation::error::{DuplicateGroup, ValidationError};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Every state must be the initial state or the target of some transition.
///
/// Unreachable states are reported in `states` order.
pub fn check_reachability<S: State, E: Event>(
    states: &[S],
    initial: &S,
    transitions: &[Transition<S, E>],
) -> Result<(), ValidationError<S, E>> {
    let mut reachable: HashSet<&S> = transitions.iter().map(|t| &t.to).collect();
    reachable.insert(initial);

    let unreachable: Vec<S> = states
        .iter()
        .filter(|s| !reachable.contains(s))
        .cloned()
        .collect();

    if unreachable.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Reachability { unreachable })
    }
}

/// Every state must have a state-changing outgoing transition or be accepting.
///
/// Self-loops do not make a state live: a state whose only exits lead back to
/// itself is a sink unless it is listed in `accepting`.
pub fn check_liveness<S: State, E: Event>(
    states: &[S],
    transitions: &[Transition<S, E>],
    accepting: &HashSet<S>,
) -> Result<(), ValidationError<S, E>> {
    let live: HashSet<&S> = transitions
        .iter()
        .filter(|t| !t.is_self_loop())
        .map(|t| &t.from)
        .collect();

    let sinks: Vec<S> = states
        .iter()
        .filter(|s| !live.contains(s) && !accepting.contains(*s))
        .cloned()
        .collect();

    if sinks.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Liveness { sinks })
    }
}

/// No two transitions may share a `(from, event)` pair, even with the same target.
///
/// Groups are reported in order of their first appearance in the table.
pub fn check_determinism<S: State, E: Event>(
    transitions: &[Transition<S, E>],
) -> Result<(), ValidationError<S, E>> {
    let mut index: HashMap<TransitionKey<S, E>, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup<S, E>> = Vec::new();

    for transition in transitions {
        match index.entry(transition.key()) {
            Entry::Occupied(slot) => groups[*slot.get()].targets.push(transition.to.clone()),
            Entry::Vacant(slot) => {
                slot.insert(groups.len());
                groups.push(DuplicateGroup {
                    from: transition.from.clone(),
                    event: transition.event.clone(),
                    targets: vec![transition.to.clone()],
                });
            }
        }
    }

    groups.retain(|g| g.targets.len() > 1);

    if groups.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Determinism { groups })
    }
}

/// Run reachability, liveness and determinism in that order, stopping at the
/// first failure.
///
/// The state universe is taken from [`State::all_states`].
///
/// # Example
///
/// ```rust
/// use espresso::core::Transition;
/// use espresso::validation::{validate, ValidationError};
/// use espresso::{event_enum, state_enum};
/// use std::collections::HashSet;
///
/// state_enum! {
///     enum Phase { A, B, C }
/// }
///
/// event_enum! {
///     enum Step { X }
/// }
///
/// let table = vec![Transition::new(Phase::A, Step::X, Phase::B)];
/// let err = validate(&Phase::A, &table, &HashSet::new()).unwrap_err();
///
/// assert_eq!(err, ValidationError::Reachability { unreachable: vec![Phase::C] });
/// ```
pub fn validate<S: State, E: Event>(
    initial: &S,
    transitions: &[Transition<S, E>],
    accepting: &HashSet<S>,
) -> Result<(), ValidationError<S, E>> {
    let states = S::all_states();

    check_reachability(&states, initial, transitions)
        .and_then(|()| check_liveness(&states, transitions, accepting))
        .and_then(|()| check_determinism(transitions))
        .inspect_err(|err| {
            tracing::warn!(check = err.check_name(), "transition table rejected: {}", err);
        })
}

/// Run all three checks and collect every failure instead of stopping early.
///
/// Useful for tooling that reports the whole table at once; machine
/// construction uses [`validate`].
pub fn diagnose<S: State, E: Event>(
    initial: &S,
    transitions: &[Transition<S, E>],
    accepting: &HashSet<S>,
) -> Validation<(), NonEmptyVec<ValidationError<S, E>>> {
    let states = S::all_states();

    let checks = vec![
        check_reachability(&states, initial, transitions),
        check_liveness(&states, transitions, accepting),
        check_determinism(transitions),
    ];

    let checks: Vec<Validation<(), NonEmptyVec<ValidationError<S, E>>>> = checks
        .into_iter()
        .map(|check| match check {
            Ok(()) => Validation::success(()),
            Err(err) => Validation::fail(err),
        })
        .collect();

    Validation::all_vec(checks).map(|_| ())
}
