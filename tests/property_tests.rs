//! Property-based tests for validation and dispatch.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated transition tables and event sequences.

use espresso::core::{State, Transition};
use espresso::validation::{
    check_determinism, check_liveness, check_reachability, diagnose, validate, ValidationError,
};
use espresso::{event_enum, state_enum, Machine};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;

state_enum! {
    enum TestState {
        A,
        B,
        C,
        D,
    }
}

event_enum! {
    enum TestEvent {
        X,
        Y,
        Z,
    }
}

prop_compose! {
    fn arbitrary_state()(variant in 0..4u8) -> TestState {
        match variant {
            0 => TestState::A,
            1 => TestState::B,
            2 => TestState::C,
            _ => TestState::D,
        }
    }
}

prop_compose! {
    fn arbitrary_event()(variant in 0..3u8) -> TestEvent {
        match variant {
            0 => TestEvent::X,
            1 => TestEvent::Y,
            _ => TestEvent::Z,
        }
    }
}

prop_compose! {
    fn arbitrary_triple()(
        from in arbitrary_state(),
        event in arbitrary_event(),
        to in arbitrary_state(),
    ) -> (TestState, TestEvent, TestState) {
        (from, event, to)
    }
}

fn table_of(triples: &[(TestState, TestEvent, TestState)]) -> Vec<Transition<TestState, TestEvent>> {
    triples
        .iter()
        .map(|&(from, event, to)| Transition::new(from, event, to))
        .collect()
}

/// A cycle over every state on `X`, plus extra transitions on `Y`/`Z` with
/// unique keys. Always passes validation.
fn valid_table(extra: &[(TestState, TestEvent, TestState)]) -> Vec<Transition<TestState, TestEvent>> {
    let mut table = vec![
        Transition::new(TestState::A, TestEvent::X, TestState::B),
        Transition::new(TestState::B, TestEvent::X, TestState::C),
        Transition::new(TestState::C, TestEvent::X, TestState::D),
        Transition::new(TestState::D, TestEvent::X, TestState::A),
    ];
    let mut seen = HashSet::new();
    for &(from, event, to) in extra {
        if event != TestEvent::X && seen.insert((from, event)) {
            table.push(Transition::new(from, event, to));
        }
    }
    table
}

fn model_step(
    table: &[Transition<TestState, TestEvent>],
    state: TestState,
    event: TestEvent,
) -> Option<TestState> {
    table.iter().find(|t| t.matches(&state, &event)).map(|t| t.to)
}

proptest! {
    #[test]
    fn reachability_reports_exactly_the_untargeted_states(
        initial in arbitrary_state(),
        triples in prop::collection::vec(arbitrary_triple(), 0..8),
    ) {
        let table = table_of(&triples);
        let targeted: HashSet<TestState> = triples.iter().map(|t| t.2).collect();
        let expected: Vec<TestState> = TestState::all_states()
            .into_iter()
            .filter(|s| *s != initial && !targeted.contains(s))
            .collect();

        match check_reachability(&TestState::all_states(), &initial, &table) {
            Ok(()) => prop_assert!(expected.is_empty()),
            Err(ValidationError::Reachability { unreachable }) => prop_assert_eq!(unreachable, expected),
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    #[test]
    fn liveness_ignores_self_loops(
        triples in prop::collection::vec(arbitrary_triple(), 0..8),
        accepting in prop::collection::hash_set(arbitrary_state(), 0..4),
    ) {
        let table = table_of(&triples);
        let live: HashSet<TestState> = triples
            .iter()
            .filter(|t| t.0 != t.2)
            .map(|t| t.0)
            .collect();
        let expected: Vec<TestState> = TestState::all_states()
            .into_iter()
            .filter(|s| !live.contains(s) && !accepting.contains(s))
            .collect();

        match check_liveness(&TestState::all_states(), &table, &accepting) {
            Ok(()) => prop_assert!(expected.is_empty()),
            Err(ValidationError::Liveness { sinks }) => prop_assert_eq!(sinks, expected),
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    #[test]
    fn determinism_fails_iff_a_key_repeats(
        triples in prop::collection::vec(arbitrary_triple(), 0..10),
    ) {
        let table = table_of(&triples);
        let mut counts: HashMap<(TestState, TestEvent), usize> = HashMap::new();
        for &(from, event, _) in &triples {
            *counts.entry((from, event)).or_default() += 1;
        }
        let repeated = counts.values().filter(|&&n| n > 1).count();

        match check_determinism(&table) {
            Ok(()) => prop_assert_eq!(repeated, 0),
            Err(ValidationError::Determinism { groups }) => {
                prop_assert_eq!(groups.len(), repeated);
                for group in groups {
                    prop_assert_eq!(group.targets.len(), counts[&(group.from, group.event)]);
                }
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }

    #[test]
    fn validate_reports_first_failing_check_of_diagnose(
        initial in arbitrary_state(),
        triples in prop::collection::vec(arbitrary_triple(), 0..8),
        accepting in prop::collection::hash_set(arbitrary_state(), 0..4),
    ) {
        let table = table_of(&triples);
        let fail_fast = validate(&initial, &table, &accepting);

        match diagnose(&initial, &table, &accepting) {
            Validation::Success(_) => prop_assert!(fail_fast.is_ok()),
            Validation::Failure(errors) => {
                let first = errors.iter().next().cloned();
                prop_assert_eq!(fail_fast.err(), first);
            }
        }
    }

    #[test]
    fn machine_follows_pure_model(
        extra in prop::collection::vec(arbitrary_triple(), 0..8),
        events in prop::collection::vec(arbitrary_event(), 0..30),
    ) {
        let table = valid_table(&extra);
        let machine = Machine::detached(TestState::A, table.clone(), []).unwrap();

        let mut expected = TestState::A;
        let mut applied = 0u64;
        for event in &events {
            machine.handle(*event);
            if let Some(next) = model_step(&table, expected, *event) {
                expected = next;
                applied += 1;
            }
        }
        machine.wait_idle().unwrap();

        prop_assert_eq!(machine.current_state(), expected);
        prop_assert_eq!(machine.history().total(), applied);
    }
}
