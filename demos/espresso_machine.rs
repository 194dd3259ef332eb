//! Espresso Machine
//!
//! A coffee machine driven through an in-process event bus.
//!
//! Key concepts:
//! - Declaring state and event universes with macros
//! - Wiring a machine to an `EventBus`
//! - An entry action that chains a follow-up event
//! - Events that do not apply in the current state are ignored
//!
//! Run with: RUST_LOG=espresso=debug cargo run --example espresso_machine

use espresso::core::Transition;
use espresso::source::{post_event, EventBus};
use espresso::{event_enum, state_enum, Machine, MachineConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Coffee {
        Off,
        Heating,
        Ready,
        Brewing,
    }
}

event_enum! {
    enum CoffeeEvent {
        PowerOn => "coffee.power_on",
        Heated => "coffee.heated",
        Brew => "coffee.brew",
        Poured => "coffee.poured",
        PowerOff => "coffee.power_off",
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("espresso=info")),
        )
        .init();

    println!("=== Espresso Machine ===\n");

    let bus = Arc::new(EventBus::new());

    // Heating finishes instantly in this demo; the entry action reports it.
    let heater = Arc::clone(&bus);
    let transitions = vec![
        Transition::new(Coffee::Off, CoffeeEvent::PowerOn, Coffee::Heating).with_action(move || {
            println!("  heater on");
            post_event(heater.as_ref(), &CoffeeEvent::Heated);
        }),
        Transition::new(Coffee::Heating, CoffeeEvent::Heated, Coffee::Ready)
            .with_action(|| println!("  ready to brew")),
        Transition::new(Coffee::Ready, CoffeeEvent::Brew, Coffee::Brewing)
            .with_action(|| println!("  brewing")),
        Transition::new(Coffee::Brewing, CoffeeEvent::Poured, Coffee::Ready)
            .with_action(|| println!("  enjoy")),
        Transition::new(Coffee::Ready, CoffeeEvent::PowerOff, Coffee::Off),
    ];

    let machine = Machine::with_config(
        Coffee::Off,
        transitions,
        [],
        Some(bus.clone()),
        MachineConfig::default().worker_name("coffee-fsm"),
    )?;
    println!("Initial state: {:?}\n", machine.current_state());

    // Brew before power-on is ignored.
    for event in [
        CoffeeEvent::Brew,
        CoffeeEvent::PowerOn,
        CoffeeEvent::Brew,
        CoffeeEvent::Poured,
        CoffeeEvent::PowerOff,
    ] {
        println!("post {:?}", event);
        post_event(bus.as_ref(), &event);
        machine.wait_idle()?;
        println!("  -> {:?}", machine.current_state());
    }

    println!("\nPath:");
    for record in machine.history().records() {
        println!("  {:?} --{:?}--> {:?}", record.from, record.event, record.to);
    }

    machine.teardown();
    println!("\n=== Example Complete ===");
    Ok(())
}
