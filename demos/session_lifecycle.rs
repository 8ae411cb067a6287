//! A session lifecycle machine driven by external events.
//!
//! Run with: cargo run --example session_lifecycle

use tickwork::action::Run;
use tickwork::condition::Latch;
use tickwork::export::to_dot;
use tickwork::machine::{MachineBuilder, TransitionBuilder};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let (initialized, init_events) = Latch::new("IsInitialized");
    let (start_requested, start_events) = Latch::new("StartRequested");

    let mut machine = MachineBuilder::new("session")
        .states(["Init", "Offline", "Starting", "Online"])
        .initial("Init")
        .transition(
            "Init",
            TransitionBuilder::new().when(initialized).to("Offline"),
        )
        .transition(
            "Offline",
            TransitionBuilder::new()
                .when(start_requested)
                .to("Starting"),
        )
        .transition(
            "Starting",
            TransitionBuilder::new()
                .then(Run::new("StartNetwork", |_| Ok(())))
                .to("Online"),
        )
        .build()
        .expect("valid workflow definition");

    machine.on_state_changed(|change| {
        println!("tick {:>2}: {} -> {}", change.tick, change.from, change.to);
    });

    machine.start().expect("fresh machine starts");
    println!("started in state {}", machine.active_state());

    // Tick 1: no event has arrived yet, nothing fires.
    machine.tick().await.expect("tick");

    // Subsystems report in between ticks.
    init_events.set();
    machine.tick().await.expect("tick");

    // The user asks to go online.
    start_events.set();
    machine.tick().await.expect("tick");
    machine.tick().await.expect("tick");

    println!("final state: {}", machine.active_state());
    println!("path taken: {:?}", machine.history().path());
    machine.stop().expect("running machine stops");

    println!("\nworkflow structure as DOT:\n{}", to_dot(&machine));
}
