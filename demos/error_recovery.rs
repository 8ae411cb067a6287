//! Error-state recovery: a flaky async action routed to an error state,
//! cleaned up, and retried until it succeeds.
//!
//! Run with: cargo run --example error_recovery

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tickwork::action::{ActionError, Run, RunAsync};
use tickwork::machine::{MachineBuilder, TransitionBuilder};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // The relay refuses the first two allocation attempts.
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);

    let mut machine = MachineBuilder::new("uplink")
        .states(["Connecting", "Online", "Backoff"])
        .initial("Connecting")
        .transition(
            "Connecting",
            TransitionBuilder::new()
                .then_async(RunAsync::new("AllocateRelay", move |_ctx| {
                    let counter = Arc::clone(&counter);
                    Box::pin(async move {
                        let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
                        if attempt < 3 {
                            Err(ActionError::new(format!(
                                "relay refused (attempt {attempt})"
                            )))
                        } else {
                            Ok(())
                        }
                    })
                }))
                .to("Online")
                .on_error("Backoff")
                .error_action(Run::new("LogFailure", |_| {
                    println!("  allocation failed, backing off");
                    Ok(())
                })),
        )
        .transition("Backoff", TransitionBuilder::new().to("Connecting"))
        .build()
        .expect("valid workflow definition");

    machine.on_state_changed(|change| {
        println!("tick {:>2}: {} -> {}", change.tick, change.from, change.to);
    });

    machine.start().expect("fresh machine starts");

    while machine.active_state() != "Online" {
        machine.tick().await.expect("tick");
    }

    println!(
        "online after {} attempts, path: {:?}",
        attempts.load(Ordering::SeqCst),
        machine.history().path()
    );
}
