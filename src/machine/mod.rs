//! The workflow engine: states, transitions and the tick loop.
//!
//! A [`Machine`] is a named set of states with guarded, actioned
//! transitions between them. The host builds it once through
//! [`MachineBuilder`], starts it, then pumps it with `tick().await` at
//! whatever cadence suits the application. Each tick evaluates the active
//! state's transitions in declaration order and fires the first one whose
//! conditions all hold.
//!
//! # Example
//!
//! ```rust
//! use tickwork::condition::Predicate;
//! use tickwork::machine::{MachineBuilder, TransitionBuilder};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut machine = MachineBuilder::new("session")
//!     .states(["Init", "Offline"])
//!     .initial("Init")
//!     .transition(
//!         "Init",
//!         TransitionBuilder::new()
//!             .when(Predicate::new("always", |_| true))
//!             .to("Offline"),
//!     )
//!     .build()
//!     .unwrap();
//!
//! machine.start().unwrap();
//! machine.tick().await.unwrap();
//! assert_eq!(machine.active_state(), "Offline");
//! # }
//! ```

mod builder;
mod context;
mod engine;
mod error;
mod history;
mod state;
mod transition;

pub use builder::MachineBuilder;
pub use context::MachineContext;
pub use engine::{Machine, RunState, StateChange};
pub use error::MachineError;
pub use history::{History, TransitionRecord};
pub use state::StateNode;
pub use transition::{Transition, TransitionBuilder};
