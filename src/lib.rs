//! # tickwork
//!
//! An embeddable, tick-driven workflow engine built on finite state
//! machines.
//!
//! A workflow is a named machine with declared states and ordered,
//! guarded transitions between them. The host application owns the
//! scheduling: it starts the machine, then calls `tick().await` at
//! whatever cadence fits, and each tick evaluates the active state's
//! transitions in declaration order and fires the first one whose
//! conditions all hold. Transitions carry synchronous and asynchronous
//! actions, an optional error state for action failures, and everything
//! reads and writes typed variables scoped to the machine or shared
//! across machines.
//!
//! ## Quick start
//!
//! ```rust
//! use tickwork::action::Run;
//! use tickwork::condition::Latch;
//! use tickwork::machine::{MachineBuilder, TransitionBuilder};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let (started, events) = Latch::new("IsStarted");
//!
//! let mut machine = MachineBuilder::new("session")
//!     .states(["Init", "Online", "Offline"])
//!     .initial("Init")
//!     .transition(
//!         "Init",
//!         TransitionBuilder::new()
//!             .when(started)
//!             .then(Run::new("StartNetwork", |_| Ok(())))
//!             .to("Online")
//!             .on_error("Offline"),
//!     )
//!     .build()
//!     .unwrap();
//!
//! machine.start().unwrap();
//! assert!(machine.tick().await.unwrap().is_empty());
//!
//! events.set();
//! let changes = machine.tick().await.unwrap();
//! assert_eq!(changes[0].to, "Online");
//! machine.stop().unwrap();
//! # }
//! ```
//!
//! ## Design
//!
//! - **Deterministic evaluation.** Conditions and transitions are ordered;
//!   the first satisfied transition wins and later ones are not even
//!   evaluated. Condition evaluation never blocks on I/O; conditions that
//!   depend on external events read latched flags instead
//!   ([`condition::Latch`]).
//! - **Host-driven time.** The engine never spawns threads or tasks. One
//!   `tick().await` resolves when the fired transition's actions have all
//!   completed; a tick while a transition is pending is rejected, never
//!   queued.
//! - **Typed variables.** Variable handles carry their type, so reads and
//!   writes need no runtime casts ([`variable::VarHandle`]).
//! - **Error states.** A transition may route action failures to an error
//!   state with its own recovery actions instead of propagating them
//!   ([`machine::TransitionBuilder::on_error`]).
//! - **Exportable structure.** The wired-up graph renders as Graphviz DOT
//!   or Mermaid for review ([`export`]).

pub mod action;
pub mod condition;
pub mod error;
pub mod export;
pub mod machine;
pub mod variable;

pub use action::{Action, ActionError, AsyncAction, Step};
pub use condition::Condition;
pub use error::ConfigError;
pub use machine::{
    Machine, MachineBuilder, MachineContext, MachineError, RunState, StateChange,
    TransitionBuilder,
};
pub use variable::{ScopeKind, SharedScope, VarHandle, VariableError, VariableScope};
