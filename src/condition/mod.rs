//! Boolean predicates that guard transitions.
//!
//! A [`Condition`] is evaluated against the owning machine's context each
//! tick. Conditions may hold internal mutable state (for example a flag
//! latched by an external event), and the lifecycle hooks let them bind and
//! unbind event subscriptions once per machine run rather than blocking
//! evaluation on external I/O: subscribe in [`Condition::on_start`], latch a
//! boolean when the event arrives, and have
//! [`Condition::is_satisfied`] merely read it.
//!
//! Conditions compose through [`And`], [`Or`] and [`Nand`]; typed variable
//! comparisons are available through [`Compare`] and [`Equals`].
//!
//! # Example
//!
//! ```rust
//! use tickwork::condition::{Condition, Latch, Predicate};
//! use tickwork::machine::MachineContext;
//!
//! let (mut connected, events) = Latch::new("connected");
//! let mut ctx = MachineContext::detached("doc");
//!
//! assert!(!connected.is_satisfied(&mut ctx));
//! events.set(); // e.g. from a transport callback
//! assert!(connected.is_satisfied(&mut ctx));
//!
//! let mut always = Predicate::new("always", |_| true);
//! assert!(always.is_satisfied(&mut ctx));
//! ```

mod combinators;
mod compare;
mod predicate;

pub use combinators::{And, Nand, Or};
pub use compare::{Cmp, Compare, Equals, Operand};
pub use predicate::{Latch, LatchHandle, Predicate};

use crate::machine::MachineContext;

/// A boolean predicate with optional lifecycle hooks.
///
/// All lifecycle methods default to no-ops. `is_satisfied` takes `&mut
/// self` so implementations can keep internal state, and the machine
/// context is passed at call time rather than stored, so conditions never
/// hold a back-reference to their machine.
pub trait Condition: Send {
    /// Whether the condition currently holds.
    fn is_satisfied(&mut self, ctx: &mut MachineContext) -> bool;

    /// Called once when the owning machine starts. Bind event
    /// subscriptions here.
    fn on_start(&mut self, _ctx: &mut MachineContext) {}

    /// Called once when the owning machine stops. Unbind event
    /// subscriptions here.
    fn on_stop(&mut self, _ctx: &mut MachineContext) {}

    /// Called when the machine enters the state owning this condition.
    fn on_enter_state(&mut self, _ctx: &mut MachineContext) {}

    /// Called when the machine exits the state owning this condition.
    fn on_exit_state(&mut self, _ctx: &mut MachineContext) {}

    /// One-line human-readable form, used by the graph export and logging
    /// only, never for control flow.
    fn describe(&self) -> String {
        "condition".to_string()
    }
}

impl Condition for Box<dyn Condition> {
    fn is_satisfied(&mut self, ctx: &mut MachineContext) -> bool {
        (**self).is_satisfied(ctx)
    }

    fn on_start(&mut self, ctx: &mut MachineContext) {
        (**self).on_start(ctx)
    }

    fn on_stop(&mut self, ctx: &mut MachineContext) {
        (**self).on_stop(ctx)
    }

    fn on_enter_state(&mut self, ctx: &mut MachineContext) {
        (**self).on_enter_state(ctx)
    }

    fn on_exit_state(&mut self, ctx: &mut MachineContext) {
        (**self).on_exit_state(ctx)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
