//! Units of work executed when a transition fires.
//!
//! Actions come in two shapes: synchronous ([`Action`]) runs to completion
//! before the engine proceeds, and asynchronous ([`AsyncAction`]) returns a
//! future the engine awaits before the next action in the list begins.
//! Actions within one transition never run concurrently with each other.
//!
//! A [`Step`] is the unit a transition stores: either shape, boxed. The
//! [`Compound`] action sequences a list of steps and is itself an
//! [`AsyncAction`], so compounds nest.
//!
//! The engine never retries an action and never swallows an action error:
//! failures route through the owning transition's error state or propagate
//! to the host.

mod compound;
mod lambda;
mod var;

pub use compound::Compound;
pub use lambda::{ActionFuture, Run, RunAsync};
pub use var::{Arith, ArithOp, SetVar};

use crate::machine::MachineContext;
use async_trait::async_trait;
use thiserror::Error;

/// Failure raised by an action implementation.
///
/// Carries a human-readable message; the engine treats every action error
/// identically (route to the error state or propagate), so no further
/// structure is imposed on implementors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ActionError {
    message: String,
}

impl ActionError {
    /// Create an error with a message describing the failure.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ActionError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ActionError {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// A synchronous unit of work.
pub trait Action: Send {
    /// Run to completion. A returned error aborts the remaining actions of
    /// the owning transition.
    fn execute(&mut self, ctx: &mut MachineContext) -> Result<(), ActionError>;

    /// One-line human-readable form for export/logging.
    fn describe(&self) -> String {
        "action".to_string()
    }
}

/// An asynchronous unit of work.
///
/// The returned future is awaited before the next action in the owning
/// transition begins. Fire-and-forget execution is deliberately not
/// offered: it silently drops errors.
#[async_trait]
pub trait AsyncAction: Send {
    /// Run to completion, suspending as needed.
    async fn execute(&mut self, ctx: &mut MachineContext) -> Result<(), ActionError>;

    /// One-line human-readable form for export/logging.
    fn describe(&self) -> String {
        "async action".to_string()
    }
}

/// One entry in a transition's ordered action list.
pub enum Step {
    /// Runs inline on the tick.
    Sync(Box<dyn Action>),
    /// Awaited on the tick before the next step starts.
    Async(Box<dyn AsyncAction>),
}

impl Step {
    /// Wrap a synchronous action.
    pub fn sync(action: impl Action + 'static) -> Self {
        Step::Sync(Box::new(action))
    }

    /// Wrap an asynchronous action.
    pub fn asynchronous(action: impl AsyncAction + 'static) -> Self {
        Step::Async(Box::new(action))
    }

    /// Execute the step, awaiting asynchronous work.
    pub(crate) async fn run(&mut self, ctx: &mut MachineContext) -> Result<(), ActionError> {
        match self {
            Step::Sync(action) => action.execute(ctx),
            Step::Async(action) => action.execute(ctx).await,
        }
    }

    /// One-line human-readable form of the wrapped action.
    pub fn describe(&self) -> String {
        match self {
            Step::Sync(action) => action.describe(),
            Step::Async(action) => action.describe(),
        }
    }
}

impl From<Box<dyn Action>> for Step {
    fn from(action: Box<dyn Action>) -> Self {
        Step::Sync(action)
    }
}

impl From<Box<dyn AsyncAction>> for Step {
    fn from(action: Box<dyn AsyncAction>) -> Self {
        Step::Async(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Action for Noop {
        fn execute(&mut self, _ctx: &mut MachineContext) -> Result<(), ActionError> {
            Ok(())
        }

        fn describe(&self) -> String {
            "noop".to_string()
        }
    }

    struct Fails;

    impl Action for Fails {
        fn execute(&mut self, _ctx: &mut MachineContext) -> Result<(), ActionError> {
            Err(ActionError::new("boom"))
        }
    }

    #[tokio::test]
    async fn sync_step_runs_inline() {
        let mut ctx = MachineContext::detached("test");
        let mut step = Step::sync(Noop);
        assert!(step.run(&mut ctx).await.is_ok());
        assert_eq!(step.describe(), "noop");
    }

    #[tokio::test]
    async fn failing_step_surfaces_the_message() {
        let mut ctx = MachineContext::detached("test");
        let mut step = Step::sync(Fails);
        let err = step.run(&mut ctx).await.unwrap_err();
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn action_error_conversions() {
        let err: ActionError = "relay allocation refused".into();
        assert_eq!(err.message(), "relay allocation refused");

        let err: ActionError = String::from("timeout").into();
        assert_eq!(err.to_string(), "timeout");
    }
}
