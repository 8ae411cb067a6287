//! Closure actions, synchronous and asynchronous.

use crate::action::{Action, ActionError, AsyncAction};
use crate::machine::MachineContext;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by an asynchronous closure action.
pub type ActionFuture<'a> = Pin<Box<dyn Future<Output = Result<(), ActionError>> + Send + 'a>>;

/// Synchronous action wrapping a labeled closure.
///
/// # Example
///
/// ```rust
/// use tickwork::action::{Action, Run};
/// use tickwork::machine::MachineContext;
///
/// let mut ctx = MachineContext::detached("doc");
/// let attempts = ctx.locals_mut().define("attempts", 0i64).unwrap();
///
/// let handle = attempts.clone();
/// let mut bump = Run::new("BumpAttempts", move |ctx| {
///     let n = ctx.read(&handle);
///     ctx.write(&handle, n + 1);
///     Ok(())
/// });
///
/// bump.execute(&mut ctx).unwrap();
/// assert_eq!(ctx.read(&attempts), 1);
/// ```
pub struct Run {
    label: String,
    action: Box<dyn FnMut(&mut MachineContext) -> Result<(), ActionError> + Send>,
}

impl Run {
    /// Create a labeled closure action.
    pub fn new<F>(label: impl Into<String>, action: F) -> Self
    where
        F: FnMut(&mut MachineContext) -> Result<(), ActionError> + Send + 'static,
    {
        Self {
            label: label.into(),
            action: Box::new(action),
        }
    }
}

impl Action for Run {
    fn execute(&mut self, ctx: &mut MachineContext) -> Result<(), ActionError> {
        (self.action)(ctx)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Asynchronous action wrapping a labeled closure returning a boxed
/// future.
///
/// The closure borrows the machine context for the lifetime of the future,
/// so the engine cannot tick again until the work resolves.
///
/// # Example
///
/// ```rust
/// use tickwork::action::{AsyncAction, RunAsync};
/// use tickwork::machine::MachineContext;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut allocate = RunAsync::new("AllocateRelay", |ctx| {
///     Box::pin(async move {
///         let code = ctx.locals_mut().get::<i64>("join_code").unwrap();
///         ctx.write(&code, 4217);
///         Ok(())
///     })
/// });
///
/// let mut ctx = MachineContext::detached("doc");
/// allocate.execute(&mut ctx).await.unwrap();
/// # }
/// ```
pub struct RunAsync {
    label: String,
    action: Box<dyn for<'a> FnMut(&'a mut MachineContext) -> ActionFuture<'a> + Send>,
}

impl RunAsync {
    /// Create a labeled asynchronous closure action.
    pub fn new<F>(label: impl Into<String>, action: F) -> Self
    where
        F: for<'a> FnMut(&'a mut MachineContext) -> ActionFuture<'a> + Send + 'static,
    {
        Self {
            label: label.into(),
            action: Box::new(action),
        }
    }
}

#[async_trait]
impl AsyncAction for RunAsync {
    async fn execute(&mut self, ctx: &mut MachineContext) -> Result<(), ActionError> {
        (self.action)(ctx).await
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
