//! Sequential aggregation of actions.

use crate::action::{ActionError, AsyncAction, Step};
use crate::error::ConfigError;
use crate::machine::MachineContext;
use async_trait::async_trait;

/// A named, ordered list of actions executed strictly sequentially.
///
/// A failure at step *k* aborts steps *k+1..n* and propagates the error to
/// the owning transition. No partial rollback is performed; rollback, if
/// needed, is the action's own responsibility. Compounds implement
/// [`AsyncAction`], so they nest inside other compounds.
///
/// # Example
///
/// ```rust
/// use tickwork::action::{AsyncAction, Compound, Run, Step};
/// use tickwork::machine::MachineContext;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut ctx = MachineContext::detached("doc");
/// let log = ctx.locals_mut().define("steps", 0i64).unwrap();
///
/// let bump = |label: &str, handle: tickwork::variable::VarHandle<i64>| {
///     Step::sync(Run::new(label, move |ctx| {
///         let n = ctx.read(&handle);
///         ctx.write(&handle, n + 1);
///         Ok(())
///     }))
/// };
///
/// let mut setup = Compound::new(
///     "Setup",
///     vec![bump("First", log.clone()), bump("Second", log.clone())],
/// )
/// .unwrap();
///
/// setup.execute(&mut ctx).await.unwrap();
/// assert_eq!(ctx.read(&log), 2);
/// # }
/// ```
pub struct Compound {
    label: String,
    steps: Vec<Step>,
}

impl Compound {
    /// Build a compound action. An empty step list is a workflow
    /// definition mistake and is rejected at construction.
    pub fn new(label: impl Into<String>, steps: Vec<Step>) -> Result<Self, ConfigError> {
        if steps.is_empty() {
            return Err(ConfigError::EmptyActionList);
        }
        Ok(Self {
            label: label.into(),
            steps,
        })
    }

    /// Number of steps in the sequence.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always false: construction rejects empty lists.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[async_trait]
impl AsyncAction for Compound {
    async fn execute(&mut self, ctx: &mut MachineContext) -> Result<(), ActionError> {
        for step in self.steps.iter_mut() {
            step.run(ctx).await?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        let parts: Vec<String> = self.steps.iter().map(|s| s.describe()).collect();
        format!("{}[{}]", self.label, parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Run, RunAsync};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn recording_step(log: &Arc<AtomicUsize>, index: usize, fail: bool) -> Step {
        let log = Arc::clone(log);
        Step::sync(Run::new(format!("step{index}"), move |_| {
            if fail {
                return Err(ActionError::new(format!("step {index} failed")));
            }
            // Record the highest step reached.
            log.store(index, Ordering::SeqCst);
            Ok(())
        }))
    }

    #[test]
    fn empty_compound_is_rejected() {
        let result = Compound::new("Empty", Vec::new());
        assert!(matches!(result, Err(ConfigError::EmptyActionList)));
    }

    #[tokio::test]
    async fn steps_run_in_declared_order() {
        let mut ctx = MachineContext::detached("test");
        let order = ctx.locals_mut().define("order", serde_json::json!([])).unwrap();

        let record = |name: &'static str, handle: crate::variable::VarHandle<serde_json::Value>| {
            Step::sync(Run::new(name, move |ctx| {
                let mut seen = ctx.read(&handle);
                seen.as_array_mut()
                    .ok_or_else(|| ActionError::new("not an array"))?
                    .push(serde_json::json!(name));
                ctx.write(&handle, seen);
                Ok(())
            }))
        };

        let mut compound = Compound::new(
            "Ordered",
            vec![
                record("a", order.clone()),
                record("b", order.clone()),
                record("c", order.clone()),
            ],
        )
        .unwrap();

        compound.execute(&mut ctx).await.unwrap();
        assert_eq!(ctx.read(&order), serde_json::json!(["a", "b", "c"]));
    }

    #[tokio::test]
    async fn failure_aborts_remaining_steps() {
        let mut ctx = MachineContext::detached("test");
        let reached = Arc::new(AtomicUsize::new(0));

        let mut compound = Compound::new(
            "Aborts",
            vec![
                recording_step(&reached, 1, false),
                recording_step(&reached, 2, true),
                recording_step(&reached, 3, false),
            ],
        )
        .unwrap();

        let err = compound.execute(&mut ctx).await.unwrap_err();
        assert_eq!(err.message(), "step 2 failed");
        // Step 1 fully executed, step 3 never ran.
        assert_eq!(reached.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn compounds_mix_sync_and_async_steps() {
        let mut ctx = MachineContext::detached("test");
        let total = ctx.locals_mut().define("total", 0i64).unwrap();

        let sync_handle = total.clone();
        let async_handle = total.clone();
        let mut compound = Compound::new(
            "Mixed",
            vec![
                Step::sync(Run::new("AddOne", move |ctx| {
                    let n = ctx.read(&sync_handle);
                    ctx.write(&sync_handle, n + 1);
                    Ok(())
                })),
                Step::asynchronous(RunAsync::new("AddTen", move |ctx| {
                    let handle = async_handle.clone();
                    Box::pin(async move {
                        tokio::task::yield_now().await;
                        let n = ctx.read(&handle);
                        ctx.write(&handle, n + 10);
                        Ok(())
                    })
                })),
            ],
        )
        .unwrap();

        compound.execute(&mut ctx).await.unwrap();
        assert_eq!(ctx.read(&total), 11);
    }

    #[tokio::test]
    async fn compounds_nest() {
        let mut ctx = MachineContext::detached("test");
        let count = ctx.locals_mut().define("count", 0i64).unwrap();

        let bump = |handle: crate::variable::VarHandle<i64>| {
            Step::sync(Run::new("Bump", move |ctx| {
                let n = ctx.read(&handle);
                ctx.write(&handle, n + 1);
                Ok(())
            }))
        };

        let inner = Compound::new("Inner", vec![bump(count.clone()), bump(count.clone())]).unwrap();
        let mut outer = Compound::new(
            "Outer",
            vec![bump(count.clone()), Step::asynchronous(inner)],
        )
        .unwrap();

        outer.execute(&mut ctx).await.unwrap();
        assert_eq!(ctx.read(&count), 3);
    }

    #[test]
    fn describe_lists_the_steps() {
        let compound = Compound::new(
            "Startup",
            vec![
                Step::sync(Run::new("SignIn", |_| Ok(()))),
                Step::sync(Run::new("Allocate", |_| Ok(()))),
            ],
        )
        .unwrap();

        assert_eq!(compound.describe(), "Startup[SignIn; Allocate]");
        assert_eq!(compound.len(), 2);
    }
}
