//! Closure and latch conditions.

use crate::condition::Condition;
use crate::machine::MachineContext;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Condition wrapping a labeled closure.
///
/// The label feeds [`Condition::describe`]; the closure is the predicate.
///
/// # Example
///
/// ```rust
/// use tickwork::condition::{Condition, Predicate};
/// use tickwork::machine::MachineContext;
///
/// let mut ctx = MachineContext::detached("doc");
/// let ready = ctx.locals_mut().define("ready", false).unwrap();
///
/// let handle = ready.clone();
/// let mut cond = Predicate::new("IsReady", move |ctx| ctx.read(&handle));
/// assert!(!cond.is_satisfied(&mut ctx));
///
/// ctx.write(&ready, true);
/// assert!(cond.is_satisfied(&mut ctx));
/// ```
pub struct Predicate {
    label: String,
    predicate: Box<dyn FnMut(&mut MachineContext) -> bool + Send>,
}

impl Predicate {
    /// Create a labeled closure condition.
    pub fn new<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: FnMut(&mut MachineContext) -> bool + Send + 'static,
    {
        Self {
            label: label.into(),
            predicate: Box::new(predicate),
        }
    }
}

impl Condition for Predicate {
    fn is_satisfied(&mut self, ctx: &mut MachineContext) -> bool {
        (self.predicate)(ctx)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// A latched boolean set from outside the machine.
///
/// The standard shape for conditions that depend on asynchronous external
/// events: the subsystem callback flips the [`LatchHandle`] when the event
/// arrives, and evaluation merely reads the flag, never blocking on I/O.
pub struct Latch {
    label: String,
    flag: Arc<AtomicBool>,
}

/// Cloneable setter for a [`Latch`], handed to the event source.
#[derive(Clone)]
pub struct LatchHandle {
    flag: Arc<AtomicBool>,
}

impl LatchHandle {
    /// Latch the condition true.
    pub fn set(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Reset the condition to false.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// Current latched value.
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

impl Latch {
    /// Create an unlatched condition and its setter handle.
    pub fn new(label: impl Into<String>) -> (Self, LatchHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            Self {
                label: label.into(),
                flag: Arc::clone(&flag),
            },
            LatchHandle { flag },
        )
    }
}

impl Condition for Latch {
    fn is_satisfied(&mut self, _ctx: &mut MachineContext) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
