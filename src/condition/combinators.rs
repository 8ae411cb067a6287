//! Logical combinators over conditions.
//!
//! Truth evaluation short-circuits, but lifecycle calls are always
//! forwarded to every inner condition: event bindings must not depend on
//! runtime truth at the moment a hook fires.

use crate::condition::Condition;
use crate::error::ConfigError;
use crate::machine::MachineContext;

fn join_describe(inner: &[Box<dyn Condition>], sep: &str) -> String {
    let parts: Vec<String> = inner.iter().map(|c| c.describe()).collect();
    parts.join(sep)
}

/// Satisfied iff all inner conditions are satisfied.
///
/// Evaluates left-to-right with short-circuit; an empty `And` is satisfied,
/// mirroring a transition with no conditions.
pub struct And {
    inner: Vec<Box<dyn Condition>>,
}

impl And {
    /// Combine conditions with AND semantics.
    pub fn new(inner: Vec<Box<dyn Condition>>) -> Self {
        Self { inner }
    }

    fn all_satisfied(&mut self, ctx: &mut MachineContext) -> bool {
        for condition in self.inner.iter_mut() {
            if !condition.is_satisfied(ctx) {
                return false;
            }
        }
        true
    }

    fn for_each(&mut self, ctx: &mut MachineContext, f: fn(&mut dyn Condition, &mut MachineContext)) {
        for condition in self.inner.iter_mut() {
            f(condition.as_mut(), ctx);
        }
    }
}

impl Condition for And {
    fn is_satisfied(&mut self, ctx: &mut MachineContext) -> bool {
        self.all_satisfied(ctx)
    }

    fn on_start(&mut self, ctx: &mut MachineContext) {
        self.for_each(ctx, |c, ctx| c.on_start(ctx));
    }

    fn on_stop(&mut self, ctx: &mut MachineContext) {
        self.for_each(ctx, |c, ctx| c.on_stop(ctx));
    }

    fn on_enter_state(&mut self, ctx: &mut MachineContext) {
        self.for_each(ctx, |c, ctx| c.on_enter_state(ctx));
    }

    fn on_exit_state(&mut self, ctx: &mut MachineContext) {
        self.for_each(ctx, |c, ctx| c.on_exit_state(ctx));
    }

    fn describe(&self) -> String {
        format!("({})", join_describe(&self.inner, " && "))
    }
}

/// Satisfied iff at least one inner condition is satisfied.
///
/// Requires at least two inner conditions; a one-armed OR is a workflow
/// definition mistake and is rejected at construction.
pub struct Or {
    inner: Vec<Box<dyn Condition>>,
}

impl Or {
    /// Combine conditions with OR semantics.
    pub fn new(inner: Vec<Box<dyn Condition>>) -> Result<Self, ConfigError> {
        if inner.len() < 2 {
            return Err(ConfigError::TooFewConditions { got: inner.len() });
        }
        Ok(Self { inner })
    }

    fn for_each(&mut self, ctx: &mut MachineContext, f: fn(&mut dyn Condition, &mut MachineContext)) {
        for condition in self.inner.iter_mut() {
            f(condition.as_mut(), ctx);
        }
    }
}

impl Condition for Or {
    fn is_satisfied(&mut self, ctx: &mut MachineContext) -> bool {
        for condition in self.inner.iter_mut() {
            if condition.is_satisfied(ctx) {
                return true;
            }
        }
        false
    }

    fn on_start(&mut self, ctx: &mut MachineContext) {
        self.for_each(ctx, |c, ctx| c.on_start(ctx));
    }

    fn on_stop(&mut self, ctx: &mut MachineContext) {
        self.for_each(ctx, |c, ctx| c.on_stop(ctx));
    }

    fn on_enter_state(&mut self, ctx: &mut MachineContext) {
        self.for_each(ctx, |c, ctx| c.on_enter_state(ctx));
    }

    fn on_exit_state(&mut self, ctx: &mut MachineContext) {
        self.for_each(ctx, |c, ctx| c.on_exit_state(ctx));
    }

    fn describe(&self) -> String {
        format!("({})", join_describe(&self.inner, " || "))
    }
}

/// Satisfied iff the inner AND is *not* satisfied.
///
/// Wraps an [`And`] rather than duplicating its logic; lifecycle calls pass
/// straight through to the wrapped combinator.
pub struct Nand {
    inner: And,
}

impl Nand {
    /// Combine conditions with NAND semantics.
    pub fn new(inner: Vec<Box<dyn Condition>>) -> Self {
        Self {
            inner: And::new(inner),
        }
    }
}

impl Condition for Nand {
    fn is_satisfied(&mut self, ctx: &mut MachineContext) -> bool {
        !self.inner.is_satisfied(ctx)
    }

    fn on_start(&mut self, ctx: &mut MachineContext) {
        self.inner.on_start(ctx);
    }

    fn on_stop(&mut self, ctx: &mut MachineContext) {
        self.inner.on_stop(ctx);
    }

    fn on_enter_state(&mut self, ctx: &mut MachineContext) {
        self.inner.on_enter_state(ctx);
    }

    fn on_exit_state(&mut self, ctx: &mut MachineContext) {
        self.inner.on_exit_state(ctx);
    }

    fn describe(&self) -> String {
        format!("!{}", self.inner.describe())
    }
}
