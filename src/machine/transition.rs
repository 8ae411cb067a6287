//! Guarded, actioned edges between states.

use crate::action::{Action, AsyncAction, Step};
use crate::condition::Condition;
use crate::machine::state::StateId;

/// A resolved edge: conditions, actions, target, optional error route.
///
/// Built through [`TransitionBuilder`] and resolved against the machine's
/// declared state set at build time, so a `Transition` never holds an
/// unchecked state name.
pub struct Transition {
    pub(crate) conditions: Vec<Box<dyn Condition>>,
    pub(crate) steps: Vec<Step>,
    pub(crate) target: StateId,
    pub(crate) error_target: Option<StateId>,
    pub(crate) error_actions: Vec<Box<dyn Action>>,
}

impl Transition {
    /// One-line forms of the guarding conditions, in evaluation order.
    pub fn describe_conditions(&self) -> Vec<String> {
        self.conditions.iter().map(|c| c.describe()).collect()
    }

    /// One-line forms of the actions, in execution order.
    pub fn describe_steps(&self) -> Vec<String> {
        self.steps.iter().map(|s| s.describe()).collect()
    }

    /// Whether an error state is configured for action failures.
    pub fn has_error_route(&self) -> bool {
        self.error_target.is_some()
    }
}

/// Fluent builder for a transition, later attached to a source state via
/// [`MachineBuilder::transition`](crate::machine::MachineBuilder::transition).
///
/// # Example
///
/// ```rust
/// use tickwork::action::Run;
/// use tickwork::condition::Predicate;
/// use tickwork::machine::TransitionBuilder;
///
/// let edge = TransitionBuilder::new()
///     .when(Predicate::new("IsStarted", |_| true))
///     .then(Run::new("StartNetwork", |_| Ok(())))
///     .to("Online")
///     .on_error("Offline");
/// ```
#[derive(Default)]
pub struct TransitionBuilder {
    pub(crate) conditions: Vec<Box<dyn Condition>>,
    pub(crate) steps: Vec<Step>,
    pub(crate) target: Option<String>,
    pub(crate) error_target: Option<String>,
    pub(crate) error_actions: Vec<Box<dyn Action>>,
}

impl TransitionBuilder {
    /// Start an empty transition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a guarding condition. Conditions are evaluated in the order
    /// added, with short-circuit AND semantics.
    pub fn when(mut self, condition: impl Condition + 'static) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }

    /// Append a synchronous action.
    pub fn then(mut self, action: impl Action + 'static) -> Self {
        self.steps.push(Step::sync(action));
        self
    }

    /// Append an asynchronous action, awaited before the next step.
    pub fn then_async(mut self, action: impl AsyncAction + 'static) -> Self {
        self.steps.push(Step::asynchronous(action));
        self
    }

    /// Append a pre-boxed step.
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.target = Some(state.into());
        self
    }

    /// Route action failures to this state instead of propagating them.
    pub fn on_error(mut self, state: impl Into<String>) -> Self {
        self.error_target = Some(state.into());
        self
    }

    /// Append a synchronous action run after moving to the error state.
    /// A failure here is fatal and propagates to the host.
    pub fn error_action(mut self, action: impl Action + 'static) -> Self {
        self.error_actions.push(Box::new(action));
        self
    }
}
