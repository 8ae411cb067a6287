//! Builder for assembling machines with eager validation.

use crate::error::ConfigError;
use crate::machine::engine::Machine;
use crate::machine::state::{StateId, StateNode};
use crate::machine::transition::{Transition, TransitionBuilder};
use crate::variable::SharedScope;
use std::collections::HashMap;
use std::sync::Arc;

/// Fluent builder for a [`Machine`].
///
/// All graph validation happens in [`build`](Self::build): duplicate state
/// names, a missing or undeclared initial state, and transitions whose
/// target or error state was never declared are rejected before the
/// machine exists, never deferred to the first evaluation.
///
/// # Example
///
/// ```rust
/// use tickwork::machine::{MachineBuilder, TransitionBuilder};
///
/// let machine = MachineBuilder::new("session")
///     .states(["Init", "Offline", "Online"])
///     .initial("Init")
///     .transition("Init", TransitionBuilder::new().to("Offline"))
///     .transition("Offline", TransitionBuilder::new().to("Online"))
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.active_state(), "Init");
/// ```
pub struct MachineBuilder {
    name: String,
    states: Vec<String>,
    initial: Option<String>,
    transitions: Vec<(String, TransitionBuilder)>,
    allow_chained: bool,
    shared: Option<SharedScope>,
}

impl MachineBuilder {
    /// Start building a machine with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
            initial: None,
            transitions: Vec::new(),
            allow_chained: false,
            shared: None,
        }
    }

    /// Declare states, in order. Appends to earlier declarations.
    pub fn states<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declare a single state.
    pub fn state(mut self, name: impl Into<String>) -> Self {
        self.states.push(name.into());
        self
    }

    /// Set the initial state (required; must be declared).
    pub fn initial(mut self, name: impl Into<String>) -> Self {
        self.initial = Some(name.into());
        self
    }

    /// Attach a transition to a source state. Transitions keep the order
    /// they were added in, per source state.
    pub fn transition(mut self, from: impl Into<String>, transition: TransitionBuilder) -> Self {
        self.transitions.push((from.into(), transition));
        self
    }

    /// Allow more than one transition to fire within a single `tick()`.
    ///
    /// When enabled, the newly entered state is re-evaluated in the same
    /// tick, bounded by [`Machine::MAX_CHAINED_TRANSITIONS`].
    pub fn allow_chained_transitions(mut self, allow: bool) -> Self {
        self.allow_chained = allow;
        self
    }

    /// Inject the process-wide variable scope. Defaults to a fresh,
    /// unshared scope when omitted.
    pub fn shared_scope(mut self, scope: SharedScope) -> Self {
        self.shared = Some(scope);
        self
    }

    /// Validate the graph and produce an unstarted machine.
    pub fn build(self) -> Result<Machine, ConfigError> {
        if self.states.is_empty() {
            return Err(ConfigError::NoStates);
        }

        let mut ids: HashMap<String, StateId> = HashMap::new();
        let mut nodes: Vec<StateNode> = Vec::with_capacity(self.states.len());
        for name in &self.states {
            if ids.contains_key(name) {
                return Err(ConfigError::DuplicateState { name: name.clone() });
            }
            ids.insert(name.clone(), nodes.len());
            nodes.push(StateNode::new(Arc::from(name.as_str())));
        }

        let lookup = |name: &str| -> Result<StateId, ConfigError> {
            ids.get(name)
                .copied()
                .ok_or_else(|| ConfigError::UndeclaredState {
                    name: name.to_string(),
                })
        };

        let initial_name = self.initial.ok_or(ConfigError::MissingInitialState)?;
        let initial = lookup(&initial_name)?;

        for (from, builder) in self.transitions {
            let from_id = lookup(&from)?;
            let target_name = builder.target.ok_or(ConfigError::MissingTarget)?;
            let target = lookup(&target_name)?;
            let error_target = match builder.error_target {
                Some(name) => Some(lookup(&name)?),
                None => None,
            };
            nodes[from_id].push_transition(Transition {
                conditions: builder.conditions,
                steps: builder.steps,
                target,
                error_target,
                error_actions: builder.error_actions,
            });
        }

        Ok(Machine::from_parts(
            self.name,
            nodes,
            initial,
            self.allow_chained,
            self.shared.unwrap_or_default(),
        ))
    }
}
