//! Named state nodes.

use crate::machine::transition::Transition;
use std::sync::Arc;

/// Index of a state within its machine's declared state set.
pub(crate) type StateId = usize;

/// A named node owning its outgoing transitions in declaration order.
///
/// States have no behavior of their own; the machine asks the active
/// state for its transitions each tick and evaluates them first to last.
pub struct StateNode {
    name: Arc<str>,
    transitions: Vec<Transition>,
}

impl StateNode {
    pub(crate) fn new(name: Arc<str>) -> Self {
        Self {
            name,
            transitions: Vec::new(),
        }
    }

    /// The state's name, unique within its machine.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Outgoing transitions in declaration order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub(crate) fn transitions_mut(&mut self) -> &mut [Transition] {
        &mut self.transitions
    }

    pub(crate) fn push_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }
}
