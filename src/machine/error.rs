//! Machine runtime error types.

use crate::action::ActionError;
use crate::machine::engine::StateChange;
use thiserror::Error;

/// Errors surfaced by `start()`, `tick()` and `stop()`.
///
/// Usage errors (wrong lifecycle phase, tick during a pending transition)
/// are distinct kinds and always fatal to the call, never silently
/// ignored. Action failures appear here only when the firing transition
/// had no error state configured, or when an error action itself failed.
#[derive(Debug, Error)]
pub enum MachineError {
    /// `tick()` before `start()`.
    #[error("Machine '{machine}' has not been started")]
    NotStarted { machine: String },

    /// `start()` while already running.
    #[error("Machine '{machine}' is already running")]
    AlreadyStarted { machine: String },

    /// `start()` or `tick()` after `stop()`.
    #[error("Machine '{machine}' is stopped")]
    Stopped { machine: String },

    /// `stop()` on a machine that is not running.
    #[error("Machine '{machine}' is not running")]
    NotRunning { machine: String },

    /// `tick()` while a previous transition's actions are still pending.
    /// Ticks are rejected in this situation, never queued.
    #[error("Machine '{machine}' has a transition in flight; tick rejected")]
    TransitionInFlight { machine: String },

    /// Chained-transition cap breached within one tick. Indicates a
    /// condition/action cycle in the workflow definition. The state
    /// changes that did complete before the breach travel in `completed`;
    /// listeners and history observed them already.
    #[error(
        "Machine '{machine}' exceeded {limit} chained transitions in one tick; \
         likely a condition cycle"
    )]
    ChainLimit {
        machine: String,
        limit: usize,
        completed: Vec<StateChange>,
    },

    /// An action failed and the transition had no error state.
    #[error("Action '{action}' failed in state '{state}': {source}")]
    ActionFailed {
        state: String,
        action: String,
        #[source]
        source: ActionError,
    },

    /// An error action failed while recovering from an action failure.
    #[error("Error action '{action}' failed while entering state '{state}': {source}")]
    ErrorActionFailed {
        state: String,
        action: String,
        #[source]
        source: ActionError,
    },
}
