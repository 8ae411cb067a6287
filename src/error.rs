//! Setup-time configuration errors.

use thiserror::Error;

/// Errors in the workflow definition itself.
///
/// These indicate a programming mistake in how a machine was assembled and
/// are detected eagerly at construction/build time, never deferred to the
/// first evaluation. They are fatal and never recovered.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The same state name was declared twice on one machine.
    #[error("State '{name}' is declared more than once")]
    DuplicateState { name: String },

    /// A transition references a state name the machine never declared.
    #[error("State '{name}' is not declared on this machine")]
    UndeclaredState { name: String },

    /// No initial state was configured.
    #[error("Initial state not specified. Call .initial(name) before .build()")]
    MissingInitialState,

    /// The machine has no states at all.
    #[error("Machine has no states. Call .states([..]) before .build()")]
    NoStates,

    /// A transition was built without a target state.
    #[error("Transition target not specified. Call .to(name)")]
    MissingTarget,

    /// A compound action was constructed with no steps.
    #[error("Compound action requires at least one step")]
    EmptyActionList,

    /// An `Or` combinator was constructed with fewer than two conditions.
    #[error("Or condition requires at least two inner conditions, got {got}")]
    TooFewConditions { got: usize },
}
