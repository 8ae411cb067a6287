//! Variable store error types.

use crate::variable::VarKind;
use thiserror::Error;

/// Errors raised by variable definition and lookup.
#[derive(Debug, Error)]
pub enum VariableError {
    /// The name is already defined in this scope.
    #[error("Variable '{name}' is already defined in this scope")]
    Duplicate { name: String },

    /// The name exists but holds a value of a different kind.
    #[error("Variable '{name}' holds a {found} value, expected {expected}")]
    TypeMismatch {
        name: String,
        expected: VarKind,
        found: VarKind,
    },
}
