//! Typed, named variable storage with two scopes.
//!
//! Variables decouple conditions and actions from the subsystems they
//! inspect or drive: a subsystem latches a value into a cell, and a
//! condition merely reads it at evaluation time.
//!
//! Two stores exist per machine:
//! - the **local** scope, owned by one machine instance
//!   ([`VariableScope`]), and
//! - the **shared** scope, process-wide and injected by the host
//!   ([`SharedScope`]).
//!
//! Cells are typed over exactly `bool`, `i64`, `f64` and
//! [`serde_json::Value`] via the sealed [`VarValue`] trait, and accessed
//! through compile-time-typed [`VarHandle`]s, so there is no runtime cast
//! failure mode. Looking up an undefined name registers a zero-valued cell
//! instead of erroring; this permissiveness is part of the contract, not a
//! defect.

mod error;
mod handle;
mod scope;

pub use error::VariableError;
pub use handle::{NumericValue, ScopeKind, VarHandle, VarKind, VarValue};
pub use scope::{SharedScope, Slot, VariableScope};
