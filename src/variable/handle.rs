//! Typed variable handles.
//!
//! A [`VarHandle`] is a cheap, cloneable, compile-time-typed key into a
//! variable scope. Handles are only ever produced by
//! [`VariableScope::define`](crate::variable::VariableScope::define) and
//! [`VariableScope::get`](crate::variable::VariableScope::get) (or their
//! [`SharedScope`](crate::variable::SharedScope) counterparts), so there is
//! no runtime cast failure mode when reading through one.

use crate::variable::scope::Slot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Sub};
use std::sync::Arc;

/// The kind tag of a variable cell, used for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    Bool,
    Int,
    Float,
    Struct,
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VarKind::Bool => "bool",
            VarKind::Int => "int",
            VarKind::Float => "float",
            VarKind::Struct => "struct",
        };
        f.write_str(name)
    }
}

/// Which store a handle belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    /// Owned by one machine instance, cleared when it is discarded.
    Local,
    /// Process-wide, shared across machine instances, cleared by the host.
    Shared,
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for bool {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
    impl Sealed for serde_json::Value {}
}

/// A value that can live in a variable cell.
///
/// Sealed over exactly `bool`, `i64`, `f64` and [`serde_json::Value`]
/// (the generic struct payload). Value semantics only: no reference or
/// object identity is stored.
pub trait VarValue: sealed::Sealed + Clone + Default + Send + 'static {
    /// Kind tag for this value type.
    const KIND: VarKind;

    /// Wrap the value in a storage slot.
    fn into_slot(self) -> Slot;

    /// Extract the value from a slot of the matching kind.
    fn from_slot(slot: &Slot) -> Option<Self>;
}

impl VarValue for bool {
    const KIND: VarKind = VarKind::Bool;

    fn into_slot(self) -> Slot {
        Slot::Bool(self)
    }

    fn from_slot(slot: &Slot) -> Option<Self> {
        match slot {
            Slot::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl VarValue for i64 {
    const KIND: VarKind = VarKind::Int;

    fn into_slot(self) -> Slot {
        Slot::Int(self)
    }

    fn from_slot(slot: &Slot) -> Option<Self> {
        match slot {
            Slot::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl VarValue for f64 {
    const KIND: VarKind = VarKind::Float;

    fn into_slot(self) -> Slot {
        Slot::Float(self)
    }

    fn from_slot(slot: &Slot) -> Option<Self> {
        match slot {
            Slot::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl VarValue for serde_json::Value {
    const KIND: VarKind = VarKind::Struct;

    fn into_slot(self) -> Slot {
        Slot::Struct(self)
    }

    fn from_slot(slot: &Slot) -> Option<Self> {
        match slot {
            Slot::Struct(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// A numeric variable value: supports ordered comparison and arithmetic.
///
/// Bool and struct cells deliberately do not implement this; comparing a
/// bool cell against an int cell is unrepresentable rather than a runtime
/// error.
pub trait NumericValue:
    VarValue
    + PartialOrd
    + Copy
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    /// Division that reports an unrepresentable quotient instead of
    /// panicking (integer division by zero).
    fn checked_div(self, rhs: Self) -> Option<Self>;
}

impl NumericValue for i64 {
    fn checked_div(self, rhs: Self) -> Option<Self> {
        i64::checked_div(self, rhs)
    }
}

impl NumericValue for f64 {
    fn checked_div(self, rhs: Self) -> Option<Self> {
        Some(self / rhs)
    }
}

/// Stable typed reference to a variable cell.
///
/// # Example
///
/// ```rust
/// use tickwork::variable::VariableScope;
///
/// let mut scope = VariableScope::new();
/// let retries = scope.define("retries", 0i64).unwrap();
///
/// scope.write(&retries, 3);
/// assert_eq!(scope.read(&retries), 3);
/// ```
pub struct VarHandle<T: VarValue> {
    name: Arc<str>,
    scope: ScopeKind,
    _marker: PhantomData<fn() -> T>,
}

impl<T: VarValue> VarHandle<T> {
    pub(crate) fn new(name: Arc<str>, scope: ScopeKind) -> Self {
        Self {
            name,
            scope,
            _marker: PhantomData,
        }
    }

    /// The variable's name within its scope.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn key(&self) -> &Arc<str> {
        &self.name
    }

    /// Which store this handle resolves against.
    pub fn scope(&self) -> ScopeKind {
        self.scope
    }
}

impl<T: VarValue> Clone for VarHandle<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            scope: self.scope,
            _marker: PhantomData,
        }
    }
}

impl<T: VarValue> fmt::Debug for VarHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VarHandle")
            .field("name", &self.name)
            .field("kind", &T::KIND)
            .field("scope", &self.scope)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_display_lowercase_names() {
        assert_eq!(VarKind::Bool.to_string(), "bool");
        assert_eq!(VarKind::Int.to_string(), "int");
        assert_eq!(VarKind::Float.to_string(), "float");
        assert_eq!(VarKind::Struct.to_string(), "struct");
    }

    #[test]
    fn slot_round_trips_each_kind() {
        assert_eq!(bool::from_slot(&true.into_slot()), Some(true));
        assert_eq!(i64::from_slot(&7i64.into_slot()), Some(7));
        assert_eq!(f64::from_slot(&1.5f64.into_slot()), Some(1.5));

        let value = serde_json::json!({ "role": "host" });
        assert_eq!(
            serde_json::Value::from_slot(&value.clone().into_slot()),
            Some(value)
        );
    }

    #[test]
    fn mismatched_slot_yields_none() {
        assert_eq!(bool::from_slot(&3i64.into_slot()), None);
        assert_eq!(i64::from_slot(&true.into_slot()), None);
    }

    #[test]
    fn integer_division_by_zero_is_caught() {
        assert_eq!(NumericValue::checked_div(10i64, 0), None);
        assert_eq!(NumericValue::checked_div(10i64, 2), Some(5));
    }

    #[test]
    fn float_division_by_zero_is_infinite() {
        let q = NumericValue::checked_div(1.0f64, 0.0).unwrap();
        assert!(q.is_infinite());
    }

    #[test]
    fn handles_are_cheap_to_clone() {
        let handle: VarHandle<bool> = VarHandle::new(Arc::from("connected"), ScopeKind::Local);
        let clone = handle.clone();
        assert_eq!(clone.name(), "connected");
        assert_eq!(clone.scope(), ScopeKind::Local);
    }
}
