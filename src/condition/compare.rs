//! Typed variable comparison conditions.
//!
//! Comparisons are resolved at construction time through the typed handle
//! system: both operands of a [`Compare`] share one numeric type, so a
//! bool-vs-int comparison is a compile error rather than a runtime one.

use crate::condition::Condition;
use crate::machine::MachineContext;
use crate::variable::{NumericValue, VarHandle, VarValue};
use std::fmt;

/// Ordered comparison operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cmp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl fmt::Display for Cmp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Cmp::Gt => ">",
            Cmp::Ge => ">=",
            Cmp::Lt => "<",
            Cmp::Le => "<=",
            Cmp::Eq => "==",
            Cmp::Ne => "!=",
        };
        f.write_str(symbol)
    }
}

/// Right-hand side of a comparison: another variable or a constant.
#[derive(Clone, Debug)]
pub enum Operand<T: VarValue> {
    Var(VarHandle<T>),
    Const(T),
}

impl<T: VarValue> From<VarHandle<T>> for Operand<T> {
    fn from(handle: VarHandle<T>) -> Self {
        Operand::Var(handle)
    }
}

impl From<i64> for Operand<i64> {
    fn from(value: i64) -> Self {
        Operand::Const(value)
    }
}

impl From<f64> for Operand<f64> {
    fn from(value: f64) -> Self {
        Operand::Const(value)
    }
}

impl From<bool> for Operand<bool> {
    fn from(value: bool) -> Self {
        Operand::Const(value)
    }
}

impl From<serde_json::Value> for Operand<serde_json::Value> {
    fn from(value: serde_json::Value) -> Self {
        Operand::Const(value)
    }
}

fn operand_label<T: VarValue + fmt::Debug>(operand: &Operand<T>) -> String {
    match operand {
        Operand::Var(handle) => handle.name().to_string(),
        Operand::Const(value) => format!("{value:?}"),
    }
}

/// Ordered comparison between a numeric variable and an operand.
///
/// # Example
///
/// ```rust
/// use tickwork::condition::{Cmp, Compare, Condition};
/// use tickwork::machine::MachineContext;
///
/// let mut ctx = MachineContext::detached("doc");
/// let players = ctx.locals_mut().define("players", 0i64).unwrap();
///
/// let mut enough = Compare::new(players.clone(), Cmp::Ge, 2);
/// assert!(!enough.is_satisfied(&mut ctx));
///
/// ctx.write(&players, 3);
/// assert!(enough.is_satisfied(&mut ctx));
/// ```
pub struct Compare<T: NumericValue> {
    lhs: VarHandle<T>,
    op: Cmp,
    rhs: Operand<T>,
}

impl<T: NumericValue + fmt::Debug> Compare<T> {
    /// Build a comparison. The operand types are fixed here, at
    /// construction time.
    pub fn new(lhs: VarHandle<T>, op: Cmp, rhs: impl Into<Operand<T>>) -> Self {
        Self {
            lhs,
            op,
            rhs: rhs.into(),
        }
    }
}

impl<T: NumericValue + fmt::Debug> Condition for Compare<T> {
    fn is_satisfied(&mut self, ctx: &mut MachineContext) -> bool {
        let lhs = ctx.read(&self.lhs);
        let rhs = match &self.rhs {
            Operand::Var(handle) => ctx.read(handle),
            Operand::Const(value) => *value,
        };
        match self.op {
            Cmp::Gt => lhs > rhs,
            Cmp::Ge => lhs >= rhs,
            Cmp::Lt => lhs < rhs,
            Cmp::Le => lhs <= rhs,
            Cmp::Eq => lhs == rhs,
            Cmp::Ne => lhs != rhs,
        }
    }

    fn describe(&self) -> String {
        format!(
            "{} {} {}",
            self.lhs.name(),
            self.op,
            operand_label(&self.rhs)
        )
    }
}

/// Equality test for any variable kind (the only comparison bool and
/// struct cells support).
///
/// # Example
///
/// ```rust
/// use tickwork::condition::{Condition, Equals};
/// use tickwork::machine::MachineContext;
///
/// let mut ctx = MachineContext::detached("doc");
/// let role = ctx
///     .locals_mut()
///     .define("role", serde_json::json!("none"))
///     .unwrap();
///
/// let mut is_host = Equals::new(role.clone(), serde_json::json!("host"));
/// assert!(!is_host.is_satisfied(&mut ctx));
///
/// ctx.write(&role, serde_json::json!("host"));
/// assert!(is_host.is_satisfied(&mut ctx));
/// ```
pub struct Equals<T: VarValue + PartialEq> {
    lhs: VarHandle<T>,
    rhs: Operand<T>,
    negate: bool,
}

impl<T: VarValue + PartialEq + fmt::Debug> Equals<T> {
    /// Satisfied when the variable equals the operand.
    pub fn new(lhs: VarHandle<T>, rhs: impl Into<Operand<T>>) -> Self {
        Self {
            lhs,
            rhs: rhs.into(),
            negate: false,
        }
    }

    /// Satisfied when the variable does *not* equal the operand.
    pub fn not(lhs: VarHandle<T>, rhs: impl Into<Operand<T>>) -> Self {
        Self {
            lhs,
            rhs: rhs.into(),
            negate: true,
        }
    }
}

impl<T: VarValue + PartialEq + fmt::Debug> Condition for Equals<T> {
    fn is_satisfied(&mut self, ctx: &mut MachineContext) -> bool {
        let lhs = ctx.read(&self.lhs);
        let rhs = match &self.rhs {
            Operand::Var(handle) => ctx.read(handle),
            Operand::Const(value) => value.clone(),
        };
        (lhs == rhs) != self.negate
    }

    fn describe(&self) -> String {
        let op = if self.negate { "!=" } else { "==" };
        format!("{} {} {}", self.lhs.name(), op, operand_label(&self.rhs))
    }
}
