//! Actions over the variable store.

use crate::action::{Action, ActionError};
use crate::condition::Operand;
use crate::machine::MachineContext;
use crate::variable::{NumericValue, VarHandle, VarValue};
use std::fmt;

/// Writes a fixed value through a handle when executed.
///
/// # Example
///
/// ```rust
/// use tickwork::action::{Action, SetVar};
/// use tickwork::machine::MachineContext;
///
/// let mut ctx = MachineContext::detached("doc");
/// let role = ctx
///     .locals_mut()
///     .define("role", serde_json::json!("none"))
///     .unwrap();
///
/// let mut reset = SetVar::new(role.clone(), serde_json::json!("none"));
/// ctx.write(&role, serde_json::json!("host"));
///
/// reset.execute(&mut ctx).unwrap();
/// assert_eq!(ctx.read(&role), serde_json::json!("none"));
/// ```
pub struct SetVar<T: VarValue> {
    handle: VarHandle<T>,
    value: T,
}

impl<T: VarValue + fmt::Debug> SetVar<T> {
    /// Create an action that writes `value` to the cell behind `handle`.
    pub fn new(handle: VarHandle<T>, value: T) -> Self {
        Self { handle, value }
    }
}

impl<T: VarValue + fmt::Debug> Action for SetVar<T> {
    fn execute(&mut self, ctx: &mut MachineContext) -> Result<(), ActionError> {
        ctx.write(&self.handle, self.value.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{} = {:?}", self.handle.name(), self.value)
    }
}

/// Arithmetic operator for [`Arith`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        };
        f.write_str(symbol)
    }
}

/// Writes `dst = lhs op rhs` over numeric cells.
///
/// Operand types are fixed at construction; only numeric variable kinds
/// participate. Integer division by zero fails the action rather than
/// panicking the tick.
pub struct Arith<T: NumericValue> {
    dst: VarHandle<T>,
    lhs: Operand<T>,
    op: ArithOp,
    rhs: Operand<T>,
}

impl<T: NumericValue + fmt::Debug> Arith<T> {
    /// Create an arithmetic update action.
    pub fn new(
        dst: VarHandle<T>,
        lhs: impl Into<Operand<T>>,
        op: ArithOp,
        rhs: impl Into<Operand<T>>,
    ) -> Self {
        Self {
            dst,
            lhs: lhs.into(),
            op,
            rhs: rhs.into(),
        }
    }

    fn resolve(operand: &Operand<T>, ctx: &MachineContext) -> T {
        match operand {
            Operand::Var(handle) => ctx.read(handle),
            Operand::Const(value) => *value,
        }
    }

    fn operand_label(operand: &Operand<T>) -> String {
        match operand {
            Operand::Var(handle) => handle.name().to_string(),
            Operand::Const(value) => format!("{value:?}"),
        }
    }
}

impl<T: NumericValue + fmt::Debug> Action for Arith<T> {
    fn execute(&mut self, ctx: &mut MachineContext) -> Result<(), ActionError> {
        let lhs = Self::resolve(&self.lhs, ctx);
        let rhs = Self::resolve(&self.rhs, ctx);
        let result = match self.op {
            ArithOp::Add => lhs + rhs,
            ArithOp::Sub => lhs - rhs,
            ArithOp::Mul => lhs * rhs,
            ArithOp::Div => lhs.checked_div(rhs).ok_or_else(|| {
                ActionError::new(format!("division by zero in '{}'", self.describe()))
            })?,
        };
        ctx.write(&self.dst, result);
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "{} = {} {} {}",
            self.dst.name(),
            Self::operand_label(&self.lhs),
            self.op,
            Self::operand_label(&self.rhs)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> MachineContext {
        MachineContext::detached("test")
    }

    #[test]
    fn set_var_writes_local_cells() {
        let mut c = ctx();
        let ready = c.locals_mut().define("ready", false).unwrap();

        SetVar::new(ready.clone(), true).execute(&mut c).unwrap();
        assert!(c.read(&ready));
    }

    #[test]
    fn set_var_writes_shared_cells() {
        let mut c = ctx();
        let round = c.shared().define("round", 0i64).unwrap();

        SetVar::new(round.clone(), 9).execute(&mut c).unwrap();
        assert_eq!(c.read(&round), 9);
    }

    #[test]
    fn arith_increments_a_counter() {
        let mut c = ctx();
        let attempts = c.locals_mut().define("attempts", 2i64).unwrap();

        let mut bump = Arith::new(attempts.clone(), attempts.clone(), ArithOp::Add, 1);
        bump.execute(&mut c).unwrap();
        bump.execute(&mut c).unwrap();

        assert_eq!(c.read(&attempts), 4);
    }

    #[test]
    fn arith_combines_two_variables() {
        let mut c = ctx();
        let base = c.locals_mut().define("base", 1.5f64).unwrap();
        let scale = c.locals_mut().define("scale", 4.0f64).unwrap();
        let result = c.locals_mut().define("result", 0.0f64).unwrap();

        Arith::new(result.clone(), base, ArithOp::Mul, scale)
            .execute(&mut c)
            .unwrap();

        assert_eq!(c.read(&result), 6.0);
    }

    #[test]
    fn integer_division_by_zero_fails_the_action() {
        let mut c = ctx();
        let quota = c.locals_mut().define("quota", 10i64).unwrap();
        let users = c.locals_mut().define("users", 0i64).unwrap();

        let mut split = Arith::new(quota.clone(), quota.clone(), ArithOp::Div, users);
        let err = split.execute(&mut c).unwrap_err();

        assert!(err.message().contains("division by zero"));
        // Destination untouched on failure.
        assert_eq!(c.read(&quota), 10);
    }

    #[test]
    fn describe_renders_the_expression() {
        let mut c = ctx();
        let n = c.locals_mut().define("n", 0i64).unwrap();

        let action = Arith::new(n.clone(), n.clone(), ArithOp::Add, 1);
        assert_eq!(action.describe(), "n = n + 1");

        let action = SetVar::new(n, 0i64);
        assert_eq!(action.describe(), "n = 0");
    }
}
