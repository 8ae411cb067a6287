//! Evaluation context passed to conditions and actions.

use crate::variable::{SharedScope, VarHandle, VarValue, VariableScope};
use std::sync::Arc;
use uuid::Uuid;

/// The machine-owned state handed to conditions and actions at call time.
///
/// Conditions and actions receive the context by reference on every call
/// and never store it, so there is no ownership cycle between a machine
/// and its workflow parts. The context carries the machine's identity,
/// the instance-local variable scope and a handle to the process-wide
/// shared scope.
pub struct MachineContext {
    name: Arc<str>,
    id: Uuid,
    tick: u64,
    locals: VariableScope,
    shared: SharedScope,
}

impl MachineContext {
    pub(crate) fn new(name: Arc<str>, id: Uuid, shared: SharedScope) -> Self {
        Self {
            name,
            id,
            tick: 0,
            locals: VariableScope::new(),
            shared,
        }
    }

    /// A context not attached to any machine, with a fresh shared scope.
    ///
    /// Useful for unit-testing conditions and actions in isolation.
    pub fn detached(name: &str) -> Self {
        Self::new(Arc::from(name), Uuid::new_v4(), SharedScope::new())
    }

    /// Name of the owning machine.
    pub fn machine_name(&self) -> &str {
        &self.name
    }

    /// Instance id of the owning machine.
    pub fn machine_id(&self) -> Uuid {
        self.id
    }

    /// Number of the tick currently being evaluated (0 before the first).
    pub fn tick_number(&self) -> u64 {
        self.tick
    }

    pub(crate) fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    /// The instance-local variable scope.
    pub fn locals(&self) -> &VariableScope {
        &self.locals
    }

    /// Mutable access to the instance-local variable scope.
    pub fn locals_mut(&mut self) -> &mut VariableScope {
        &mut self.locals
    }

    /// The process-wide shared scope.
    pub fn shared(&self) -> &SharedScope {
        &self.shared
    }

    /// Read a variable, dispatching on the handle's scope.
    pub fn read<T: VarValue>(&self, handle: &VarHandle<T>) -> T {
        match handle.scope() {
            crate::variable::ScopeKind::Local => self.locals.read(handle),
            crate::variable::ScopeKind::Shared => self.shared.read(handle),
        }
    }

    /// Write a variable, dispatching on the handle's scope.
    pub fn write<T: VarValue>(&mut self, handle: &VarHandle<T>, value: T) {
        match handle.scope() {
            crate::variable::ScopeKind::Local => self.locals.write(handle, value),
            crate::variable::ScopeKind::Shared => self.shared.write(handle, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_context_has_empty_scopes() {
        let ctx = MachineContext::detached("test");
        assert_eq!(ctx.machine_name(), "test");
        assert_eq!(ctx.tick_number(), 0);
        assert!(ctx.locals().is_empty());
    }

    #[test]
    fn read_write_dispatch_on_handle_scope() {
        let mut ctx = MachineContext::detached("test");

        let local = ctx.locals_mut().define("count", 1i64).unwrap();
        let shared = ctx.shared().define("count", 100i64).unwrap();

        // Same name, different scopes, independent cells.
        assert_eq!(ctx.read(&local), 1);
        assert_eq!(ctx.read(&shared), 100);

        ctx.write(&local, 2);
        ctx.write(&shared, 200);
        assert_eq!(ctx.read(&local), 2);
        assert_eq!(ctx.read(&shared), 200);
    }

    #[test]
    fn shared_scope_is_shared_between_contexts() {
        let scope = SharedScope::new();
        let ctx_a = MachineContext::new(Arc::from("a"), Uuid::new_v4(), scope.clone());
        let mut ctx_b = MachineContext::new(Arc::from("b"), Uuid::new_v4(), scope);

        let cell = ctx_a.shared().define("session", 7i64).unwrap();
        ctx_b.write(&cell, 8);

        assert_eq!(ctx_a.read(&cell), 8);
    }
}
