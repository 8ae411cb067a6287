//! Variable scopes: instance-local and process-wide stores.

use crate::variable::error::VariableError;
use crate::variable::handle::{ScopeKind, VarHandle, VarValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Storage cell for one variable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Slot {
    Bool(bool),
    Int(i64),
    Float(f64),
    Struct(serde_json::Value),
}

impl Slot {
    /// The kind tag of the stored value.
    pub fn kind(&self) -> crate::variable::VarKind {
        use crate::variable::VarKind;
        match self {
            Slot::Bool(_) => VarKind::Bool,
            Slot::Int(_) => VarKind::Int,
            Slot::Float(_) => VarKind::Float,
            Slot::Struct(_) => VarKind::Struct,
        }
    }
}

/// A set of typed, named variable cells.
///
/// Names are unique within a scope; defining the same name twice is an
/// error. Looking up an undefined name with [`get`](Self::get) does *not*
/// error: it silently registers a zero-valued cell of the requested kind,
/// so read-before-write patterns stay safe.
///
/// # Example
///
/// ```rust
/// use tickwork::variable::VariableScope;
///
/// let mut scope = VariableScope::new();
///
/// // Reading an undefined name yields the type default.
/// let started = scope.get::<bool>("started").unwrap();
/// assert!(!scope.read(&started));
///
/// scope.write(&started, true);
/// assert!(scope.read(&started));
/// ```
#[derive(Debug)]
pub struct VariableScope {
    kind: ScopeKind,
    cells: HashMap<Arc<str>, Slot>,
}

impl Default for VariableScope {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableScope {
    /// Create an empty instance-local scope.
    pub fn new() -> Self {
        Self::with_kind(ScopeKind::Local)
    }

    pub(crate) fn with_kind(kind: ScopeKind) -> Self {
        Self {
            kind,
            cells: HashMap::new(),
        }
    }

    /// Register a typed cell with an initial value.
    ///
    /// Returns [`VariableError::Duplicate`] if the name already exists in
    /// this scope, regardless of kind.
    pub fn define<T: VarValue>(
        &mut self,
        name: &str,
        initial: T,
    ) -> Result<VarHandle<T>, VariableError> {
        if self.cells.contains_key(name) {
            return Err(VariableError::Duplicate {
                name: name.to_string(),
            });
        }
        let key: Arc<str> = Arc::from(name);
        self.cells.insert(Arc::clone(&key), initial.into_slot());
        Ok(VarHandle::new(key, self.kind))
    }

    /// Look up an existing cell, or register a zero-valued one.
    ///
    /// Returns [`VariableError::TypeMismatch`] only when the name exists
    /// with a different kind.
    pub fn get<T: VarValue>(&mut self, name: &str) -> Result<VarHandle<T>, VariableError> {
        if let Some(slot) = self.cells.get(name) {
            if slot.kind() != T::KIND {
                return Err(VariableError::TypeMismatch {
                    name: name.to_string(),
                    expected: T::KIND,
                    found: slot.kind(),
                });
            }
            let key: Arc<str> = Arc::from(name);
            return Ok(VarHandle::new(key, self.kind));
        }
        let key: Arc<str> = Arc::from(name);
        self.cells
            .insert(Arc::clone(&key), T::default().into_slot());
        Ok(VarHandle::new(key, self.kind))
    }

    /// Current value of the cell behind a handle.
    ///
    /// A handle whose cell was removed by [`clear`](Self::clear) (or whose
    /// kind drifted through a later `define`) reads as the type default.
    pub fn read<T: VarValue>(&self, handle: &VarHandle<T>) -> T {
        debug_assert_eq!(handle.scope(), self.kind);
        self.cells
            .get(handle.key())
            .and_then(T::from_slot)
            .unwrap_or_default()
    }

    /// Replace the value of the cell behind a handle.
    ///
    /// Writing through a handle whose cell was cleared re-registers it.
    pub fn write<T: VarValue>(&mut self, handle: &VarHandle<T>, value: T) {
        debug_assert_eq!(handle.scope(), self.kind);
        self.cells
            .insert(Arc::clone(handle.key()), value.into_slot());
    }

    /// Whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.cells.contains_key(name)
    }

    /// Number of registered cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the scope has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Drop every cell. Outstanding handles read as defaults afterwards.
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

/// The process-wide variable scope, shared across machine instances.
///
/// An explicitly owned, injectable store: the host creates one, hands
/// clones to each machine at build time, and clears it on process or
/// subsystem reset. The internal lock only satisfies Rust's aliasing
/// rules for single operations; cross-instance coordination protocols
/// remain the host's responsibility.
///
/// # Example
///
/// ```rust
/// use tickwork::variable::SharedScope;
///
/// let shared = SharedScope::new();
/// let session = shared.define("session_id", 0i64).unwrap();
///
/// let other_view = shared.clone();
/// other_view.write(&session, 42);
/// assert_eq!(shared.read(&session), 42);
///
/// shared.clear();
/// assert_eq!(shared.read(&session), 0);
/// ```
#[derive(Clone, Debug)]
pub struct SharedScope {
    inner: Arc<Mutex<VariableScope>>,
}

impl Default for SharedScope {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedScope {
    /// Create an empty shared scope.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(VariableScope::with_kind(ScopeKind::Shared))),
        }
    }

    fn store(&self) -> MutexGuard<'_, VariableScope> {
        match self.inner.lock() {
            Ok(guard) => guard,
            // A panic mid-write leaves at worst a stale value, never a
            // torn one; recover rather than poison every reader.
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Register a typed cell with an initial value.
    pub fn define<T: VarValue>(
        &self,
        name: &str,
        initial: T,
    ) -> Result<VarHandle<T>, VariableError> {
        self.store().define(name, initial)
    }

    /// Look up an existing cell, or register a zero-valued one.
    pub fn get<T: VarValue>(&self, name: &str) -> Result<VarHandle<T>, VariableError> {
        self.store().get(name)
    }

    /// Current value of the cell behind a handle.
    pub fn read<T: VarValue>(&self, handle: &VarHandle<T>) -> T {
        self.store().read(handle)
    }

    /// Replace the value of the cell behind a handle.
    pub fn write<T: VarValue>(&self, handle: &VarHandle<T>, value: T) {
        self.store().write(handle, value)
    }

    /// Whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.store().contains(name)
    }

    /// Drop every cell, typically on host process/subsystem reset.
    pub fn clear(&self) {
        self.store().clear()
    }
}
