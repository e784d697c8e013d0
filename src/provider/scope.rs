//! Scope handles and per-scope record storage.
//!
//! A scope is one unit of work, typically one HTTP request. It owns the
//! per-scope records created while it is active and discards them when it
//! ends.

use std::collections::HashMap;
use std::fmt;

use parking_lot::Mutex;

use super::LifetimeRegistry;
use crate::{CapabilityKey, InstanceRecord, RegistryResult};

/// Handle to an active scope.
///
/// Returned by [`LifetimeRegistry::begin_scope`]. The handle is owned by a
/// single unit of work; its record map sits behind an uncontended mutex only
/// so the handle can be moved across async handlers.
///
/// # Lifetime Behavior
///
/// - **PerProcess**: resolved from the registry, identical in every scope
/// - **PerScope**: cached in this handle until it ends
/// - **PerRequest**: created fresh on every resolution
///
/// # Examples
///
/// ```
/// use lifetime_registry::{CapabilityKey, Registrations, RegistryError};
///
/// let mut registrations = Registrations::new();
/// registrations.add_per_scope("request");
/// let registry = registrations.build();
///
/// let scope = registry.begin_scope();
/// let record = scope.resolve(&"request".into()).unwrap();
/// assert_eq!(scope.len(), 1);
///
/// registry.end_scope(&scope);
/// registry.end_scope(&scope); // idempotent
/// assert!(scope.is_ended());
/// assert!(matches!(
///     scope.resolve(&"request".into()),
///     Err(RegistryError::MissingScope(_))
/// ));
/// # let _ = record;
/// ```
pub struct ScopeHandle {
    id: u64,
    root: LifetimeRegistry,
    state: Mutex<ScopeState>,
}

#[derive(Default)]
struct ScopeState {
    records: HashMap<CapabilityKey, InstanceRecord>,
    ended: bool,
}

impl ScopeHandle {
    pub(crate) fn new(id: u64, root: LifetimeRegistry) -> Self {
        Self {
            id,
            root,
            state: Mutex::new(ScopeState::default()),
        }
    }

    /// Identifier of this scope, unique within its registry.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Resolves `key` through the owning registry with this scope active.
    pub fn resolve(&self, key: &CapabilityKey) -> RegistryResult<InstanceRecord> {
        self.root.resolve(key, Some(self))
    }

    /// The registry this scope was started from.
    pub fn registry(&self) -> &LifetimeRegistry {
        &self.root
    }

    /// Whether the scope has ended.
    pub fn is_ended(&self) -> bool {
        self.state.lock().ended
    }

    /// Number of per-scope records currently held.
    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    /// Whether the scope holds no per-scope records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cached record for `key`, creating it with `create` on first
    /// use. `None` means the scope has ended.
    pub(crate) fn get_or_create(
        &self,
        key: &CapabilityKey,
        create: impl FnOnce() -> InstanceRecord,
    ) -> Option<(InstanceRecord, bool)> {
        let mut state = self.state.lock();
        if state.ended {
            return None;
        }
        if let Some(record) = state.records.get(key) {
            return Some((record.clone(), true));
        }

        let record = create();
        state.records.insert(key.clone(), record.clone());
        Some((record, false))
    }

    /// Ends the scope, returning how many records were discarded, or `None`
    /// if it had already ended.
    pub(crate) fn end(&self) -> Option<usize> {
        let discarded = {
            let mut state = self.state.lock();
            if state.ended {
                return None;
            }
            state.ended = true;
            let discarded = state.records.len();
            state.records.clear();
            discarded
        };

        self.root.inner().observers.scope_ended(self.id, discarded);
        Some(discarded)
    }
}

impl Drop for ScopeHandle {
    fn drop(&mut self) {
        self.end();
    }
}

impl fmt::Debug for ScopeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ScopeHandle")
            .field("id", &self.id)
            .field("records", &state.records.len())
            .field("ended", &state.ended)
            .finish()
    }
}
