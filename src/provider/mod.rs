//! Lifetime registry module.
//!
//! This module contains the [`LifetimeRegistry`] type that resolves capability
//! keys to instance records according to their registered lifetime policy.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::observer::Observers;
use crate::record::RecordFactory;
use crate::registration::Registry;
use crate::{CapabilityKey, InstanceRecord, Lifetime, RegistryError, RegistryResult};

pub mod scope;
pub use scope::ScopeHandle;

/// Registry resolving capability keys to instance records.
///
/// The registry is built once from [`Registrations`](crate::Registrations)
/// and then shared by every request-handling thread. Cloning is cheap: all
/// clones share the same process-wide state.
///
/// # Thread Safety
///
/// The per-process map is the only state mutated from several threads. Reads
/// take a shared lock; the first creation for a key happens under the write
/// lock after re-checking the map, so concurrent first resolutions of the
/// same key yield exactly one record.
///
/// # Examples
///
/// ```
/// use lifetime_registry::{CapabilityKey, Registrations};
///
/// const SVC: CapabilityKey = CapabilityKey::from_static("svc");
///
/// let mut registrations = Registrations::new();
/// registrations.add_per_scope(SVC);
/// let registry = registrations.build();
///
/// let scope_a = registry.begin_scope();
/// let first = registry.resolve(&SVC, Some(&scope_a)).unwrap();
/// let second = registry.resolve(&SVC, Some(&scope_a)).unwrap();
/// assert_eq!(first.id(), second.id());
///
/// let scope_b = registry.begin_scope();
/// let other = registry.resolve(&SVC, Some(&scope_b)).unwrap();
/// assert_ne!(first.id(), other.id());
/// ```
#[derive(Clone)]
pub struct LifetimeRegistry {
    inner: Arc<RegistryInner>,
}

pub(crate) struct RegistryInner {
    pub(crate) registry: Registry,
    pub(crate) process: RwLock<HashMap<CapabilityKey, InstanceRecord>>,
    pub(crate) records: RecordFactory,
    pub(crate) next_scope_id: AtomicU64,
    pub(crate) observers: Observers,
}

impl LifetimeRegistry {
    /// Create a new registry from a registration table.
    /// This is used internally by `Registrations::build()`.
    pub(crate) fn new(registry: Registry, observers: Observers) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                registry,
                process: RwLock::new(HashMap::new()),
                records: RecordFactory::new(),
                next_scope_id: AtomicU64::new(1),
                observers,
            }),
        }
    }

    #[inline]
    pub(crate) fn inner(&self) -> &RegistryInner {
        &self.inner
    }

    /// Resolves `key` according to its registered lifetime.
    ///
    /// - `PerRequest` always creates a new record.
    /// - `PerScope` returns the record owned by `scope`, creating it on first
    ///   use. Fails with [`RegistryError::MissingScope`] when no scope is given,
    ///   the scope has already ended, or it was begun by another registry.
    /// - `PerProcess` ignores `scope` and returns the registry-wide record.
    ///
    /// Unregistered keys fail with [`RegistryError::UnknownCapability`].
    pub fn resolve(
        &self,
        key: &CapabilityKey,
        scope: Option<&ScopeHandle>,
    ) -> RegistryResult<InstanceRecord> {
        let observers = &self.inner().observers;
        if !observers.has_observers() {
            return self.resolve_impl(key, scope).map(|(record, _)| record);
        }

        let start = Instant::now();
        match self.resolve_impl(key, scope) {
            Ok((record, reused)) => {
                observers.resolved(&record, reused, start.elapsed());
                Ok(record)
            }
            Err(err) => {
                observers.resolution_failed(key, &err);
                Err(err)
            }
        }
    }

    /// Creates a new, empty scope owned by the caller.
    ///
    /// The scope ends when passed to [`LifetimeRegistry::end_scope`] or when
    /// the handle is dropped, whichever comes first.
    pub fn begin_scope(&self) -> ScopeHandle {
        let id = self.inner().next_scope_id.fetch_add(1, Ordering::Relaxed);
        self.inner().observers.scope_started(id);
        ScopeHandle::new(id, self.clone())
    }

    /// Discards every per-scope record held by `scope`.
    ///
    /// Calling this more than once on the same handle is a no-op, as is
    /// passing a scope begun by a different registry.
    pub fn end_scope(&self, scope: &ScopeHandle) {
        if self.owns(scope) {
            scope.end();
        }
    }

    /// Lifetime registered for `key`, if any.
    pub fn policy_of(&self, key: &CapabilityKey) -> Option<Lifetime> {
        self.inner().registry.get(key).map(|reg| reg.lifetime)
    }

    /// All bindings in registration order.
    pub fn bindings(&self) -> Vec<(CapabilityKey, Lifetime)> {
        self.inner().registry.bindings()
    }

    /// Total number of records this registry has created.
    pub fn instances_created(&self) -> u64 {
        self.inner().records.count()
    }

    /// Snapshot of the per-process records created so far, oldest first.
    pub fn process_instances(&self) -> Vec<InstanceRecord> {
        let mut records: Vec<_> = self.inner().process.read().values().cloned().collect();
        records.sort_by_key(InstanceRecord::sequence);
        records
    }

    /// Whether `scope` was begun by this registry or one of its clones.
    fn owns(&self, scope: &ScopeHandle) -> bool {
        Arc::ptr_eq(&scope.registry().inner, &self.inner)
    }

    fn resolve_impl(
        &self,
        key: &CapabilityKey,
        scope: Option<&ScopeHandle>,
    ) -> RegistryResult<(InstanceRecord, bool)> {
        let inner = self.inner();
        let reg = inner
            .registry
            .get(key)
            .ok_or_else(|| RegistryError::UnknownCapability(key.clone()))?;

        let (record, reused) = match reg.lifetime {
            Lifetime::PerRequest => (inner.records.create(key, Lifetime::PerRequest), false),
            Lifetime::PerScope => scope
                .filter(|scope| self.owns(scope))
                .and_then(|scope| {
                    scope.get_or_create(key, || inner.records.create(key, Lifetime::PerScope))
                })
                .ok_or_else(|| RegistryError::MissingScope(key.clone()))?,
            Lifetime::PerProcess => self.resolve_per_process(key),
        };

        // Locks are released by now, so observers may call back into the registry
        if !reused {
            inner.observers.instance_created(&record);
        }
        Ok((record, reused))
    }

    fn resolve_per_process(&self, key: &CapabilityKey) -> (InstanceRecord, bool) {
        if let Some(record) = self.inner().process.read().get(key) {
            return (record.clone(), true);
        }

        let mut process = self.inner().process.write();
        // Another thread may have created it between the two locks
        if let Some(record) = process.get(key) {
            return (record.clone(), true);
        }

        let record = self.inner().records.create(key, Lifetime::PerProcess);
        process.insert(key.clone(), record.clone());
        (record, false)
    }
}

impl fmt::Debug for LifetimeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifetimeRegistry")
            .field("bindings", &self.inner().registry.len())
            .field("process_instances", &self.inner().process.read().len())
            .field("instances_created", &self.instances_created())
            .finish()
    }
}
