//! Diagnostic observers for registry events.
//!
//! Observers receive a callback for every instance creation, resolution,
//! failure and scope transition. They are how the registry reports what it is
//! doing: the built-in [`LoggingObserver`] turns those callbacks into
//! structured `tracing` events.

use std::sync::Arc;
use std::time::Duration;

use crate::{CapabilityKey, InstanceRecord, RegistryError};

/// Observer trait for registry events.
///
/// Only [`RegistryObserver::resolved`] is required; the remaining hooks have
/// empty default implementations.
///
/// # Performance
///
/// Observer calls are made synchronously on the resolving thread. Keep
/// implementations lightweight.
///
/// Hooks run after the registry has released its locks, so an observer may
/// resolve through the registry or inspect a scope from inside a callback.
///
/// # Examples
///
/// ```
/// use lifetime_registry::{InstanceRecord, Registrations, RegistryObserver};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct ReuseCounter {
///     reused: AtomicUsize,
/// }
///
/// impl RegistryObserver for ReuseCounter {
///     fn resolved(&self, _record: &InstanceRecord, reused: bool, _duration: Duration) {
///         if reused {
///             self.reused.fetch_add(1, Ordering::SeqCst);
///         }
///     }
/// }
///
/// let counter = Arc::new(ReuseCounter::default());
/// let mut registrations = Registrations::new();
/// registrations.add_per_process("clock");
/// registrations.add_observer(counter.clone());
///
/// let registry = registrations.build();
/// registry.resolve(&"clock".into(), None).unwrap();
/// registry.resolve(&"clock".into(), None).unwrap();
/// assert_eq!(counter.reused.load(Ordering::SeqCst), 1);
/// ```
pub trait RegistryObserver: Send + Sync {
    /// Called after a resolution succeeded.
    ///
    /// `reused` is true when an existing record was returned rather than a
    /// new one created.
    fn resolved(&self, record: &InstanceRecord, reused: bool, duration: Duration);

    /// Called when a new record is created.
    fn instance_created(&self, _record: &InstanceRecord) {}

    /// Called when a resolution fails.
    fn resolution_failed(&self, _key: &CapabilityKey, _error: &RegistryError) {}

    /// Called when a scope begins.
    fn scope_started(&self, _scope_id: u64) {}

    /// Called the first time a scope ends, with the number of records it discarded.
    fn scope_ended(&self, _scope_id: u64, _discarded: usize) {}
}

/// Container for registered observers.
///
/// Minimal overhead when empty: callers check [`Observers::has_observers`]
/// before taking timings.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn RegistryObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn RegistryObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolved(&self, record: &InstanceRecord, reused: bool, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(record, reused, duration);
        }
    }

    #[inline]
    pub(crate) fn instance_created(&self, record: &InstanceRecord) {
        for observer in &self.observers {
            observer.instance_created(record);
        }
    }

    #[inline]
    pub(crate) fn resolution_failed(&self, key: &CapabilityKey, error: &RegistryError) {
        for observer in &self.observers {
            observer.resolution_failed(key, error);
        }
    }

    #[inline]
    pub(crate) fn scope_started(&self, scope_id: u64) {
        for observer in &self.observers {
            observer.scope_started(scope_id);
        }
    }

    #[inline]
    pub(crate) fn scope_ended(&self, scope_id: u64, discarded: usize) {
        for observer in &self.observers {
            observer.scope_ended(scope_id, discarded);
        }
    }
}

/// Built-in observer that emits `tracing` events.
///
/// Creations are logged at `info`, resolutions and scope transitions at
/// `debug`, failures at `warn`. All events use the `lifetime_registry` target
/// so they can be filtered with `RUST_LOG=lifetime_registry=debug`.
///
/// # Examples
///
/// ```
/// use lifetime_registry::{LoggingObserver, Registrations};
/// use std::sync::Arc;
///
/// let mut registrations = Registrations::new();
/// registrations.add_observer(Arc::new(LoggingObserver::new()));
/// let _registry = registrations.build();
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "registry".to_string(),
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryObserver for LoggingObserver {
    fn resolved(&self, record: &InstanceRecord, reused: bool, duration: Duration) {
        tracing::debug!(
            target: "lifetime_registry",
            prefix = %self.prefix,
            key = %record.key(),
            lifetime = %record.lifetime(),
            id = %record.id(),
            reused,
            elapsed_ns = duration.as_nanos() as u64,
            "resolved"
        );
    }

    fn instance_created(&self, record: &InstanceRecord) {
        tracing::info!(
            target: "lifetime_registry",
            prefix = %self.prefix,
            key = %record.key(),
            lifetime = %record.lifetime(),
            sequence = record.sequence(),
            id = %record.id().simple(),
            "instance #{} created",
            record.sequence()
        );
    }

    fn resolution_failed(&self, key: &CapabilityKey, error: &RegistryError) {
        tracing::warn!(
            target: "lifetime_registry",
            prefix = %self.prefix,
            key = %key,
            error = %error,
            "resolution failed"
        );
    }

    fn scope_started(&self, scope_id: u64) {
        tracing::debug!(target: "lifetime_registry", prefix = %self.prefix, scope_id, "scope started");
    }

    fn scope_ended(&self, scope_id: u64, discarded: usize) {
        tracing::debug!(
            target: "lifetime_registry",
            prefix = %self.prefix,
            scope_id,
            discarded,
            "scope ended"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordFactory;
    use crate::Lifetime;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        resolved: AtomicUsize,
        created: AtomicUsize,
    }

    impl RegistryObserver for Counting {
        fn resolved(&self, _record: &InstanceRecord, _reused: bool, _duration: Duration) {
            self.resolved.fetch_add(1, Ordering::SeqCst);
        }

        fn instance_created(&self, _record: &InstanceRecord) {
            self.created.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_observers_fan_out() {
        let a = Arc::new(Counting::default());
        let b = Arc::new(Counting::default());
        let mut observers = Observers::new();
        assert!(!observers.has_observers());
        observers.add(a.clone());
        observers.add(b.clone());
        assert!(observers.has_observers());

        let record = RecordFactory::new().create(&"svc".into(), Lifetime::PerRequest);
        observers.instance_created(&record);
        observers.resolved(&record, false, Duration::from_micros(3));

        for counting in [&a, &b] {
            assert_eq!(counting.created.load(Ordering::SeqCst), 1);
            assert_eq!(counting.resolved.load(Ordering::SeqCst), 1);
        }
    }

    #[test]
    fn test_logging_observer_does_not_panic() {
        let observer = LoggingObserver::with_prefix("test");
        let key = CapabilityKey::from_static("svc");
        let record = RecordFactory::new().create(&key, Lifetime::PerScope);

        observer.instance_created(&record);
        observer.resolved(&record, true, Duration::from_millis(1));
        observer.resolution_failed(&key, &RegistryError::MissingScope(key.clone()));
        observer.scope_started(1);
        observer.scope_ended(1, 3);
    }
}
