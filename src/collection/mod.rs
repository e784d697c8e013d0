//! Registration builder for the lifetime registry.
//!
//! This module contains the [`Registrations`] type used to declare which
//! capability keys exist and which lifetime each one is resolved under,
//! before building a [`LifetimeRegistry`].

use std::sync::Arc;

use crate::observer::Observers;
use crate::registration::Registry;
use crate::{CapabilityKey, Lifetime, LifetimeRegistry, RegistryObserver};

pub mod module_system;
pub use module_system::*;

/// Collects capability bindings and observers for a registry.
///
/// Registering a key a second time replaces its lifetime; the key keeps its
/// original position in [`LifetimeRegistry::bindings`].
///
/// # Examples
///
/// ```
/// use lifetime_registry::{CapabilityKey, Lifetime, Registrations};
///
/// let mut registrations = Registrations::new();
/// registrations
///     .add_per_request("operation.transient")
///     .add_per_scope("operation.scoped")
///     .add_per_process("operation.singleton");
///
/// let registry = registrations.build();
/// assert_eq!(registry.bindings().len(), 3);
/// ```
pub struct Registrations {
    registry: Registry,
    observers: Observers,
}

impl Registrations {
    /// Creates a new empty registration set.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            observers: Observers::new(),
        }
    }

    /// Binds `key` to `lifetime`.
    pub fn add(&mut self, key: impl Into<CapabilityKey>, lifetime: Lifetime) -> &mut Self {
        let key = key.into();
        if let Some(previous) = self.registry.insert(key.clone(), lifetime) {
            tracing::warn!(
                target: "lifetime_registry",
                key = %key,
                previous = %previous,
                lifetime = %lifetime,
                "capability re-registered, replacing previous lifetime"
            );
        }
        self
    }

    /// Binds `key` so every resolution creates a new instance.
    pub fn add_per_request(&mut self, key: impl Into<CapabilityKey>) -> &mut Self {
        self.add(key, Lifetime::PerRequest)
    }

    /// Binds `key` so each scope gets its own instance.
    pub fn add_per_scope(&mut self, key: impl Into<CapabilityKey>) -> &mut Self {
        self.add(key, Lifetime::PerScope)
    }

    /// Binds `key` so one instance is shared for the registry's lifetime.
    pub fn add_per_process(&mut self, key: impl Into<CapabilityKey>) -> &mut Self {
        self.add(key, Lifetime::PerProcess)
    }

    /// Adds several bindings at once.
    pub fn add_bindings<I, K>(&mut self, bindings: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, Lifetime)>,
        K: Into<CapabilityKey>,
    {
        for (key, lifetime) in bindings {
            self.add(key, lifetime);
        }
        self
    }

    /// Adds an observer notified of every registry event.
    ///
    /// # Examples
    ///
    /// ```
    /// use lifetime_registry::{LoggingObserver, Registrations};
    /// use std::sync::Arc;
    ///
    /// let mut registrations = Registrations::new();
    /// registrations.add_observer(Arc::new(LoggingObserver::new()));
    /// ```
    pub fn add_observer(&mut self, observer: Arc<dyn RegistryObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    /// Whether `key` has been registered.
    pub fn contains(&self, key: &CapabilityKey) -> bool {
        self.registry.get(key).is_some()
    }

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds the registry.
    pub fn build(self) -> LifetimeRegistry {
        tracing::debug!(
            target: "lifetime_registry",
            bindings = self.registry.len(),
            "building lifetime registry"
        );
        LifetimeRegistry::new(self.registry, self.observers)
    }
}

impl Default for Registrations {
    fn default() -> Self {
        Self::new()
    }
}
