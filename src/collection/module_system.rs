//! Registration modules.
//!
//! A module groups related bindings so an application can install them with
//! one call instead of repeating the keys at every call site.

use crate::Registrations;

/// A set of bindings that can be installed into [`Registrations`].
///
/// # Example
///
/// ```rust
/// use lifetime_registry::{Registrations, RegistrationModule, RegistrationsExt};
///
/// struct AuditModule;
///
/// impl RegistrationModule for AuditModule {
///     fn register(self, registrations: &mut Registrations) {
///         registrations
///             .add_per_process("audit.sink")
///             .add_per_scope("audit.context");
///     }
/// }
///
/// let mut registrations = Registrations::new();
/// registrations.add_module(AuditModule);
/// assert_eq!(registrations.len(), 2);
/// ```
pub trait RegistrationModule {
    /// Install this module's bindings.
    fn register(self, registrations: &mut Registrations);
}

/// Extension trait providing fluent module installation.
pub trait RegistrationsExt {
    /// Install `module` and return `self` for chaining.
    fn add_module<M: RegistrationModule>(&mut self, module: M) -> &mut Self;
}

impl RegistrationsExt for Registrations {
    fn add_module<M: RegistrationModule>(&mut self, module: M) -> &mut Self {
        module.register(self);
        self
    }
}

impl<F> RegistrationModule for F
where
    F: FnOnce(&mut Registrations),
{
    fn register(self, registrations: &mut Registrations) {
        self(registrations)
    }
}
