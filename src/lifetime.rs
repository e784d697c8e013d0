//! Lifetime policy definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifetime policy controlling instance reuse
///
/// A policy is attached to a capability key when it is registered. The same
/// concrete instance type can be bound under several keys with different
/// policies; reuse is decided by the binding, never by the type.
///
/// # Examples
///
/// ```rust
/// use lifetime_registry::{CapabilityKey, Lifetime, Registrations};
///
/// let mut registrations = Registrations::new();
/// registrations.add(CapabilityKey::from_static("clock"), Lifetime::PerProcess);
/// registrations.add(CapabilityKey::from_static("request"), Lifetime::PerScope);
/// registrations.add(CapabilityKey::from_static("command"), Lifetime::PerRequest);
///
/// let registry = registrations.build();
/// assert_eq!(
///     registry.policy_of(&CapabilityKey::from_static("request")),
///     Some(Lifetime::PerScope)
/// );
/// assert_eq!(Lifetime::PerProcess.label(), "Singleton");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifetime {
    /// New instance per resolution, never cached
    ///
    /// Every call creates a fresh record, even when two calls happen inside
    /// the same scope.
    #[serde(alias = "transient")]
    PerRequest,
    /// Single instance per scope, discarded when the scope ends
    ///
    /// Requires an active scope at resolution time.
    #[serde(alias = "scoped")]
    PerScope,
    /// Single instance per registry, cached for the process lifetime
    ///
    /// Created lazily on first resolution; scopes are ignored.
    #[serde(alias = "singleton")]
    PerProcess,
}

impl Lifetime {
    /// All policies in declaration order.
    pub const ALL: [Lifetime; 3] = [Lifetime::PerRequest, Lifetime::PerScope, Lifetime::PerProcess];

    /// Conventional container name for the policy.
    pub fn label(self) -> &'static str {
        match self {
            Lifetime::PerRequest => "Transient",
            Lifetime::PerScope => "Scoped",
            Lifetime::PerProcess => "Singleton",
        }
    }

    /// Whether resolution under this policy needs an active scope.
    pub fn requires_scope(self) -> bool {
        matches!(self, Lifetime::PerScope)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
