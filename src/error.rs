//! Error types for the lifetime registry.

use std::fmt;

use crate::CapabilityKey;

/// Registry resolution errors
///
/// Both variants describe configuration bugs in the calling code rather than
/// transient conditions: callers should abort the current unit of work and
/// never retry.
///
/// # Examples
///
/// ```rust
/// use lifetime_registry::{CapabilityKey, RegistryError, Registrations};
///
/// let registry = Registrations::new().build();
/// match registry.resolve(&CapabilityKey::from_static("missing"), None) {
///     Err(RegistryError::UnknownCapability(key)) => assert_eq!(key.as_str(), "missing"),
///     other => panic!("unexpected: {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Scoped capability resolved without an active scope
    MissingScope(CapabilityKey),
    /// Capability key was never registered
    UnknownCapability(CapabilityKey),
}

impl RegistryError {
    /// The capability key the failed resolution asked for.
    pub fn key(&self) -> &CapabilityKey {
        match self {
            RegistryError::MissingScope(key) | RegistryError::UnknownCapability(key) => key,
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::MissingScope(key) => {
                write!(f, "No active scope for scoped capability: {}", key)
            }
            RegistryError::UnknownCapability(key) => write!(f, "Capability not registered: {}", key),
        }
    }
}

impl std::error::Error for RegistryError {}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_key() {
        let err = RegistryError::MissingScope(CapabilityKey::from_static("svc"));
        assert_eq!(err.to_string(), "No active scope for scoped capability: svc");

        let err = RegistryError::UnknownCapability(CapabilityKey::from_static("nope"));
        assert_eq!(err.to_string(), "Capability not registered: nope");
        assert_eq!(err.key().as_str(), "nope");
    }
}
