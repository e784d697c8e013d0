//! Capability key types for the lifetime registry.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key identifying a requested capability.
///
/// Keys are plain string identifiers fixed at registration time. Static keys
/// can be declared as constants; keys read from configuration own their text.
///
/// # Examples
///
/// ```rust
/// use lifetime_registry::CapabilityKey;
///
/// const CLOCK: CapabilityKey = CapabilityKey::from_static("clock");
///
/// let owned = CapabilityKey::new(String::from("clock"));
/// assert_eq!(CLOCK, owned);
/// assert_eq!(owned.as_str(), "clock");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityKey(Cow<'static, str>);

impl CapabilityKey {
    /// Creates a key from a static string without allocating.
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Creates a key from any owned or borrowed string.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The key's text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CapabilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for CapabilityKey {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for CapabilityKey {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl AsRef<str> for CapabilityKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_borrowed_and_owned_hash_alike() {
        let mut set = HashSet::new();
        set.insert(CapabilityKey::from_static("svc"));
        assert!(set.contains(&CapabilityKey::from("svc".to_string())));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let key = CapabilityKey::from_static("operation.scoped");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"operation.scoped\"");
    }
}
