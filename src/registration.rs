//! Capability registration table.

use std::collections::HashMap;

use crate::key::CapabilityKey;
use crate::lifetime::Lifetime;

/// A capability bound to its lifetime policy
#[derive(Debug, Clone, Copy)]
pub(crate) struct Registration {
    pub(crate) lifetime: Lifetime,
    /// Position of the first registration of this key, for stable listing
    pub(crate) order: usize,
}

/// Registry holding all capability registrations
#[derive(Debug, Default)]
pub(crate) struct Registry {
    entries: HashMap<CapabilityKey, Registration>,
    next_order: usize,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a binding, replacing the lifetime of an existing key.
    ///
    /// Returns the previous lifetime when the key was already bound.
    pub(crate) fn insert(&mut self, key: CapabilityKey, lifetime: Lifetime) -> Option<Lifetime> {
        if let Some(existing) = self.entries.get_mut(&key) {
            let previous = existing.lifetime;
            existing.lifetime = lifetime;
            return Some(previous);
        }

        let order = self.next_order;
        self.next_order += 1;
        self.entries.insert(key, Registration { lifetime, order });
        None
    }

    #[inline]
    pub(crate) fn get(&self, key: &CapabilityKey) -> Option<&Registration> {
        self.entries.get(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Bindings in first-registration order.
    pub(crate) fn bindings(&self) -> Vec<(CapabilityKey, Lifetime)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by_key(|(_, reg)| reg.order);
        entries
            .into_iter()
            .map(|(key, reg)| (key.clone(), reg.lifetime))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reregistration_replaces_lifetime_keeps_order() {
        let mut registry = Registry::new();
        assert_eq!(registry.insert("a".into(), Lifetime::PerRequest), None);
        assert_eq!(registry.insert("b".into(), Lifetime::PerScope), None);
        assert_eq!(
            registry.insert("a".into(), Lifetime::PerProcess),
            Some(Lifetime::PerRequest)
        );

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.bindings(),
            vec![
                (CapabilityKey::from_static("a"), Lifetime::PerProcess),
                (CapabilityKey::from_static("b"), Lifetime::PerScope),
            ]
        );
    }
}
