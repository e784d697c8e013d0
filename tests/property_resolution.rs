/// Property-based tests for lifetime resolution
///
/// Registers arbitrary key sets under arbitrary lifetimes and checks the
/// reuse rules hold for every key and every scope.

use lifetime_registry::{CapabilityKey, Lifetime, Registrations};
use proptest::prelude::*;
use std::collections::HashSet;

fn lifetime() -> impl Strategy<Value = Lifetime> {
    prop_oneof![
        Just(Lifetime::PerRequest),
        Just(Lifetime::PerScope),
        Just(Lifetime::PerProcess),
    ]
}

proptest! {
    #[test]
    fn reuse_rules_hold_for_any_binding_set(
        bindings in prop::collection::hash_map("[a-z]{1,8}", lifetime(), 1..8),
        scope_count in 1usize..5,
        resolutions in 1usize..4,
    ) {
        let mut registrations = Registrations::new();
        registrations.add_bindings(
            bindings.iter().map(|(k, l)| (CapabilityKey::new(k.clone()), *l)),
        );
        let registry = registrations.build();
        let scopes: Vec<_> = (0..scope_count).map(|_| registry.begin_scope()).collect();

        for (name, lifetime) in &bindings {
            let key = CapabilityKey::new(name.clone());
            let mut per_scope: Vec<HashSet<_>> = Vec::new();

            for scope in &scopes {
                let ids: Vec<_> = (0..resolutions)
                    .map(|_| registry.resolve(&key, Some(scope)).unwrap().id())
                    .collect();
                per_scope.push(ids.iter().copied().collect());

                match lifetime {
                    Lifetime::PerRequest => {
                        prop_assert_eq!(ids.iter().collect::<HashSet<_>>().len(), resolutions);
                    }
                    Lifetime::PerScope | Lifetime::PerProcess => {
                        prop_assert!(ids.iter().all(|id| *id == ids[0]));
                    }
                }
            }

            let distinct: HashSet<_> = per_scope.iter().flatten().copied().collect();
            match lifetime {
                Lifetime::PerRequest => {
                    prop_assert_eq!(distinct.len(), scope_count * resolutions);
                }
                Lifetime::PerScope => {
                    prop_assert_eq!(distinct.len(), scope_count);
                }
                Lifetime::PerProcess => {
                    prop_assert_eq!(distinct.len(), 1);
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn rootless_resolution_depends_only_on_lifetime(lifetime in lifetime()) {
        let key = CapabilityKey::from_static("svc");
        let mut registrations = Registrations::new();
        registrations.add(key.clone(), lifetime);
        let registry = registrations.build();

        let result = registry.resolve(&key, None);
        prop_assert_eq!(result.is_err(), lifetime.requires_scope());
    }
}

proptest! {
    #[test]
    fn sequence_counts_every_creation(creations in 1usize..50) {
        let key = CapabilityKey::from_static("cmd");
        let mut registrations = Registrations::new();
        registrations.add_per_request(key.clone());
        let registry = registrations.build();

        let last = (0..creations)
            .map(|_| registry.resolve(&key, None).unwrap().sequence())
            .last()
            .unwrap();
        prop_assert_eq!(last, creations as u64);
        prop_assert_eq!(registry.instances_created(), creations as u64);
    }
}
