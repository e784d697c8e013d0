/// Concurrent access integration tests
///
/// These tests verify single creation of per-process records under
/// contention and isolation of scopes owned by different threads.

use lifetime_registry::{CapabilityKey, Registrations};
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;

const SHARED: CapabilityKey = CapabilityKey::from_static("shared");
const REQUEST: CapabilityKey = CapabilityKey::from_static("request");
const COMMAND: CapabilityKey = CapabilityKey::from_static("command");

#[test]
fn test_concurrent_first_resolution_creates_once() {
    for _ in 0..20 {
        let mut registrations = Registrations::new();
        registrations.add_per_process(SHARED);
        let registry = registrations.build();

        let thread_count = 16;
        let barrier = Arc::new(Barrier::new(thread_count));
        let before = registry.instances_created();

        let handles: Vec<_> = (0..thread_count)
            .map(|_| {
                let registry = registry.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.resolve(&SHARED, None).unwrap().id()
                })
            })
            .collect();

        let ids: HashSet<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(ids.len(), 1, "all threads must observe the same record");
        assert_eq!(registry.instances_created(), before + 1);
        assert_eq!(registry.process_instances().len(), 1);
    }
}

#[test]
fn test_scopes_on_worker_threads_are_isolated() {
    let mut registrations = Registrations::new();
    registrations
        .add_per_process(SHARED)
        .add_per_scope(REQUEST)
        .add_per_request(COMMAND);
    let registry = registrations.build();

    let results = crossbeam_utils::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = &registry;
                s.spawn(move |_| {
                    let scope = registry.begin_scope();
                    let shared = scope.resolve(&SHARED).unwrap().id();
                    let first = scope.resolve(&REQUEST).unwrap().id();
                    let second = scope.resolve(&REQUEST).unwrap().id();
                    assert_eq!(first, second);
                    let command_a = scope.resolve(&COMMAND).unwrap().id();
                    let command_b = scope.resolve(&COMMAND).unwrap().id();
                    assert_ne!(command_a, command_b);
                    registry.end_scope(&scope);
                    (shared, first)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    })
    .unwrap();

    let shared: HashSet<_> = results.iter().map(|(shared, _)| *shared).collect();
    let scoped: HashSet<_> = results.iter().map(|(_, scoped)| *scoped).collect();
    assert_eq!(shared.len(), 1);
    assert_eq!(scoped.len(), results.len());
}

#[test]
fn test_sequence_numbers_unique_under_contention() {
    let mut registrations = Registrations::new();
    registrations.add_per_request(COMMAND);
    let registry = registrations.build();

    let threads = 8;
    let per_thread = 250;
    let barrier = Arc::new(Barrier::new(threads));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let registry = registry.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..per_thread)
                    .map(|_| registry.resolve(&COMMAND, None).unwrap().sequence())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut sequences: Vec<u64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    sequences.sort_unstable();

    let expected: Vec<u64> = (1..=(threads * per_thread) as u64).collect();
    assert_eq!(sequences, expected);
}
