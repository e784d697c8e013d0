//! # lifetime-registry
//!
//! Lifetime-scoped instance registry demonstrating the three classic
//! dependency-injection lifetimes.
//!
//! ## Features
//!
//! - **Per-request**: a new instance on every resolution (a.k.a. Transient)
//! - **Per-scope**: one instance per unit of work such as an HTTP request (Scoped)
//! - **Per-process**: one instance for the registry's lifetime (Singleton)
//! - **Observable identity**: every instance is an [`InstanceRecord`] with a
//!   random id, a creation sequence number and a timestamp
//! - **Thread-safe**: single creation of per-process instances under contention
//! - **Axum demo**: JSON endpoints comparing ids across lifetimes
//!   (`axum-integration` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use lifetime_registry::{CapabilityKey, Registrations};
//!
//! const CLOCK: CapabilityKey = CapabilityKey::from_static("clock");
//! const REQUEST: CapabilityKey = CapabilityKey::from_static("request");
//! const COMMAND: CapabilityKey = CapabilityKey::from_static("command");
//!
//! let mut registrations = Registrations::new();
//! registrations
//!     .add_per_process(CLOCK)
//!     .add_per_scope(REQUEST)
//!     .add_per_request(COMMAND);
//! let registry = registrations.build();
//!
//! let scope = registry.begin_scope();
//! let clock = registry.resolve(&CLOCK, Some(&scope)).unwrap();
//! let request = registry.resolve(&REQUEST, Some(&scope)).unwrap();
//! let command = registry.resolve(&COMMAND, Some(&scope)).unwrap();
//!
//! // Per-process: same record with or without a scope
//! assert_eq!(clock.id(), registry.resolve(&CLOCK, None).unwrap().id());
//! // Per-scope: same record within the scope
//! assert_eq!(request.id(), scope.resolve(&REQUEST).unwrap().id());
//! // Per-request: always new
//! assert_ne!(command.id(), scope.resolve(&COMMAND).unwrap().id());
//!
//! registry.end_scope(&scope);
//! ```

pub mod collection;
pub mod config;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod operations;
pub mod provider;
pub mod record;

#[cfg(feature = "axum-integration")]
pub mod axum_integration;

mod registration;

pub use collection::{Registrations, RegistrationModule, RegistrationsExt};
pub use error::{RegistryError, RegistryResult};
pub use key::CapabilityKey;
pub use lifetime::Lifetime;
pub use observer::{LoggingObserver, RegistryObserver};
pub use provider::{LifetimeRegistry, ScopeHandle};
pub use record::InstanceRecord;
