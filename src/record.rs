//! Instance records produced by resolution.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{CapabilityKey, Lifetime};

/// Identity of one created instance.
///
/// Records are immutable once created. Cloning a record yields the same
/// identity, so comparing [`InstanceRecord::id`] values tells a caller whether
/// two resolutions were served by the same instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceRecord {
    id: Uuid,
    sequence: u64,
    created_at: DateTime<Utc>,
    key: CapabilityKey,
    lifetime: Lifetime,
}

impl InstanceRecord {
    /// Random identifier assigned at creation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Creation order within the owning registry, starting at 1.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Creation timestamp (UTC).
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Capability key the record was created for.
    pub fn key(&self) -> &CapabilityKey {
        &self.key
    }

    /// Lifetime policy the record was created under.
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// First eight hex digits of the id, handy for eyeballing reuse.
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }

    /// Human readable summary, e.g. `Singleton service instance <id> (#3) created at ...`.
    pub fn describe(&self) -> String {
        format!(
            "{} service instance {} (#{}) created at {}",
            self.lifetime.label(),
            self.id,
            self.sequence,
            self.created_at.format("%H:%M:%S%.3f")
        )
    }
}

/// Monotonic record factory shared by a registry and all of its scopes.
#[derive(Debug, Default)]
pub(crate) struct RecordFactory {
    created: AtomicU64,
}

impl RecordFactory {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn create(&self, key: &CapabilityKey, lifetime: Lifetime) -> InstanceRecord {
        let sequence = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        InstanceRecord {
            id: Uuid::new_v4(),
            sequence,
            created_at: Utc::now(),
            key: key.clone(),
            lifetime,
        }
    }

    /// Number of records created so far.
    pub(crate) fn count(&self) -> u64 {
        self.created.load(Ordering::SeqCst)
    }
}
