//! Per-id lock maps serializing check-then-write critical sections.
//!
//! A lock is scoped to a single resource or requester id; unrelated ids
//! never contend. Lock ordering is fixed across the whole crate: the
//! requester lock is acquired before any resource lock.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Lazily populated map of per-id async mutexes.
#[derive(Debug, Default)]
pub struct LockMap {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl LockMap {
    /// Create an empty lock map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `id`, creating it on first use. The guard is
    /// owned so it can be held across await points.
    pub async fn acquire(&self, id: Uuid) -> OwnedMutexGuard<()> {
        let lock = self.locks.entry(id).or_default().clone();
        lock.lock_owned().await
    }
}

/// The two lock maps the ledger and allocator share.
#[derive(Debug, Default)]
pub struct ReservationLocks {
    /// Serializes a requester's active-reservation and active-block checks.
    pub requesters: LockMap,
    /// Serializes occupancy check-and-set per resource.
    pub resources: LockMap,
}

impl ReservationLocks {
    /// Create the shared lock maps.
    pub fn new() -> Self {
        Self::default()
    }
}
