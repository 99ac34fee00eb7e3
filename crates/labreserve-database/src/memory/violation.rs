//! In-memory violation store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use labreserve_core::result::AppResult;
use labreserve_entity::violation::Violation;

use crate::stores::ViolationStore;

/// Violation store backed by a `DashMap`.
#[derive(Debug, Default)]
pub struct MemoryViolationStore {
    violations: DashMap<Uuid, Violation>,
}

impl MemoryViolationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ViolationStore for MemoryViolationStore {
    async fn insert(&self, violation: &Violation) -> AppResult<()> {
        self.violations.insert(violation.id, violation.clone());
        Ok(())
    }

    async fn update(&self, violation: &Violation) -> AppResult<()> {
        self.violations.insert(violation.id, violation.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Violation>> {
        Ok(self.violations.get(&id).map(|v| v.clone()))
    }

    async fn find_latest_unresolved(&self, requester_id: Uuid) -> AppResult<Option<Violation>> {
        let mut unresolved: Vec<Violation> = self
            .violations
            .iter()
            .filter(|v| v.requester_id == requester_id && !v.resolved)
            .map(|v| v.clone())
            .collect();
        unresolved.sort_by_key(|v| v.created_at);
        Ok(unresolved.pop())
    }

    async fn find_by_requester(&self, requester_id: Uuid) -> AppResult<Vec<Violation>> {
        let mut found: Vec<Violation> = self
            .violations
            .iter()
            .filter(|v| v.requester_id == requester_id)
            .map(|v| v.clone())
            .collect();
        found.sort_by_key(|v| v.created_at);
        found.reverse();
        Ok(found)
    }

    async fn find_auto_releasable(&self, now: DateTime<Utc>) -> AppResult<Vec<Violation>> {
        Ok(self
            .violations
            .iter()
            .filter(|v| v.auto_releasable(now))
            .map(|v| v.clone())
            .collect())
    }
}
