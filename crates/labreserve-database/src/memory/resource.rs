//! In-memory resource store.

use std::net::IpAddr;

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use labreserve_core::result::AppResult;
use labreserve_entity::resource::{Condition, Connectivity, Occupancy, Resource};

use crate::stores::ResourceStore;

/// Resource store backed by a `DashMap`.
#[derive(Debug, Default)]
pub struct MemoryResourceStore {
    resources: DashMap<Uuid, Resource>,
}

impl MemoryResourceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(&self, mut resources: Vec<Resource>) -> Vec<Resource> {
        resources.sort_by(|a, b| {
            a.sort_key
                .cmp(&b.sort_key)
                .then_with(|| a.name.cmp(&b.name))
        });
        resources
    }
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    async fn insert(&self, resource: &Resource) -> AppResult<()> {
        self.resources.insert(resource.id, resource.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Resource>> {
        Ok(self.resources.get(&id).map(|r| r.clone()))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Resource>> {
        Ok(self
            .resources
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.clone()))
    }

    async fn find_by_address(&self, address: IpAddr) -> AppResult<Option<Resource>> {
        Ok(self
            .resources
            .iter()
            .find(|r| r.address == address)
            .map(|r| r.clone()))
    }

    async fn list_all(&self) -> AppResult<Vec<Resource>> {
        let all: Vec<Resource> = self.resources.iter().map(|r| r.clone()).collect();
        Ok(self.sorted(all))
    }

    async fn list_available(&self) -> AppResult<Vec<Resource>> {
        let available: Vec<Resource> = self
            .resources
            .iter()
            .filter(|r| r.is_bookable())
            .map(|r| r.clone())
            .collect();
        Ok(self.sorted(available))
    }

    async fn count_available(&self) -> AppResult<u64> {
        Ok(self.resources.iter().filter(|r| r.is_bookable()).count() as u64)
    }

    async fn set_occupancy(&self, id: Uuid, occupancy: Occupancy) -> AppResult<()> {
        if let Some(mut r) = self.resources.get_mut(&id) {
            r.occupancy = occupancy;
        }
        Ok(())
    }

    async fn set_condition(&self, id: Uuid, condition: Condition) -> AppResult<()> {
        if let Some(mut r) = self.resources.get_mut(&id) {
            r.condition = condition;
        }
        Ok(())
    }

    async fn set_connectivity(&self, id: Uuid, connectivity: Connectivity) -> AppResult<()> {
        if let Some(mut r) = self.resources.get_mut(&id) {
            r.connectivity = connectivity;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.resources.remove(&id).is_some())
    }
}
