//! In-memory block reservation store.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use labreserve_core::result::AppResult;
use labreserve_entity::block::BlockReservation;

use crate::stores::BlockStore;

/// Block reservation store backed by a `DashMap`.
#[derive(Debug, Default)]
pub struct MemoryBlockStore {
    blocks: DashMap<Uuid, BlockReservation>,
}

impl MemoryBlockStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlockStore for MemoryBlockStore {
    async fn insert(&self, block: &BlockReservation) -> AppResult<()> {
        self.blocks.insert(block.id, block.clone());
        Ok(())
    }

    async fn update(&self, block: &BlockReservation) -> AppResult<()> {
        let mut updated = block.clone();
        updated.updated_at = Utc::now();
        self.blocks.insert(updated.id, updated);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BlockReservation>> {
        Ok(self.blocks.get(&id).map(|b| b.clone()))
    }

    async fn find_live_by_requester(
        &self,
        requester_id: Uuid,
    ) -> AppResult<Option<BlockReservation>> {
        let mut live: Vec<BlockReservation> = self
            .blocks
            .iter()
            .filter(|b| b.requester_id == requester_id && b.status.is_live())
            .map(|b| b.clone())
            .collect();
        live.sort_by_key(|b| b.created_at);
        Ok(live.pop())
    }
}
