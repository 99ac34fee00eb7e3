//! PostgreSQL block reservation store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use labreserve_core::error::{AppError, ErrorKind};
use labreserve_core::result::AppResult;
use labreserve_entity::block::BlockReservation;

use crate::stores::BlockStore;

/// Block reservation store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgBlockStore {
    pool: PgPool,
}

impl PgBlockStore {
    /// Create a new block reservation store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlockStore for PgBlockStore {
    async fn insert(&self, block: &BlockReservation) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO block_reservations (id, requester_id, college, course, block, \
             requested_count, window_start, window_end, notify_addresses, attachment, status, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(block.id)
        .bind(block.requester_id)
        .bind(&block.college)
        .bind(&block.course)
        .bind(&block.block)
        .bind(block.requested_count)
        .bind(block.window_start)
        .bind(block.window_end)
        .bind(&block.notify_addresses)
        .bind(&block.attachment)
        .bind(block.status)
        .bind(block.created_at)
        .bind(block.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert block reservation", e)
        })?;
        Ok(())
    }

    async fn update(&self, block: &BlockReservation) -> AppResult<()> {
        sqlx::query(
            "UPDATE block_reservations SET status = $2, window_start = $3, window_end = $4, \
             updated_at = $5 WHERE id = $1",
        )
        .bind(block.id)
        .bind(block.status)
        .bind(block.window_start)
        .bind(block.window_end)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update block reservation", e)
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<BlockReservation>> {
        sqlx::query_as::<_, BlockReservation>("SELECT * FROM block_reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find block reservation", e)
            })
    }

    async fn find_live_by_requester(
        &self,
        requester_id: Uuid,
    ) -> AppResult<Option<BlockReservation>> {
        sqlx::query_as::<_, BlockReservation>(
            "SELECT * FROM block_reservations \
             WHERE requester_id = $1 AND status IN ('pending', 'confirmed') \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(requester_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find live block reservation", e)
        })
    }
}
