//! PostgreSQL resource store.

use std::net::IpAddr;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use labreserve_core::error::{AppError, ErrorKind};
use labreserve_core::result::AppResult;
use labreserve_entity::resource::{Condition, Connectivity, Occupancy, Resource};

use crate::stores::ResourceStore;

/// Resource store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgResourceStore {
    pool: PgPool,
}

impl PgResourceStore {
    /// Create a new resource store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceStore for PgResourceStore {
    async fn insert(&self, resource: &Resource) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO resources (id, name, address, connectivity, condition, occupancy, sort_key, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(resource.id)
        .bind(&resource.name)
        .bind(resource.address)
        .bind(resource.connectivity)
        .bind(resource.condition)
        .bind(resource.occupancy)
        .bind(&resource.sort_key)
        .bind(resource.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                AppError::duplicate_resource(
                    "A resource with this name or address is already registered",
                )
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to insert resource", e)
            }
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Resource>> {
        sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find resource", e))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Resource>> {
        sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find resource by name", e)
            })
    }

    async fn find_by_address(&self, address: IpAddr) -> AppResult<Option<Resource>> {
        sqlx::query_as::<_, Resource>("SELECT * FROM resources WHERE address = $1")
            .bind(address)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find resource by address", e)
            })
    }

    async fn list_all(&self) -> AppResult<Vec<Resource>> {
        sqlx::query_as::<_, Resource>("SELECT * FROM resources ORDER BY sort_key, name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list resources", e))
    }

    async fn list_available(&self) -> AppResult<Vec<Resource>> {
        sqlx::query_as::<_, Resource>(
            "SELECT * FROM resources \
             WHERE connectivity = 'connected' AND condition = 'active' AND occupancy = 'available' \
             ORDER BY sort_key, name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list available resources", e)
        })
    }

    async fn count_available(&self) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM resources \
             WHERE connectivity = 'connected' AND condition = 'active' AND occupancy = 'available'",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count available resources", e)
        })?;
        Ok(count as u64)
    }

    async fn set_occupancy(&self, id: Uuid, occupancy: Occupancy) -> AppResult<()> {
        sqlx::query("UPDATE resources SET occupancy = $2 WHERE id = $1")
            .bind(id)
            .bind(occupancy)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to set resource occupancy", e)
            })?;
        Ok(())
    }

    async fn set_condition(&self, id: Uuid, condition: Condition) -> AppResult<()> {
        sqlx::query("UPDATE resources SET condition = $2 WHERE id = $1")
            .bind(id)
            .bind(condition)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to set resource condition", e)
            })?;
        Ok(())
    }

    async fn set_connectivity(&self, id: Uuid, connectivity: Connectivity) -> AppResult<()> {
        sqlx::query("UPDATE resources SET connectivity = $2 WHERE id = $1")
            .bind(id)
            .bind(connectivity)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to set resource connectivity", e)
            })?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete resource", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}
