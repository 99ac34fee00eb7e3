//! PostgreSQL violation store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use labreserve_core::error::{AppError, ErrorKind};
use labreserve_core::result::AppResult;
use labreserve_entity::violation::Violation;

use crate::stores::ViolationStore;

/// Violation store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgViolationStore {
    pool: PgPool,
}

impl PgViolationStore {
    /// Create a new violation store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ViolationStore for PgViolationStore {
    async fn insert(&self, violation: &Violation) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO violations (id, requester_id, resource_id, severity, reason, status, \
             resolved, suspension_end_at, slip_reviewed, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(violation.id)
        .bind(violation.requester_id)
        .bind(violation.resource_id)
        .bind(violation.severity)
        .bind(&violation.reason)
        .bind(violation.status)
        .bind(violation.resolved)
        .bind(violation.suspension_end_at)
        .bind(violation.slip_reviewed)
        .bind(violation.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert violation", e))?;
        Ok(())
    }

    async fn update(&self, violation: &Violation) -> AppResult<()> {
        sqlx::query(
            "UPDATE violations SET status = $2, resolved = $3, suspension_end_at = $4, \
             slip_reviewed = $5 WHERE id = $1",
        )
        .bind(violation.id)
        .bind(violation.status)
        .bind(violation.resolved)
        .bind(violation.suspension_end_at)
        .bind(violation.slip_reviewed)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update violation", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Violation>> {
        sqlx::query_as::<_, Violation>("SELECT * FROM violations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find violation", e))
    }

    async fn find_latest_unresolved(&self, requester_id: Uuid) -> AppResult<Option<Violation>> {
        sqlx::query_as::<_, Violation>(
            "SELECT * FROM violations \
             WHERE requester_id = $1 AND resolved = FALSE \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(requester_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find unresolved violation", e)
        })
    }

    async fn find_by_requester(&self, requester_id: Uuid) -> AppResult<Vec<Violation>> {
        sqlx::query_as::<_, Violation>(
            "SELECT * FROM violations WHERE requester_id = $1 ORDER BY created_at DESC",
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list requester violations", e)
        })
    }

    async fn find_auto_releasable(&self, now: DateTime<Utc>) -> AppResult<Vec<Violation>> {
        sqlx::query_as::<_, Violation>(
            "SELECT * FROM violations \
             WHERE severity = 'moderate' AND status = 'suspended' AND resolved = FALSE \
             AND suspension_end_at IS NOT NULL AND suspension_end_at <= $1",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find releasable suspensions", e)
        })
    }
}
