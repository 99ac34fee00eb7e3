//! PostgreSQL reservation store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use labreserve_core::error::{AppError, ErrorKind};
use labreserve_core::result::AppResult;
use labreserve_entity::reservation::Reservation;

use crate::stores::ReservationStore;

/// Reservation store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgReservationStore {
    pool: PgPool,
}

impl PgReservationStore {
    /// Create a new reservation store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for PgReservationStore {
    async fn insert(&self, reservation: &Reservation) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO reservations (id, resource_id, requester_id, status, requested_minutes, \
             start_time, end_time, expired_at, warned_at, block_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(reservation.id)
        .bind(reservation.resource_id)
        .bind(reservation.requester_id)
        .bind(reservation.status)
        .bind(reservation.requested_minutes)
        .bind(reservation.start_time)
        .bind(reservation.end_time)
        .bind(reservation.expired_at)
        .bind(reservation.warned_at)
        .bind(reservation.block_id)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert reservation", e)
        })?;
        Ok(())
    }

    async fn update(&self, reservation: &Reservation) -> AppResult<()> {
        sqlx::query(
            "UPDATE reservations SET status = $2, start_time = $3, end_time = $4, \
             expired_at = $5, warned_at = $6, updated_at = $7 WHERE id = $1",
        )
        .bind(reservation.id)
        .bind(reservation.status)
        .bind(reservation.start_time)
        .bind(reservation.end_time)
        .bind(reservation.expired_at)
        .bind(reservation.warned_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update reservation", e)
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find reservation", e)
            })
    }

    async fn find_live_by_resource(&self, resource_id: Uuid) -> AppResult<Option<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations \
             WHERE resource_id = $1 AND status IN ('pending', 'confirmed')",
        )
        .bind(resource_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find live reservation", e)
        })
    }

    async fn find_live_by_requester(&self, requester_id: Uuid) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations \
             WHERE requester_id = $1 AND status IN ('pending', 'confirmed') \
             ORDER BY created_at DESC",
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find requester reservations", e)
        })
    }

    async fn find_due_for_expiry(&self, now: DateTime<Utc>) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations \
             WHERE status = 'confirmed' AND end_time <= $1 AND expired_at IS NULL",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find expired reservations", e)
        })
    }

    async fn find_in_warning_window(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations \
             WHERE status = 'confirmed' AND end_time >= $1 AND end_time <= $2 \
             AND warned_at IS NULL AND expired_at IS NULL",
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find reservations to warn", e)
        })
    }

    async fn find_by_block(&self, block_id: Uuid) -> AppResult<Vec<Reservation>> {
        sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE block_id = $1 ORDER BY created_at",
        )
        .bind(block_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find block children", e)
        })
    }
}
