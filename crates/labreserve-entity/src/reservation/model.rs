//! Reservation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::ReservationStatus;

/// One booking request/grant for a single resource by one requester.
///
/// Created in `Pending`; `start_time`/`end_time` are only set when the
/// reservation is confirmed. `expired_at` and `warned_at` are write-once
/// markers so the sweep never double-processes a row, regardless of
/// process topology.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    /// Unique reservation identifier. Doubles as the unguessable access
    /// token embedded in the reservation's access URL.
    pub id: Uuid,
    /// The reserved resource.
    pub resource_id: Uuid,
    /// The requester who owns the reservation.
    pub requester_id: Uuid,
    /// Lifecycle status.
    pub status: ReservationStatus,
    /// Requested session length in minutes.
    pub requested_minutes: i64,
    /// Session start; set on confirmation.
    pub start_time: Option<DateTime<Utc>>,
    /// Session end (`start_time + requested_minutes`); set on confirmation.
    pub end_time: Option<DateTime<Utc>>,
    /// When the expiry pass completed this reservation. Set once.
    pub expired_at: Option<DateTime<Utc>>,
    /// When the ending-soon warning was published. Set once.
    pub warned_at: Option<DateTime<Utc>>,
    /// Parent block reservation, for children spawned by a block approval.
    pub block_id: Option<Uuid>,
    /// When the reservation was created.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Create a new pending reservation.
    pub fn new(resource_id: Uuid, requester_id: Uuid, requested_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            resource_id,
            requester_id,
            status: ReservationStatus::Pending,
            requested_minutes,
            start_time: None,
            end_time: None,
            expired_at: None,
            warned_at: None,
            block_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the reservation still occupies its resource.
    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }

    /// Whether a confirmed session has run past its end time.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == ReservationStatus::Confirmed
            && self.end_time.is_some_and(|end| end <= now)
    }

    /// Whole minutes until `end_time`, clamped to at least 1. `None` when
    /// no end time is set.
    pub fn minutes_left(&self, now: DateTime<Utc>) -> Option<i64> {
        self.end_time
            .map(|end| ((end - now).num_seconds() as f64 / 60.0).round() as i64)
            .map(|m| m.max(1))
    }

    /// The scannable access URL for this reservation. Presenting it at
    /// the resource confirms the reservation without staff involvement;
    /// the v4 id's unguessability is the authorization.
    pub fn access_url(&self, base: &str) -> String {
        format!("{}/reservations/{}/access", base.trim_end_matches('/'), self.id)
    }
}
