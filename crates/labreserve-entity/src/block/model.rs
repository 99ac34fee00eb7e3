//! Block reservation entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle status of a block reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "block_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BlockStatus {
    /// Submitted, waiting for staff approval. Initial state.
    Pending,
    /// Approved; child reservations exist.
    Confirmed,
    /// Declined or withdrawn. Terminal.
    Cancelled,
}

impl BlockStatus {
    /// Whether the block still counts against the one-active-block rule.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// The status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// The group a block reservation is made for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockGroup {
    /// College the group belongs to.
    pub college: String,
    /// Course code or title.
    pub course: String,
    /// Section/block identifier within the course.
    pub block: String,
}

/// A bulk request claiming multiple resources at once for a group.
///
/// No resources are held while the block is pending; claiming happens
/// atomically at approval, which also spawns one confirmed child
/// reservation per claimed resource.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BlockReservation {
    /// Unique block reservation identifier.
    pub id: Uuid,
    /// The faculty requester.
    pub requester_id: Uuid,
    /// College the group belongs to.
    pub college: String,
    /// Course code or title.
    pub course: String,
    /// Section/block identifier within the course.
    pub block: String,
    /// Number of resources to claim.
    pub requested_count: i32,
    /// Scheduled window start, if given.
    pub window_start: Option<DateTime<Utc>>,
    /// Scheduled window end, if given.
    pub window_end: Option<DateTime<Utc>>,
    /// Addresses to notify with the access proof on approval.
    pub notify_addresses: Vec<String>,
    /// Opaque reference to an uploaded supporting document, if any.
    pub attachment: Option<String>,
    /// Lifecycle status.
    pub status: BlockStatus,
    /// When the block was submitted.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl BlockReservation {
    /// Create a new pending block reservation.
    pub fn new(
        requester_id: Uuid,
        group: BlockGroup,
        requested_count: i32,
        window_start: Option<DateTime<Utc>>,
        window_end: Option<DateTime<Utc>>,
        notify_addresses: Vec<String>,
        attachment: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            requester_id,
            college: group.college,
            course: group.course,
            block: group.block,
            requested_count,
            window_start,
            window_end,
            notify_addresses,
            attachment,
            status: BlockStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Session length in minutes for child reservations: the window span
    /// when both ends are given, otherwise the supplied default.
    pub fn session_minutes(&self, default_minutes: i64) -> i64 {
        match (self.window_start, self.window_end) {
            (Some(start), Some(end)) if end > start => (end - start).num_minutes(),
            _ => default_minutes,
        }
    }

    /// The access URL for the whole block, presented by group members at
    /// the lab.
    pub fn access_url(&self, base: &str) -> String {
        format!("{}/blocks/{}/access", base.trim_end_matches('/'), self.id)
    }
}
