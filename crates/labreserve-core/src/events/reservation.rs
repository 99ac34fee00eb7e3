//! Reservation-related domain events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to reservations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReservationEvent {
    /// A reservation was created and is waiting for approval.
    Requested {
        /// The reservation ID.
        reservation_id: Uuid,
        /// The resource being reserved.
        resource_id: Uuid,
        /// The requester.
        requester_id: Uuid,
        /// Requested session length in minutes.
        requested_minutes: i64,
    },
    /// A pending reservation was approved and the session started.
    Approved {
        /// The reservation ID.
        reservation_id: Uuid,
        /// The resource being reserved.
        resource_id: Uuid,
        /// The requester.
        requester_id: Uuid,
        /// When the session ends.
        end_time: DateTime<Utc>,
    },
    /// A pending reservation was declined.
    Declined {
        /// The reservation ID.
        reservation_id: Uuid,
        /// The resource being reserved.
        resource_id: Uuid,
        /// The requester.
        requester_id: Uuid,
    },
    /// A confirmed session ended (early end or expiry).
    Completed {
        /// The reservation ID.
        reservation_id: Uuid,
        /// The resource being reserved.
        resource_id: Uuid,
        /// The requester.
        requester_id: Uuid,
    },
    /// A confirmed session is about to expire.
    EndingSoon {
        /// The reservation ID.
        reservation_id: Uuid,
        /// The resource being reserved.
        resource_id: Uuid,
        /// The requester.
        requester_id: Uuid,
        /// Whole minutes remaining, clamped to at least 1.
        minutes_left: i64,
        /// When the session ends.
        end_time: DateTime<Utc>,
    },
}

impl ReservationEvent {
    /// The reservation this event concerns.
    pub fn reservation_id(&self) -> Uuid {
        match self {
            Self::Requested { reservation_id, .. }
            | Self::Approved { reservation_id, .. }
            | Self::Declined { reservation_id, .. }
            | Self::Completed { reservation_id, .. }
            | Self::EndingSoon { reservation_id, .. } => *reservation_id,
        }
    }

    /// The resource this event concerns.
    pub fn resource_id(&self) -> Uuid {
        match self {
            Self::Requested { resource_id, .. }
            | Self::Approved { resource_id, .. }
            | Self::Declined { resource_id, .. }
            | Self::Completed { resource_id, .. }
            | Self::EndingSoon { resource_id, .. } => *resource_id,
        }
    }

    /// The requester this event concerns.
    pub fn requester_id(&self) -> Uuid {
        match self {
            Self::Requested { requester_id, .. }
            | Self::Approved { requester_id, .. }
            | Self::Declined { requester_id, .. }
            | Self::Completed { requester_id, .. }
            | Self::EndingSoon { requester_id, .. } => *requester_id,
        }
    }
}
