//! Block-reservation domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to block (bulk) reservations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BlockEvent {
    /// A block reservation was submitted and is waiting for approval.
    Requested {
        /// The block reservation ID.
        block_id: Uuid,
        /// The requester.
        requester_id: Uuid,
        /// Number of resources requested.
        requested_count: u32,
    },
    /// A block reservation was approved and its resources claimed.
    Approved {
        /// The block reservation ID.
        block_id: Uuid,
        /// The requester.
        requester_id: Uuid,
        /// Display names of the claimed resources.
        resource_names: Vec<String>,
        /// Access URL for the group to present at the lab.
        access_url: String,
    },
    /// A block reservation was declined.
    Declined {
        /// The block reservation ID.
        block_id: Uuid,
        /// The requester.
        requester_id: Uuid,
    },
}

impl BlockEvent {
    /// The requester this event concerns.
    pub fn requester_id(&self) -> Uuid {
        match self {
            Self::Requested { requester_id, .. }
            | Self::Approved { requester_id, .. }
            | Self::Declined { requester_id, .. } => *requester_id,
        }
    }
}
