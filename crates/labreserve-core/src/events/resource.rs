//! Resource-related domain events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to bookable resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ResourceEvent {
    /// A resource's state changed (occupancy, condition, or connectivity).
    StatusChanged {
        /// The resource ID.
        resource_id: Uuid,
        /// The resource's display name.
        name: String,
        /// Occupancy after the change.
        occupancy: String,
        /// How many resources are currently available for booking, for
        /// dashboard counters.
        available_count: u64,
    },
    /// A resource was registered.
    Registered {
        /// The resource ID.
        resource_id: Uuid,
        /// The resource's display name.
        name: String,
    },
    /// A resource was removed from the registry.
    Removed {
        /// The resource ID.
        resource_id: Uuid,
        /// The resource's display name.
        name: String,
    },
}

impl ResourceEvent {
    /// The resource this event concerns.
    pub fn resource_id(&self) -> Uuid {
        match self {
            Self::StatusChanged { resource_id, .. }
            | Self::Registered { resource_id, .. }
            | Self::Removed { resource_id, .. } => *resource_id,
        }
    }
}
