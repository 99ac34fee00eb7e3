//! Violation and suspension domain events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to violations and suspensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ViolationEvent {
    /// A violation was recorded against a requester.
    Recorded {
        /// The violation ID.
        violation_id: Uuid,
        /// The sanctioned requester.
        requester_id: Uuid,
        /// The resource involved, if any.
        resource_id: Option<Uuid>,
        /// Severity as a lowercase string.
        severity: String,
        /// When a timed suspension lifts, if applicable.
        suspension_end_at: Option<DateTime<Utc>>,
    },
    /// A suspension was lifted and the requester reinstated.
    Reinstated {
        /// The violation ID.
        violation_id: Uuid,
        /// The reinstated requester.
        requester_id: Uuid,
        /// Severity as a lowercase string.
        severity: String,
    },
}

impl ViolationEvent {
    /// The requester this event concerns.
    pub fn requester_id(&self) -> Uuid {
        match self {
            Self::Recorded { requester_id, .. } | Self::Reinstated { requester_id, .. } => {
                *requester_id
            }
        }
    }

    /// The resource this event concerns, if any.
    pub fn resource_id(&self) -> Option<Uuid> {
        match self {
            Self::Recorded { resource_id, .. } => *resource_id,
            Self::Reinstated { .. } => None,
        }
    }
}
