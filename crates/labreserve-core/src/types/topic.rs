//! Notification bus topics.
//!
//! Topics are addressed by name on the wire; this enum keeps the four
//! topic families typed inside the application so call sites cannot
//! mistype a channel name.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A notification bus topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    /// Session warnings and status pushes for whoever is viewing or
    /// occupying one resource.
    Resource(Uuid),
    /// Booking approved/declined/reinstated events for one requester.
    Requester(Uuid),
    /// Every resource-status change, for any dashboard.
    ResourceStatusBroadcast,
    /// Out-of-band operational events for staff.
    StaffAlerts,
}

impl Topic {
    /// The topic's wire name, e.g. `resource:<id>` or `staff:alerts`.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resource(id) => write!(f, "resource:{id}"),
            Self::Requester(id) => write!(f, "requester:{id}"),
            Self::ResourceStatusBroadcast => write!(f, "broadcast:resource-status"),
            Self::StaffAlerts => write!(f, "staff:alerts"),
        }
    }
}
