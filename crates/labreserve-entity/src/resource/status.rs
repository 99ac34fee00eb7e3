//! The three orthogonal state axes of a resource.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Network reachability of a resource, driven by the liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_connectivity", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    /// The resource answers the liveness probe.
    Connected,
    /// The resource is offline.
    Disconnected,
}

/// Physical condition of a resource, set by staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_condition", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    /// In service.
    Active,
    /// Pulled for repair; not bookable.
    Repair,
}

/// Booking occupancy of a resource.
///
/// Mutated exclusively by the reservation ledger, the block allocator,
/// and the sweep; it always mirrors the ledger's current non-terminal
/// reservation for the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_occupancy", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Occupancy {
    /// No live reservation.
    Available,
    /// A pending reservation is waiting for approval.
    Queued,
    /// A confirmed session is running.
    Occupied,
}

impl Connectivity {
    /// The state as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }
}

impl Condition {
    /// The state as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Repair => "repair",
        }
    }
}

impl Occupancy {
    /// The state as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Queued => "queued",
            Self::Occupied => "occupied",
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
