//! Resource entity model.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::{Condition, Connectivity, Occupancy};

/// A bookable physical resource (a lab PC).
///
/// The three state axes are independent: a resource may be connected but
/// under repair, or active but disconnected. Only the conjunction
/// connected + active + available makes it bookable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: Uuid,
    /// Unique display name, e.g. `PC07`.
    pub name: String,
    /// Network address, unique across the registry.
    pub address: IpAddr,
    /// Network reachability.
    pub connectivity: Connectivity,
    /// Physical condition.
    pub condition: Condition,
    /// Booking occupancy.
    pub occupancy: Occupancy,
    /// Stable display-order key derived from the numeric suffix of the
    /// name at registration time.
    pub sort_key: String,
    /// When the resource was registered.
    pub created_at: DateTime<Utc>,
}

impl Resource {
    /// Create a new resource in its initial state (connected, active,
    /// available). The sort key is derived from the name.
    pub fn new(name: impl Into<String>, address: IpAddr) -> Self {
        let name = name.into();
        let sort_key = sort_key_for(&name);
        Self {
            id: Uuid::new_v4(),
            name,
            address,
            connectivity: Connectivity::Connected,
            condition: Condition::Active,
            occupancy: Occupancy::Available,
            sort_key,
            created_at: Utc::now(),
        }
    }

    /// Whether the resource can accept a new reservation right now.
    pub fn is_bookable(&self) -> bool {
        self.connectivity == Connectivity::Connected
            && self.condition == Condition::Active
            && self.occupancy == Occupancy::Available
    }
}

/// Derive the stable display-order key for a resource name: the first
/// integer substring zero-padded to 3 digits, so `PC07` sorts before
/// `PC012`. Names without digits sort last.
pub fn sort_key_for(name: &str) -> String {
    let digits: String = name
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        "999".to_string()
    } else {
        format!("{digits:0>3}")
    }
}
