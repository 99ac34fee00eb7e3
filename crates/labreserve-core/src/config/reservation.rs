//! Reservation ledger configuration.

use serde::{Deserialize, Serialize};

/// Reservation ledger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationConfig {
    /// Base URL embedded in reservation access tokens.
    #[serde(default = "default_access_url_base")]
    pub access_url_base: String,
    /// Session length (minutes) for block reservations with an open-ended window.
    #[serde(default = "default_block_duration")]
    pub default_block_duration_minutes: i64,
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            access_url_base: default_access_url_base(),
            default_block_duration_minutes: default_block_duration(),
        }
    }
}

fn default_access_url_base() -> String {
    "https://labreserve.local".to_string()
}

fn default_block_duration() -> i64 {
    120
}
