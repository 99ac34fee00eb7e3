//! Suspension policy configuration.

use serde::{Deserialize, Serialize};

/// Suspension policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspensionConfig {
    /// How many days a moderate violation suspends the requester.
    #[serde(default = "default_moderate_days")]
    pub moderate_suspension_days: i64,
}

impl Default for SuspensionConfig {
    fn default() -> Self {
        Self {
            moderate_suspension_days: default_moderate_days(),
        }
    }
}

fn default_moderate_days() -> i64 {
    3
}
