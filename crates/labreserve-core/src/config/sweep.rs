//! Expiry and warning sweep configuration.

use serde::{Deserialize, Serialize};

/// Expiry and warning sweep configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Whether the periodic sweep is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between sweep ticks.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// How many minutes before expiry the warning is sent.
    #[serde(default = "default_warning_lead")]
    pub warning_lead_minutes: i64,
    /// Half-width (seconds) of the warning window. Absorbs the sweep's own
    /// polling granularity so each reservation is warned exactly once.
    #[serde(default = "default_warning_slack")]
    pub warning_slack_seconds: i64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            interval_seconds: default_interval(),
            warning_lead_minutes: default_warning_lead(),
            warning_slack_seconds: default_warning_slack(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    10
}

fn default_warning_lead() -> i64 {
    5
}

fn default_warning_slack() -> i64 {
    30
}
