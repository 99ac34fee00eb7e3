//! Notification bus configuration.

use serde::{Deserialize, Serialize};

/// Notification bus configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusConfig {
    /// Per-topic broadcast buffer size. A slow subscriber that falls more
    /// than this many messages behind starts missing events (at-most-once
    /// delivery; state is always re-pollable).
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_buffer_size() -> usize {
    256
}
