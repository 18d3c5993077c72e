//! `[time]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [time]
//! epoch-offset-ticks = 6000   # Tick 0 displays as 06:00
//! ```

use serde::{Deserialize, Serialize};

/// World-clock display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TimeConfig {
    /// Ticks added to the raw world clock before deriving clock fields.
    /// The day/night indicator ignores this; it follows the raw tick.
    pub epoch_offset_ticks: i64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            epoch_offset_ticks: 6000,
        }
    }
}
