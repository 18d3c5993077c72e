//! `[suspend]` section configuration.
//!
//! The suppression window keeps the HUD quiet right after another transient
//! display used the same output channel, so the two do not fight over it.
//!
//! # Example
//!
//! ```toml
//! [suspend]
//! window-ms = 3000    # 0 disables suppression
//! ```

use serde::{Deserialize, Serialize};

/// Suppression window settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SuspendConfig {
    /// Milliseconds the HUD stays quiet after a suspension trigger.
    /// Signed so the `|now - t0|` comparison needs no casts.
    pub window_ms: i64,
}

impl Default for SuspendConfig {
    fn default() -> Self {
        Self { window_ms: 3000 }
    }
}
