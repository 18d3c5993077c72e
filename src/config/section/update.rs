//! `[update]` section configuration.
//!
//! Controls the refresh cycle cadence and the formatting-phase execution
//! policy.
//!
//! # Example
//!
//! ```toml
//! [update]
//! period-ms = 1000      # Refresh cycle period
//! policy = "parallel"   # "sequential" | "parallel"
//! timeout-ms = 50       # Deadline for the parallel formatting phase
//! workers = 0           # Worker pool size; 0 = sized from session count
//! ```

use crate::log;
use serde::{Deserialize, Deserializer, Serialize};

/// Where the formatting phase runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdatePolicy {
    /// Every session formats on the authoritative thread, one after another.
    Sequential,
    /// One task per session on a bounded worker pool, awaited up to
    /// `timeout-ms`.
    Parallel,
}

impl<'de> Deserialize<'de> for UpdatePolicy {
    /// Unknown values fall back to `sequential` with a warning instead of
    /// failing the whole config load.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(match value.to_ascii_lowercase().as_str() {
            "sequential" => Self::Sequential,
            "parallel" => Self::Parallel,
            other => {
                log!("warning"; "unknown update.policy '{other}', using 'sequential'");
                Self::Sequential
            }
        })
    }
}

/// Refresh cycle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UpdateConfig {
    /// Milliseconds between refresh cycles.
    pub period_ms: u64,

    /// Formatting-phase execution policy.
    pub policy: UpdatePolicy,

    /// Deadline in milliseconds for the parallel formatting phase. Sessions
    /// that miss it are skipped for the cycle, never retried.
    pub timeout_ms: u64,

    /// Worker pool size for the parallel policy. `0` sizes the pool from the
    /// session count (capped at 8).
    pub workers: usize,
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            period_ms: 1000,
            policy: UpdatePolicy::Parallel,
            timeout_ms: 50,
            workers: 0,
        }
    }
}
