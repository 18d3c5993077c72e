//! Global config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement. The
//! refresh loop polls [`reload_config`] once per cycle, so edits to
//! `hudline.toml` take effect at the next cycle boundary with no watcher
//! thread. Unset per-user settings read their defaults through [`cfg`] at
//! lookup time, which is what makes a reload reach every session at once.

use crate::config::HudConfig;
use anyhow::Result;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<HudConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(HudConfig::default()));

/// Global hash of the current config file content.
static CONFIG_HASH: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

#[inline]
pub fn cfg() -> Arc<HudConfig> {
    CONFIG.load_full()
}

/// Reload config from disk if content changed.
///
/// Returns `Ok(true)` if config was updated, `Ok(false)` if unchanged or if
/// no config file exists. A file that fails to parse or validate returns the
/// error and leaves the current config in place.
pub fn reload_config() -> Result<bool> {
    use std::fs;
    use std::sync::atomic::Ordering;

    let current = cfg();
    if current.config_path.as_os_str().is_empty() || !current.config_path.exists() {
        return Ok(false);
    }

    let content = fs::read_to_string(&current.config_path)?;
    let new_hash = crate::utils::hash::compute(content.as_bytes());

    let old_hash = CONFIG_HASH.load(Ordering::Relaxed);
    if new_hash == old_hash {
        return Ok(false);
    }

    let mut new_config = HudConfig::from_content(&content, &current.config_path)?;
    new_config.config_path = current.config_path.clone();
    CONFIG.store(Arc::new(new_config));
    CONFIG_HASH.store(new_hash, Ordering::Relaxed);

    Ok(true)
}

#[inline]
pub fn init_config(config: HudConfig) -> Arc<HudConfig> {
    use std::fs;
    use std::sync::atomic::Ordering;

    if config.config_path.exists()
        && let Ok(content) = fs::read_to_string(&config.config_path)
    {
        let hash = crate::utils::hash::compute(content.as_bytes());
        CONFIG_HASH.store(hash, Ordering::Relaxed);
    }

    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cfg_returns_stored_config() {
        let mut config = HudConfig::default();
        config.update.period_ms = 777;
        init_config(config);

        assert_eq!(cfg().update.period_ms, 777);

        // Restore defaults for other tests sharing the global.
        init_config(HudConfig::default());
    }
}
