//! Configuration management for `hudline.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── update     # [update]
//! │   ├── suspend    # [suspend]
//! │   ├── defaults   # [defaults]
//! │   ├── time       # [time]
//! │   └── data       # [data]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError
//! │   └── handle     # Global config handle
//! └── mod.rs         # HudConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section         | Purpose                                          |
//! |-----------------|--------------------------------------------------|
//! | `[update]`      | Cycle period, formatting policy, timeout, pool   |
//! | `[suspend]`     | Suppression window                               |
//! | `[defaults]`    | Live defaults for unset per-user settings        |
//! | `[time]`        | World-clock epoch offset                         |
//! | `[data]`        | Persistence root                                 |
//! | `[biome-names]` | Biome label → display text overrides             |
//!
//! Every key is optional; a missing `hudline.toml` runs on built-in
//! defaults. Unknown keys warn and are ignored. The loaded config lives
//! behind the `arc-swap` handle in [`types`], re-read by the refresh loop at
//! cycle boundaries.

pub mod section;
pub mod types;

// Re-export from section/
pub use section::{
    DEFAULT_BIOME_FORMAT, DEFAULT_CHUNK_FORMAT, DEFAULT_COMPASS_FORMAT, DEFAULT_COORDS_FORMAT,
    DEFAULT_HUD_FORMAT, DEFAULT_LIGHT_FORMAT, DEFAULT_TIME_FORMAT, DataConfig, DefaultsConfig,
    SuspendConfig, TimeConfig, UpdateConfig, UpdatePolicy,
};

// Re-export from types/
pub use types::{ConfigError, cfg, init_config, reload_config};

use crate::cli::Cli;
use crate::{debug, log};
use anyhow::{Context, Result};
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing hudline.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HudConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Refresh cycle settings
    #[serde(default)]
    pub update: UpdateConfig,

    /// Suppression window settings
    #[serde(default)]
    pub suspend: SuspendConfig,

    /// Live defaults for per-user settings
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// World-clock display settings
    #[serde(default)]
    pub time: TimeConfig,

    /// Persistence paths
    #[serde(default)]
    pub data: DataConfig,

    /// Biome label → display text overrides
    #[serde(default, rename = "biome-names")]
    pub biome_names: FxHashMap<String, String>,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            update: UpdateConfig::default(),
            suspend: SuspendConfig::default(),
            defaults: DefaultsConfig::default(),
            time: TimeConfig::default(),
            data: DataConfig::default(),
            biome_names: FxHashMap::default(),
        }
    }
}

impl HudConfig {
    /// Load configuration from CLI arguments.
    ///
    /// For non-init commands, searches upward from cwd to find the config
    /// file; a missing file is not an error, the built-in defaults apply.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        let mut config = if exists && !cli.is_init() {
            Self::from_path(&config_path)?
        } else {
            if !cli.is_init() {
                debug!("config"; "no {} found, using built-in defaults", cli.config.display());
            }
            Self::default()
        };

        config.config_path = config_path;
        Ok(config)
    }

    /// Resolve config file path based on command.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        if cli.is_init() {
            let path = cwd.join(&cli.config);
            let exists = path.exists();
            return Ok((path, exists));
        }

        // Search upward from cwd
        match find_config_file(&cli.config) {
            Some(path) => Ok((path, true)),
            None => Ok((cwd.join(&cli.config), false)),
        }
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_content(&content, path)
    }

    /// Parse, warn about unknown fields, sanitize, and validate.
    ///
    /// Also the reload path: the caller keeps its previous config when this
    /// returns an error.
    pub fn from_content(content: &str, origin: &Path) -> Result<Self> {
        let (mut config, ignored) = Self::parse_with_ignored(content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, origin);
        }

        config.sanitize_biome_names();
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        // Show only the filename since the config sits at the project root
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Drop `[biome-names]` keys that are not valid biome labels, warning
    /// for each. Keys are matched case-insensitively by lowercasing.
    fn sanitize_biome_names(&mut self) {
        static LABEL_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"^[a-z0-9_]+$").unwrap());

        let entries = std::mem::take(&mut self.biome_names);
        for (key, value) in entries {
            let label = key.to_ascii_lowercase();
            if LABEL_RE.is_match(&label) {
                self.biome_names.insert(label, value);
            } else {
                log!("warning"; "ignoring invalid biome label in [biome-names]: '{key}'");
            }
        }
    }

    /// Range checks on loaded values.
    fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if self.update.period_ms == 0 {
            problems.push("update.period-ms must be at least 1".to_string());
        }
        if self.update.timeout_ms == 0 {
            problems.push("update.timeout-ms must be at least 1".to_string());
        }
        if self.update.workers > 512 {
            problems.push(format!(
                "update.workers must be at most 512, got {}",
                self.update.workers
            ));
        }
        if self.suspend.window_ms < 0 {
            problems.push(format!(
                "suspend.window-ms must not be negative, got {}",
                self.suspend.window_ms
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems.join("; ")))
        }
    }

    /// The persistence root, anchored to the config file's directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data.anchored(&self.config_path)
    }

    /// Display text for a biome label: the `[biome-names]` override if one
    /// exists, else the prettified label.
    pub fn biome_display(&self, label: &str) -> String {
        match self.biome_names.get(label) {
            Some(name) => name.clone(),
            None => crate::world::pretty_biome(label),
        }
    }
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding
/// `config_name`. Returns the absolute path to the config file if found.
fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;

    // An absolute path is used as-is
    if config_name.is_absolute() && config_name.exists() {
        return Some(config_name.to_path_buf());
    }

    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from TOML content.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> HudConfig {
    let (mut parsed, ignored) = HudConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed.sanitize_biome_names();
    parsed.validate().unwrap();
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_content_invalid_toml() {
        // Invalid TOML syntax - unclosed bracket
        let result = HudConfig::from_content("[update\nperiod-ms = 10", Path::new("hudline.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config() {
        let config = HudConfig::default();

        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.update.period_ms, 1000);
        assert_eq!(config.suspend.window_ms, 3000);
        assert_eq!(config.time.epoch_offset_ticks, 6000);
        assert!(config.biome_names.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (_, ignored) =
            HudConfig::parse_with_ignored("[update]\nperiode-ms = 10\n[suspend]\nwindow-ms = 1")
                .unwrap();
        assert_eq!(ignored, vec!["update.periode-ms".to_string()]);
    }

    #[test]
    fn test_biome_names_sanitized() {
        let config = test_parse_config(
            "[biome-names]\nDEEP_DARK = \"The Deep Dark\"\nplains = \"Flatlands\"",
        );
        // Keys are lowercased on the way in.
        assert_eq!(
            config.biome_names.get("deep_dark").map(String::as_str),
            Some("The Deep Dark")
        );
        assert_eq!(
            config.biome_names.get("plains").map(String::as_str),
            Some("Flatlands")
        );
    }

    #[test]
    fn test_biome_names_invalid_key_skipped() {
        let mut config = HudConfig::default();
        config
            .biome_names
            .insert("not a label!".to_string(), "x".to_string());
        config
            .biome_names
            .insert("ocean".to_string(), "The Big Blue".to_string());
        config.sanitize_biome_names();

        assert_eq!(config.biome_names.len(), 1);
        assert_eq!(
            config.biome_names.get("ocean").map(String::as_str),
            Some("The Big Blue")
        );
    }

    #[test]
    fn test_biome_display_falls_back_to_pretty() {
        let config = test_parse_config("[biome-names]\nplains = \"Flatlands\"");
        assert_eq!(config.biome_display("plains"), "Flatlands");
        assert_eq!(config.biome_display("windswept_hills"), "windswept hills");
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut config = HudConfig::default();
        config.update.period_ms = 0;
        assert!(config.validate().is_err());

        let mut config = HudConfig::default();
        config.update.workers = 4096;
        assert!(config.validate().is_err());

        let mut config = HudConfig::default();
        config.suspend.window_ms = -5;
        assert!(config.validate().is_err());
    }
}
