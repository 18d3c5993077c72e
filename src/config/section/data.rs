//! `[data]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [data]
//! dir = "data"    # Per-user settings live in <dir>/users/
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persistence paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DataConfig {
    /// Root directory for persisted state.
    pub dir: PathBuf,
}

impl DataConfig {
    /// Directory holding one settings document per user.
    pub fn users_dir(&self) -> PathBuf {
        self.dir.join("users")
    }

    /// The legacy bulk settings document, all users in one file.
    pub fn legacy_doc(&self) -> PathBuf {
        self.dir.join("users.toml")
    }

    /// Where the legacy document is renamed after migration.
    pub fn legacy_marker(&self) -> PathBuf {
        self.dir.join("users.toml.migrated")
    }

    /// The settings document for one user.
    pub fn user_doc(&self, user: &str) -> PathBuf {
        self.users_dir().join(format!("{user}.toml"))
    }

    /// Resolve `dir` relative to the config file's directory.
    pub fn anchored(&self, config_path: &Path) -> PathBuf {
        match config_path.parent() {
            Some(parent) if !self.dir.is_absolute() && !parent.as_os_str().is_empty() => {
                parent.join(&self.dir)
            }
            _ => self.dir.clone(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_data_config_paths() {
        let config = test_parse_config("[data]\ndir = \"state\"");
        assert_eq!(config.data.dir, PathBuf::from("state"));
        assert_eq!(config.data.users_dir(), PathBuf::from("state/users"));
        assert_eq!(config.data.user_doc("alice"), PathBuf::from("state/users/alice.toml"));
        assert_eq!(config.data.legacy_doc(), PathBuf::from("state/users.toml"));
        assert_eq!(
            config.data.legacy_marker(),
            PathBuf::from("state/users.toml.migrated")
        );
    }

    #[test]
    fn test_data_config_anchored() {
        let data = DataConfig::default();
        assert_eq!(
            data.anchored(Path::new("/site/hudline.toml")),
            PathBuf::from("/site/data")
        );
        // Relative config path with no parent keeps the dir as-is.
        assert_eq!(data.anchored(Path::new("hudline.toml")), PathBuf::from("data"));

        let absolute = DataConfig {
            dir: PathBuf::from("/var/lib/hudline"),
        };
        assert_eq!(
            absolute.anchored(Path::new("/site/hudline.toml")),
            PathBuf::from("/var/lib/hudline")
        );
    }
}
