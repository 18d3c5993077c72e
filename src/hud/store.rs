//! Per-user settings persistence.
//!
//! One flat TOML document per user at `<data>/users/<user>.toml`, holding
//! only overrides. A user with no overrides has no file; saving such a user
//! removes any stale one. I/O failures are never fatal to a session: loads
//! fall back to defaults, failed saves leave the previous document in place,
//! both with a logged warning.
//!
//! Older deployments kept every user in one `<data>/users.toml`. That
//! document is split into per-user files once, on service start, then
//! renamed to `users.toml.migrated` so the data survives but the migration
//! never reruns.

use crate::config::DataConfig;
use crate::log;
use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::session::SessionState;

/// Reads and writes user settings documents under a fixed root.
pub struct Store {
    data: DataConfig,
}

impl Store {
    /// `root` is the resolved data directory, fixed for the process
    /// lifetime.
    pub fn new(root: PathBuf) -> Self {
        Self {
            data: DataConfig { dir: root },
        }
    }

    /// Apply a user's persisted overrides to a fresh session. A missing
    /// document means no overrides; an unreadable or malformed one warns
    /// and leaves the session on defaults.
    pub fn load(&self, session: &mut SessionState) {
        let path = self.data.user_doc(session.user());
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return,
            Err(err) => {
                log!("warning"; "could not read {}: {err}", path.display());
                return;
            }
        };
        match content.parse::<toml::Table>() {
            Ok(doc) => session.load_doc(&doc),
            Err(err) => {
                log!("warning"; "ignoring malformed settings for {}: {err}", session.user());
            }
        }
    }

    /// Persist a session's overrides. All-default sessions are elided: an
    /// existing document is removed instead.
    pub fn save(&self, session: &SessionState) {
        let path = self.data.user_doc(session.user());
        let doc = session.save_doc();

        if doc.is_empty() {
            if path.exists()
                && let Err(err) = fs::remove_file(&path)
            {
                log!("warning"; "could not remove {}: {err}", path.display());
            }
            return;
        }

        if let Err(err) = write_doc(&path, &doc) {
            log!("warning"; "could not save settings for {}: {err:#}", session.user());
        }
    }

    /// One-time split of the legacy bulk document into per-user files.
    pub fn migrate_legacy(&self) {
        let legacy = self.data.legacy_doc();
        if !legacy.exists() {
            return;
        }

        match self.split_legacy(&legacy) {
            Ok(count) => match fs::rename(&legacy, self.data.legacy_marker()) {
                Ok(()) => log!("hud"; "migrated {count} users from {}", legacy.display()),
                Err(err) => {
                    log!("warning"; "could not rename migrated {}: {err}", legacy.display());
                }
            },
            Err(err) => log!("warning"; "skipping legacy migration: {err:#}"),
        }
    }

    fn split_legacy(&self, legacy: &Path) -> Result<usize> {
        let content = fs::read_to_string(legacy)?;
        let doc: toml::Table = content.parse()?;

        let mut migrated = 0;
        for (user, value) in &doc {
            let Some(table) = value.as_table() else {
                log!("warning"; "skipping non-table entry '{user}' in {}", legacy.display());
                continue;
            };
            let path = self.data.user_doc(user);
            // An existing per-user document is newer than the legacy copy.
            if path.exists() {
                continue;
            }
            write_doc(&path, table)?;
            migrated += 1;
        }
        Ok(migrated)
    }
}

fn write_doc(path: &Path, doc: &toml::Table) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(doc)?)?;
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
