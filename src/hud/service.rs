//! Session registry.
//!
//! The service owns the map from user name to live session and the store
//! behind it. Sessions are created on attach (persisted overrides applied),
//! persisted on detach, and swept once more by [`Service::persist_all`] on
//! shutdown. Handles are `Arc<Mutex<SessionState>>` so a formatting task and
//! the registry can hold the same session; within a cycle each session is
//! touched by exactly one task, so the mutex is uncontended by construction.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::debug;
use crate::log;

use super::session::SessionState;
use super::store::Store;

pub type SessionHandle = Arc<Mutex<SessionState>>;

pub struct Service {
    sessions: Mutex<FxHashMap<String, SessionHandle>>,
    store: Store,
}

impl Service {
    /// Create the service over a resolved data directory. Runs the legacy
    /// document migration before any session can load.
    pub fn new(data_root: PathBuf) -> Self {
        let store = Store::new(data_root);
        store.migrate_legacy();
        Self {
            sessions: Mutex::new(FxHashMap::default()),
            store,
        }
    }

    /// Attach a user, creating their session from persisted overrides.
    /// Attaching an already-attached user returns the existing session.
    pub fn attach(&self, user: &str) -> SessionHandle {
        let mut sessions = self.sessions.lock();
        if let Some(existing) = sessions.get(user) {
            return Arc::clone(existing);
        }

        let mut state = SessionState::new(user);
        self.store.load(&mut state);
        let handle = Arc::new(Mutex::new(state));
        sessions.insert(user.to_string(), Arc::clone(&handle));
        debug!("hud"; "attached {user}");
        handle
    }

    /// Detach a user, persisting their session first. Unknown users are a
    /// no-op.
    pub fn detach(&self, user: &str) {
        let removed = self.sessions.lock().remove(user);
        if let Some(handle) = removed {
            self.store.save(&handle.lock());
            debug!("hud"; "detached {user}");
        }
    }

    pub fn is_attached(&self, user: &str) -> bool {
        self.sessions.lock().contains_key(user)
    }

    pub fn session(&self, user: &str) -> Option<SessionHandle> {
        self.sessions.lock().get(user).map(Arc::clone)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }

    /// Handles for one cycle, sorted by user so delivery order is stable.
    pub fn cycle_handles(&self) -> Vec<(String, SessionHandle)> {
        let sessions = self.sessions.lock();
        let mut handles: Vec<(String, SessionHandle)> = sessions
            .iter()
            .map(|(user, handle)| (user.clone(), Arc::clone(handle)))
            .collect();
        handles.sort_by(|a, b| a.0.cmp(&b.0));
        handles
    }

    /// Record a suppression trigger for a user, if attached.
    pub fn suspend(&self, user: &str, now_ms: i64) {
        if let Some(handle) = self.session(user) {
            handle.lock().suspend(now_ms);
        }
    }

    /// Persist every attached session. Called on shutdown; sessions stay
    /// attached.
    pub fn persist_all(&self) {
        let handles = self.cycle_handles();
        for (_, handle) in &handles {
            self.store.save(&handle.lock());
        }
        log!("hud"; "persisted {} sessions", handles.len());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hud::session::{Section, Target};
    use tempfile::tempdir;

    #[test]
    fn test_attach_is_idempotent() {
        let dir = tempdir().unwrap();
        let service = Service::new(dir.path().to_path_buf());

        let first = service.attach("alice");
        let second = service.attach("alice");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn test_detach_persists_overrides() {
        let dir = tempdir().unwrap();
        let service = Service::new(dir.path().to_path_buf());

        let handle = service.attach("alice");
        handle
            .lock()
            .set_visible(Target::Section(Section::Light), Some(true));
        service.detach("alice");
        assert!(!service.is_attached("alice"));

        let restored = service.attach("alice");
        assert!(restored.lock().visible(Target::Section(Section::Light)));
    }

    #[test]
    fn test_cycle_handles_sorted() {
        let dir = tempdir().unwrap();
        let service = Service::new(dir.path().to_path_buf());
        service.attach("carol");
        service.attach("alice");
        service.attach("bob");

        let users: Vec<String> = service
            .cycle_handles()
            .into_iter()
            .map(|(user, _)| user)
            .collect();
        assert_eq!(users, ["alice", "bob", "carol"]);
    }

    #[test]
    fn test_suspend_reaches_session() {
        let dir = tempdir().unwrap();
        let service = Service::new(dir.path().to_path_buf());
        let handle = service.attach("alice");

        service.suspend("alice", 500);
        assert!(handle.lock().is_suspended(500));

        // Unknown users are ignored.
        service.suspend("nobody", 500);
    }

    #[test]
    fn test_persist_all_writes_documents() {
        let dir = tempdir().unwrap();
        let service = Service::new(dir.path().to_path_buf());

        service
            .attach("alice")
            .lock()
            .set_format(Target::Hud, "%biome%");
        service.attach("bob");
        service.persist_all();

        assert!(dir.path().join("users/alice.toml").exists());
        // All-default bob writes nothing.
        assert!(!dir.path().join("users/bob.toml").exists());
        // Sessions stay attached after the sweep.
        assert_eq!(service.len(), 2);
    }
}
