//! The two-phase refresh cycle.
//!
//! Phase one runs on the caller (the authoritative thread): every attached,
//! visible, unsuspended session gets a world snapshot, so one cycle sees one
//! consistent input tick. Phase two is pure string formatting over those
//! snapshots and needs no world access; it runs either inline (`sequential`)
//! or as one task per session on a bounded rayon pool (`parallel`), awaited
//! on a fresh crossbeam channel with a single deadline.
//!
//! Hitting the deadline means "stop waiting", never "cancel": late results
//! go to a dead channel and are discarded, and the next cycle supersedes
//! them. Delivery always happens back on the caller, and a session that
//! detached while formatting is discarded at delivery.

use anyhow::{Context, Result};
use crossbeam::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{HudConfig, UpdatePolicy};
use crate::debug;
use crate::world::WorldSource;

use super::DisplaySink;
use super::service::{Service, SessionHandle};
use super::session::Target;

/// Outcome counts for one cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    /// Sessions formatted and delivered.
    pub rendered: usize,
    /// Sessions skipped before formatting (hidden, suspended, no position).
    pub skipped: usize,
    /// Sessions snapshotted but not delivered (missed the deadline or
    /// detached mid-cycle).
    pub dropped: usize,
}

/// Drives refresh cycles, reusing the formatting pool across them.
pub struct Scheduler {
    pool: Option<rayon::ThreadPool>,
    pool_size: usize,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            pool: None,
            pool_size: 0,
        }
    }

    /// Run one full cycle: snapshot every eligible session, format, deliver.
    ///
    /// Must be called from the authoritative thread; world reads and sink
    /// deliveries never leave it.
    pub fn run_cycle(
        &mut self,
        service: &Service,
        world: &dyn WorldSource,
        sink: &mut dyn DisplaySink,
        config: &HudConfig,
        now_ms: i64,
    ) -> Result<CycleReport> {
        let mut report = CycleReport::default();

        // Snapshot phase. Completes for every session before any formatting
        // starts.
        let handles = service.cycle_handles();
        let mut ready: Vec<(String, SessionHandle)> = Vec::with_capacity(handles.len());
        for (user, handle) in handles {
            let mut session = handle.lock();
            if !session.visible(Target::Hud) || session.is_suspended(now_ms) {
                report.skipped += 1;
                continue;
            }
            match world.snapshot(&user) {
                Some(snapshot) => {
                    session.prepare(snapshot);
                    drop(session);
                    ready.push((user, handle));
                }
                None => report.skipped += 1,
            }
        }

        if ready.is_empty() {
            return Ok(report);
        }

        match config.update.policy {
            UpdatePolicy::Sequential => self.format_inline(&ready, service, sink, &mut report),
            UpdatePolicy::Parallel => {
                self.format_on_pool(&ready, service, sink, config, &mut report)?;
            }
        }

        Ok(report)
    }

    fn format_inline(
        &self,
        ready: &[(String, SessionHandle)],
        service: &Service,
        sink: &mut dyn DisplaySink,
        report: &mut CycleReport,
    ) {
        for (user, handle) in ready {
            let line = handle.lock().render();
            match line {
                Some(line) if service.is_attached(user) => {
                    sink.deliver(user, &line);
                    report.rendered += 1;
                }
                _ => report.dropped += 1,
            }
        }
    }

    fn format_on_pool(
        &mut self,
        ready: &[(String, SessionHandle)],
        service: &Service,
        sink: &mut dyn DisplaySink,
        config: &HudConfig,
        report: &mut CycleReport,
    ) -> Result<()> {
        let pool = self.pool_for(config.update.workers, ready.len())?;
        let deadline = Instant::now() + Duration::from_millis(config.update.timeout_ms);

        // Fresh channel per cycle: a late send from a timed-out task lands
        // on a dead channel instead of leaking into the next cycle.
        let (tx, rx) = channel::unbounded::<(String, Option<String>)>();
        for (user, handle) in ready {
            let tx = tx.clone();
            let user = user.clone();
            let handle = Arc::clone(handle);
            pool.spawn(move || {
                let line = handle.lock().render();
                let _ = tx.send((user, line));
            });
        }
        drop(tx);

        let mut received = 0;
        while received < ready.len() {
            match rx.recv_deadline(deadline) {
                Ok((user, line)) => {
                    received += 1;
                    match line {
                        Some(line) if service.is_attached(&user) => {
                            sink.deliver(&user, &line);
                            report.rendered += 1;
                        }
                        _ => report.dropped += 1,
                    }
                }
                Err(_) => break,
            }
        }

        let late = ready.len() - received;
        if late > 0 {
            report.dropped += late;
            debug!("hud"; "dropped {late} late deliveries this cycle");
        }
        Ok(())
    }

    /// The formatting pool, rebuilt when the configured size changes.
    /// `workers = 0` sizes it from the session count, capped at 8.
    fn pool_for(&mut self, workers: usize, sessions: usize) -> Result<&rayon::ThreadPool> {
        let size = if workers == 0 {
            sessions.clamp(1, 8)
        } else {
            workers
        };
        if self.pool.is_none() || self.pool_size != size {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(size)
                .build()
                .context("could not build the formatting pool")?;
            self.pool = Some(pool);
            self.pool_size = size;
        }
        self.pool.as_ref().context("formatting pool missing")
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{BlockSample, Position, Snapshot};
    use rustc_hash::FxHashMap;
    use tempfile::tempdir;

    struct TestWorld {
        positions: FxHashMap<String, Position>,
    }

    impl TestWorld {
        fn with_users(users: &[&str]) -> Self {
            let mut positions = FxHashMap::default();
            for (i, user) in users.iter().enumerate() {
                positions.insert(
                    user.to_string(),
                    Position {
                        x: 10.0 + i as f64,
                        y: 64.0,
                        z: 0.0,
                        yaw: 0.0,
                    },
                );
            }
            Self { positions }
        }
    }

    impl WorldSource for TestWorld {
        fn position(&self, user: &str) -> Option<Position> {
            self.positions.get(user).copied()
        }

        fn sample(&self, _user: &str, _position: &Position) -> BlockSample {
            BlockSample {
                biome: "plains".to_string(),
                sky_light: 15,
                block_light: 0,
            }
        }

        fn time_ticks(&self) -> i64 {
            0
        }
    }

    #[derive(Default)]
    struct CollectSink {
        lines: Vec<(String, String)>,
    }

    impl DisplaySink for CollectSink {
        fn deliver(&mut self, user: &str, line: &str) {
            self.lines.push((user.to_string(), line.to_string()));
        }
    }

    fn sequential_config() -> HudConfig {
        let mut config = HudConfig::default();
        config.update.policy = UpdatePolicy::Sequential;
        config
    }

    fn parallel_config(timeout_ms: u64, workers: usize) -> HudConfig {
        let mut config = HudConfig::default();
        config.update.policy = UpdatePolicy::Parallel;
        config.update.timeout_ms = timeout_ms;
        config.update.workers = workers;
        config
    }

    #[test]
    fn test_sequential_cycle_delivers_all() {
        let dir = tempdir().unwrap();
        let service = Service::new(dir.path().to_path_buf());
        for user in ["carol", "alice", "bob"] {
            service.attach(user);
        }
        let world = TestWorld::with_users(&["alice", "bob", "carol"]);
        let mut sink = CollectSink::default();

        let report = Scheduler::new()
            .run_cycle(&service, &world, &mut sink, &sequential_config(), 0)
            .unwrap();

        assert_eq!(report.rendered, 3);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.dropped, 0);
        let users: Vec<&str> = sink.lines.iter().map(|(user, _)| user.as_str()).collect();
        assert_eq!(users, ["alice", "bob", "carol"]);
        assert!(sink.lines.iter().all(|(_, line)| !line.is_empty()));
    }

    #[test]
    fn test_parallel_cycle_generous_deadline_delivers_all() {
        let dir = tempdir().unwrap();
        let service = Service::new(dir.path().to_path_buf());
        for user in ["alice", "bob", "carol", "dave"] {
            service.attach(user);
        }
        let world = TestWorld::with_users(&["alice", "bob", "carol", "dave"]);
        let mut sink = CollectSink::default();

        let report = Scheduler::new()
            .run_cycle(&service, &world, &mut sink, &parallel_config(5000, 2), 0)
            .unwrap();

        assert_eq!(report.rendered, 4);
        assert_eq!(report.dropped, 0);
        let mut users: Vec<&str> = sink.lines.iter().map(|(user, _)| user.as_str()).collect();
        users.sort_unstable();
        assert_eq!(users, ["alice", "bob", "carol", "dave"]);
    }

    #[test]
    fn test_hidden_and_suspended_sessions_skipped() {
        let dir = tempdir().unwrap();
        let service = Service::new(dir.path().to_path_buf());
        service.attach("alice");
        service
            .attach("bob")
            .lock()
            .set_visible(Target::Hud, Some(false));
        service.attach("carol");
        service.suspend("carol", 1_000);

        let world = TestWorld::with_users(&["alice", "bob", "carol"]);
        let mut sink = CollectSink::default();

        let report = Scheduler::new()
            .run_cycle(&service, &world, &mut sink, &sequential_config(), 1_000)
            .unwrap();

        assert_eq!(report.rendered, 1);
        assert_eq!(report.skipped, 2);
        assert_eq!(sink.lines.len(), 1);
        assert_eq!(sink.lines[0].0, "alice");
    }

    #[test]
    fn test_session_without_position_skipped() {
        let dir = tempdir().unwrap();
        let service = Service::new(dir.path().to_path_buf());
        service.attach("alice");
        service.attach("ghost");

        let world = TestWorld::with_users(&["alice"]);
        let mut sink = CollectSink::default();

        let report = Scheduler::new()
            .run_cycle(&service, &world, &mut sink, &sequential_config(), 0)
            .unwrap();

        assert_eq!(report.rendered, 1);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_deadline_drops_late_sessions() {
        let dir = tempdir().unwrap();
        let service = Service::new(dir.path().to_path_buf());
        // A format with 600k variable references takes far longer than the
        // 1 ms deadline to expand.
        let slow_format = "%x%".repeat(600_000);
        for user in ["alice", "bob"] {
            service
                .attach(user)
                .lock()
                .set_format(Target::Hud, &slow_format);
        }
        let world = TestWorld::with_users(&["alice", "bob"]);
        let mut sink = CollectSink::default();

        let started = Instant::now();
        let report = Scheduler::new()
            .run_cycle(&service, &world, &mut sink, &parallel_config(1, 1), 0)
            .unwrap();

        assert_eq!(report.rendered, 0);
        assert_eq!(report.dropped, 2);
        assert!(sink.lines.is_empty());
        // The scheduler gave up at the deadline instead of waiting out the
        // stragglers.
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_session_detached_mid_cycle_not_delivered() {
        struct DetachOnFirst<'a> {
            service: &'a Service,
            victim: &'a str,
            delivered: Vec<String>,
        }

        impl DisplaySink for DetachOnFirst<'_> {
            fn deliver(&mut self, user: &str, _line: &str) {
                if self.delivered.is_empty() {
                    self.service.detach(self.victim);
                }
                self.delivered.push(user.to_string());
            }
        }

        let dir = tempdir().unwrap();
        let service = Service::new(dir.path().to_path_buf());
        service.attach("alice");
        service.attach("bob");
        let world = TestWorld::with_users(&["alice", "bob"]);

        // Delivery order is sorted, so alice's delivery detaches bob after
        // bob's snapshot was already taken.
        let mut sink = DetachOnFirst {
            service: &service,
            victim: "bob",
            delivered: Vec::new(),
        };
        let report = Scheduler::new()
            .run_cycle(&service, &world, &mut sink, &sequential_config(), 0)
            .unwrap();

        assert_eq!(report.rendered, 1);
        assert_eq!(report.dropped, 1);
        assert_eq!(sink.delivered, ["alice"]);
    }

    #[test]
    fn test_cycle_sees_one_world_tick() {
        // WorldSource::snapshot captures position, sample, and time in one
        // call during the snapshot phase.
        let world = TestWorld::with_users(&["alice"]);
        let snapshot: Snapshot = world.snapshot("alice").unwrap();
        assert_eq!(snapshot.position.x, 10.0);
        assert_eq!(snapshot.block.biome, "plains");
        assert_eq!(snapshot.ticks, 0);
    }
}
