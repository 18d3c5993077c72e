//! The refresh loop over simulated users.
//!
//! Drives [`Scheduler`] cycles at the configured period and repaints a
//! pinned per-user board after each one. World state comes from
//! [`SimWorld`], a deterministic wander seeded from the user names, so the
//! board visibly changes without a real world behind it. The config file is
//! re-read at every cycle boundary; edits apply to the next cycle.

use anyhow::Result;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::{cfg, reload_config};
use crate::core::{is_shutdown, set_loop_active};
use crate::hud::{DisplaySink, Scheduler, Service, now_ms};
use crate::logger::Board;
use crate::utils::hash;
use crate::world::{BlockSample, Position, WorldSource, clock};
use crate::{debug, log};

/// Names for the first simulated users; past eight they get a numeric
/// suffix (`alice2`, `bob2`, ...).
const NAMES: [&str; 8] = [
    "alice", "bob", "carol", "dave", "erin", "frank", "grace", "heidi",
];

/// Biome per 128x128 region, picked by hashing the region coordinates.
const BIOMES: [&str; 6] = [
    "plains",
    "windswept_hills",
    "forest",
    "desert",
    "swamp",
    "ocean",
];

// ============================================================================
// Simulated world
// ============================================================================

/// A deterministic wandering world. Each cycle every user drifts a little,
/// turns a little, and occasionally steps up or down; everything derives
/// from name and step hashes, so two runs with the same users replay the
/// same walk.
pub struct SimWorld {
    positions: FxHashMap<String, Position>,
    users: Vec<String>,
    step: u64,
}

impl SimWorld {
    pub fn with_users(count: usize) -> Self {
        let users: Vec<String> = (0..count).map(user_name).collect();
        let positions = users
            .iter()
            .map(|user| (user.clone(), spawn_position(user)))
            .collect();
        Self {
            positions,
            users,
            step: 0,
        }
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    /// Advance the simulation one cycle.
    pub fn advance(&mut self) {
        self.step += 1;
        for (user, position) in &mut self.positions {
            walk(user, self.step, position);
        }
    }
}

impl WorldSource for SimWorld {
    fn position(&self, user: &str) -> Option<Position> {
        // Now and then a user is briefly between worlds.
        if hash::compute(&format!("{user}:{}:away", self.step)) % 97 == 0 {
            return None;
        }
        self.positions.get(user).copied()
    }

    fn sample(&self, _user: &str, position: &Position) -> BlockSample {
        let region_x = position.block_x().div_euclid(128);
        let region_z = position.block_z().div_euclid(128);
        let region = format!("{region_x}:{region_z}");
        BlockSample {
            biome: BIOMES[(hash::compute(&region) % BIOMES.len() as u64) as usize].to_string(),
            sky_light: if position.y >= 63.0 { 15 } else { 7 },
            block_light: (hash::compute(&format!("{region}:light")) % 8) as u8,
        }
    }

    fn time_ticks(&self) -> i64 {
        // One cycle is one in-world second.
        (self.step as i64 * 20) % clock::TICKS_PER_DAY
    }
}

fn user_name(index: usize) -> String {
    let name = NAMES[index % NAMES.len()];
    if index < NAMES.len() {
        name.to_string()
    } else {
        format!("{name}{}", index / NAMES.len() + 1)
    }
}

fn spawn_position(user: &str) -> Position {
    let seed = hash::compute(user);
    Position {
        x: (seed % 512) as f64 - 256.0,
        y: 64.0,
        z: ((seed >> 16) % 512) as f64 - 256.0,
        yaw: (seed % 360) as f32,
    }
}

/// Drift up to half a block per axis, turn up to ~15 degrees, rarely step
/// up or down a block.
fn walk(user: &str, step: u64, position: &mut Position) {
    let roll = hash::compute(&format!("{user}:{step}"));
    position.x += ((roll & 0xFF) as f64 - 127.5) / 255.0;
    position.z += (((roll >> 8) & 0xFF) as f64 - 127.5) / 255.0;
    position.yaw = (position.yaw + ((roll >> 16) & 0x1F) as f32 - 15.5).rem_euclid(360.0);
    if (roll >> 24) & 0x3F == 0 {
        position.y += if (roll >> 30) & 1 == 0 { 1.0 } else { -1.0 };
    }
}

// ============================================================================
// Board sink
// ============================================================================

/// Collects one cycle's deliveries and repaints the pinned board. Rows sort
/// by user name, so the board stays stable however the parallel phase
/// interleaves deliveries.
struct BoardSink {
    board: Board,
    rows: BTreeMap<String, String>,
}

impl BoardSink {
    const fn new() -> Self {
        Self {
            board: Board::new(),
            rows: BTreeMap::new(),
        }
    }

    /// Forget the previous cycle's rows. A user that renders nothing this
    /// cycle disappears from the board, which is the point of hiding.
    fn begin_cycle(&mut self) {
        self.rows.clear();
    }

    fn repaint(&mut self) {
        let rows: Vec<(String, String)> = self
            .rows
            .iter()
            .map(|(name, line)| (name.clone(), line.clone()))
            .collect();
        self.board.render(&rows);
    }
}

impl DisplaySink for BoardSink {
    fn deliver(&mut self, user: &str, line: &str) {
        self.rows.insert(user.to_string(), line.to_string());
    }
}

// ============================================================================
// Loop
// ============================================================================

/// Attach `users` simulated sessions and refresh them until interrupted or
/// until `cycles` cycles have run (`0` = no bound).
pub fn run_loop(users: usize, cycles: u64) -> Result<()> {
    let service = Service::new(cfg().data_dir());
    let mut world = SimWorld::with_users(users);
    for user in world.users() {
        service.attach(user);
    }

    let mut scheduler = Scheduler::new();
    let mut sink = BoardSink::new();
    let mut cycle: u64 = 0;

    log!("run"; "refreshing {} sessions every {} ms (Ctrl+C to stop)",
        service.len(), cfg().update.period_ms);
    set_loop_active(true);

    while !is_shutdown() && (cycles == 0 || cycle < cycles) {
        let started = Instant::now();

        match reload_config() {
            Ok(true) => log!("config"; "reloaded {}", cfg().config_path.display()),
            Ok(false) => {}
            Err(e) => log!("warning"; "config reload failed: {e}"),
        }
        let config = cfg();

        // Suspension drill: periodically one user's line goes quiet for the
        // configured window, as if a transient display borrowed it.
        if users > 0 && config.suspend.window_ms > 0 && cycle % 12 == 7 {
            let victim = user_name((cycle / 12) as usize % users);
            debug!("run"; "suspending {victim}");
            service.suspend(&victim, now_ms());
        }

        sink.begin_cycle();
        let report = scheduler.run_cycle(&service, &world, &mut sink, &config, now_ms())?;
        sink.repaint();
        debug!("run"; "cycle {cycle}: {} rendered, {} skipped, {} dropped",
            report.rendered, report.skipped, report.dropped);

        world.advance();
        cycle += 1;

        if let Some(rest) = Duration::from_millis(config.update.period_ms).checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    set_loop_active(false);
    sink.board.clear();
    service.persist_all();
    log!("run"; "stopped after {cycle} cycles");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_names_stay_unique() {
        let names: Vec<String> = (0..20).map(user_name).collect();
        assert_eq!(names[0], "alice");
        assert_eq!(names[7], "heidi");
        assert_eq!(names[8], "alice2");
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }

    #[test]
    fn test_walk_is_deterministic() {
        let mut world_a = SimWorld::with_users(3);
        let mut world_b = SimWorld::with_users(3);
        for _ in 0..50 {
            world_a.advance();
            world_b.advance();
        }
        for user in world_a.users().to_vec() {
            assert_eq!(world_a.positions[&user], world_b.positions[&user]);
        }
    }

    #[test]
    fn test_walk_moves_and_stays_in_turn_range() {
        let mut world = SimWorld::with_users(1);
        let start = world.positions["alice"];
        for _ in 0..100 {
            world.advance();
        }
        let end = world.positions["alice"];
        assert_ne!(start, end);
        assert!((0.0..360.0).contains(&end.yaw));
        // Half a block per step bounds the drift.
        assert!((end.x - start.x).abs() <= 50.0);
        assert!((end.z - start.z).abs() <= 50.0);
    }

    #[test]
    fn test_sample_is_stable_within_a_region() {
        let world = SimWorld::with_users(1);
        let position = Position {
            x: 10.0,
            y: 64.0,
            z: 10.0,
            yaw: 0.0,
        };
        let nearby = Position {
            x: 20.0,
            y: 64.0,
            z: 30.0,
            yaw: 180.0,
        };
        let a = world.sample("alice", &position);
        let b = world.sample("alice", &nearby);
        assert_eq!(a.biome, b.biome);
        assert_eq!(a.sky_light, 15);
    }

    #[test]
    fn test_world_clock_wraps() {
        let mut world = SimWorld::with_users(0);
        assert_eq!(world.time_ticks(), 0);
        for _ in 0..1200 {
            world.advance();
        }
        // 1200 cycles at 20 ticks each is one full day.
        assert_eq!(world.time_ticks(), 0);
        world.advance();
        assert_eq!(world.time_ticks(), 20);
    }

    #[test]
    fn test_board_sink_sorts_rows() {
        let mut sink = BoardSink::new();
        sink.deliver("heidi", "h line");
        sink.deliver("alice", "a line");
        sink.deliver("bob", "b line");

        let users: Vec<&String> = sink.rows.keys().collect();
        assert_eq!(users, ["alice", "bob", "heidi"]);

        sink.begin_cycle();
        assert!(sink.rows.is_empty());
    }
}
