//! World-state contracts.
//!
//! The engine never reads world state directly; it goes through
//! [`WorldSource`], whose accessors are thread-confined to the authoritative
//! thread. Whatever a cycle needs is captured once into a [`Snapshot`] and
//! the formatting phase works from that copy alone.
//!
//! # Module Structure
//!
//! - [`clock`]: 24000-tick day cycle arithmetic
//! - [`compass`]: yaw → octant / heading conversion

pub mod clock;
pub mod compass;

/// A user's position: coordinates plus view yaw in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f32,
}

impl Position {
    /// Floored integer coordinates, the "block" the position is in.
    pub fn block_x(&self) -> i32 {
        self.x.floor() as i32
    }

    pub fn block_y(&self) -> i32 {
        self.y.floor() as i32
    }

    pub fn block_z(&self) -> i32 {
        self.z.floor() as i32
    }
}

/// Environment sampled at a position.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSample {
    /// Categorical biome label, lowercase with underscores (e.g.
    /// `"windswept_hills"`).
    pub biome: String,
    /// Sky-sourced light, 0..=15.
    pub sky_light: u8,
    /// Block-sourced light, 0..=15.
    pub block_light: u8,
}

/// World-derived inputs captured during the synchronous phase of a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub position: Position,
    pub block: BlockSample,
    pub ticks: i64,
}

/// Source of world state. Accessors must only be called from the
/// authoritative thread; implementations are free to assume no concurrent
/// calls.
pub trait WorldSource {
    /// Current position of a user, `None` while the user has no presence in
    /// the world this tick.
    fn position(&self, user: &str) -> Option<Position>;

    /// Sample the environment at a position.
    fn sample(&self, user: &str, position: &Position) -> BlockSample;

    /// World clock in ticks. Wraps every [`clock::TICKS_PER_DAY`].
    fn time_ticks(&self) -> i64;

    /// Capture everything a formatting pass needs for one user.
    fn snapshot(&self, user: &str) -> Option<Snapshot> {
        let position = self.position(user)?;
        let block = self.sample(user, &position);
        Some(Snapshot {
            position,
            block,
            ticks: self.time_ticks(),
        })
    }
}

/// Human-readable form of a biome label: lowercased, underscores to spaces.
pub fn pretty_biome(label: &str) -> String {
    label.to_lowercase().replace('_', " ")
}
