//! Configuration section definitions.

mod data;
mod defaults;
mod suspend;
mod time;
mod update;

pub use data::DataConfig;
pub use defaults::{
    DEFAULT_BIOME_FORMAT, DEFAULT_CHUNK_FORMAT, DEFAULT_COMPASS_FORMAT, DEFAULT_COORDS_FORMAT,
    DEFAULT_HUD_FORMAT, DEFAULT_LIGHT_FORMAT, DEFAULT_TIME_FORMAT, DefaultsConfig,
};
pub use suspend::SuspendConfig;
pub use time::TimeConfig;
pub use update::{UpdateConfig, UpdatePolicy};
