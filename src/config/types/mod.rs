//! Configuration utility types.

mod error;
mod handle;

pub use error::ConfigError;
pub use handle::{CONFIG, cfg, init_config, reload_config};
