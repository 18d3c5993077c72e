//! `[defaults]` section configuration.
//!
//! Live defaults for every per-user setting. A user's unset settings read
//! these at lookup time, so editing this section changes what every
//! non-customized user sees on the next cycle.
//!
//! # Example
//!
//! ```toml
//! [defaults]
//! hud-visible = true
//! chunk-visible = false
//! coords-format = "&6X &f%x% &6Y &f%y% &6Z &f%z%"
//! ```

use crate::format::Template;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HUD_FORMAT: &str = "%coords% %compass% %biome% %time%";
pub const DEFAULT_BIOME_FORMAT: &str = "&2%biome%";
pub const DEFAULT_CHUNK_FORMAT: &str = "&3C %cx% %cz%&7|&3%x% %z%";
pub const DEFAULT_COMPASS_FORMAT: &str = "&6%octant%&7|&6%heading%";
pub const DEFAULT_COORDS_FORMAT: &str = "&6X &f%x% &6Y &f%y% &6Z &f%z%";
pub const DEFAULT_LIGHT_FORMAT: &str = "&eL &f%light%";
pub const DEFAULT_TIME_FORMAT: &str = "&e%sun-moon% %hh%:%mm%";

/// Default visibility and format for the HUD and each section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DefaultsConfig {
    pub hud_visible: bool,
    pub biome_visible: bool,
    pub chunk_visible: bool,
    pub compass_visible: bool,
    pub coords_visible: bool,
    pub light_visible: bool,
    pub time_visible: bool,

    pub hud_format: Template,
    pub biome_format: Template,
    pub chunk_format: Template,
    pub compass_format: Template,
    pub coords_format: Template,
    pub light_format: Template,
    pub time_format: Template,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            hud_visible: true,
            biome_visible: true,
            chunk_visible: false,
            compass_visible: true,
            coords_visible: true,
            light_visible: false,
            time_visible: true,

            hud_format: Template::compile(DEFAULT_HUD_FORMAT),
            biome_format: Template::compile(DEFAULT_BIOME_FORMAT),
            chunk_format: Template::compile(DEFAULT_CHUNK_FORMAT),
            compass_format: Template::compile(DEFAULT_COMPASS_FORMAT),
            coords_format: Template::compile(DEFAULT_COORDS_FORMAT),
            light_format: Template::compile(DEFAULT_LIGHT_FORMAT),
            time_format: Template::compile(DEFAULT_TIME_FORMAT),
        }
    }
}
