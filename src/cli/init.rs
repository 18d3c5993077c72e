//! Starter configuration generation.
//!
//! Writes a commented hudline.toml plus the persistence skeleton next to it.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::HudConfig;
use crate::log;

const UPDATE_TEMPLATE: &str = "\
[update]
# Milliseconds between refresh cycles
period-ms = 1000
# Formatting phase: \"sequential\" | \"parallel\"
policy = \"parallel\"
# Deadline for the parallel formatting phase, in milliseconds
timeout-ms = 50
# Worker pool size; 0 sizes the pool from the session count (capped at 8)
workers = 0
";

const SUSPEND_TEMPLATE: &str = "\
[suspend]
# Quiet window after another display borrowed the line (ms, 0 disables)
window-ms = 3000
";

const DEFAULTS_TEMPLATE: &str = "\
[defaults]
# Visibility of the whole line and of each section
hud-visible = true
biome-visible = true
chunk-visible = false
compass-visible = true
coords-visible = true
light-visible = false
time-visible = true

# Formats: %name% variables, &<code> style codes
hud-format = \"%coords% %compass% %biome% %time%\"
biome-format = \"&2%biome%\"
chunk-format = \"&3C %cx% %cz%&7|&3%x% %z%\"
compass-format = \"&6%octant%&7|&6%heading%\"
coords-format = \"&6X &f%x% &6Y &f%y% &6Z &f%z%\"
light-format = \"&eL &f%light%\"
time-format = \"&e%sun-moon% %hh%:%mm%\"
";

const TIME_TEMPLATE: &str = "\
[time]
# Ticks added to the raw world clock before deriving clock fields
epoch-offset-ticks = 6000
";

const DATA_TEMPLATE: &str = "\
[data]
# Per-user settings live in <dir>/users/
dir = \"data\"
";

const BIOME_NAMES_TEMPLATE: &str = "\
[biome-names]
# Display text overrides for %biome%, e.g.:
# windswept_hills = \"the windy hills\"
";

/// Generate hudline.toml content with comments
pub fn generate_config_template() -> String {
    let mut out = String::new();

    // Header
    out.push_str(&format!(
        "# Hudline configuration file (v{})\n",
        env!("CARGO_PKG_VERSION")
    ));
    out.push_str("# https://github.com/hudline-rs/hudline\n\n");

    for section in [
        UPDATE_TEMPLATE,
        SUSPEND_TEMPLATE,
        DEFAULTS_TEMPLATE,
        TIME_TEMPLATE,
        DATA_TEMPLATE,
        BIOME_NAMES_TEMPLATE,
    ] {
        out.push_str(section);
        out.push('\n');
    }

    out
}

/// Write the starter configuration and create the persistence skeleton.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn new_config(config: &HudConfig, force: bool) -> Result<()> {
    let path = &config.config_path;
    if path.exists() && !force {
        log!("error"; "'{}' already exists (use --force to overwrite)", path.display());
        std::process::exit(1);
    }

    write_config(path)?;

    let users_dir = config.data_dir().join("users");
    fs::create_dir_all(&users_dir)
        .with_context(|| format!("Failed to create '{}'", users_dir.display()))?;

    log!("init"; "wrote {}", path.display());
    Ok(())
}

/// Write the template to the given path.
fn write_config(path: &Path) -> Result<()> {
    fs::write(path, generate_config_template())
        .with_context(|| format!("Failed to write config file '{}'", path.display()))?;
    Ok(())
}
