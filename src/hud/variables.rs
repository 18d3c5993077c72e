//! Per-section variable bindings.
//!
//! Each section owns a fixed set of variables, every one an independent
//! [`CachedText`] over the cycle snapshot: a coordinate that moved reformats
//! itself without touching an unchanged light level, and a variable a user's
//! format never references is never evaluated at all.
//!
//! Decimal-place variants carry a trailing hyphen (`x-`, `heading-`) since
//! the variable charset has no `.`.

use crate::config::cfg;
use crate::format::{CachedText, Fixed1, Scope};
use crate::world::{Snapshot, clock, compass};

use super::session::Section;

/// Build the scope for one section, binding exactly its variables.
pub(super) fn section_scope(section: Section) -> Scope<Snapshot> {
    let mut scope = Scope::new();
    match section {
        Section::Biome => bind_biome(&mut scope),
        Section::Chunk => bind_chunk(&mut scope),
        Section::Compass => bind_compass(&mut scope),
        Section::Coords => bind_coords(&mut scope),
        Section::Light => bind_light(&mut scope),
        Section::Time => bind_time(&mut scope),
    }
    scope
}

fn bind_biome(scope: &mut Scope<Snapshot>) {
    // Cached on the raw label, so a [biome-names] edit shows up once the
    // user crosses into a different biome.
    scope.bind(
        "biome",
        CachedText::new(
            |s: &Snapshot| s.block.biome.clone(),
            |label: &String| cfg().biome_display(label),
        ),
    );
}

fn bind_chunk(scope: &mut Scope<Snapshot>) {
    scope.bind(
        "cx",
        CachedText::new(|s: &Snapshot| s.position.block_x() >> 4, |v| v.to_string()),
    );
    scope.bind(
        "cy",
        CachedText::new(|s: &Snapshot| s.position.block_y() >> 4, |v| v.to_string()),
    );
    scope.bind(
        "cz",
        CachedText::new(|s: &Snapshot| s.position.block_z() >> 4, |v| v.to_string()),
    );
    scope.bind(
        "x",
        CachedText::new(|s: &Snapshot| s.position.block_x() & 0xF, |v| v.to_string()),
    );
    scope.bind(
        "y",
        CachedText::new(|s: &Snapshot| s.position.block_y() & 0xF, |v| v.to_string()),
    );
    scope.bind(
        "z",
        CachedText::new(|s: &Snapshot| s.position.block_z() & 0xF, |v| v.to_string()),
    );
}

fn bind_compass(scope: &mut Scope<Snapshot>) {
    scope.bind(
        "octant",
        CachedText::new(
            |s: &Snapshot| compass::octant(s.position.yaw),
            |v: &&'static str| (*v).to_string(),
        ),
    );
    scope.bind(
        "heading",
        CachedText::new(
            |s: &Snapshot| compass::heading(s.position.yaw),
            |v| format!("{v:3}"),
        ),
    );
    scope.bind(
        "heading-",
        CachedText::new(
            |s: &Snapshot| Fixed1(compass::heading_tenths(s.position.yaw)),
            |v| format!("{v:>5}"),
        ),
    );
}

fn bind_coords(scope: &mut Scope<Snapshot>) {
    scope.bind(
        "x",
        CachedText::new(|s: &Snapshot| s.position.block_x(), |v| v.to_string()),
    );
    scope.bind(
        "y",
        CachedText::new(|s: &Snapshot| s.position.block_y(), |v| v.to_string()),
    );
    scope.bind(
        "z",
        CachedText::new(|s: &Snapshot| s.position.block_z(), |v| v.to_string()),
    );
    scope.bind(
        "x-",
        CachedText::new(
            |s: &Snapshot| Fixed1::from_f64(s.position.x),
            |v| format!("{v:>5}"),
        ),
    );
    scope.bind(
        "y-",
        CachedText::new(
            |s: &Snapshot| Fixed1::from_f64(s.position.y),
            |v| format!("{v:>5}"),
        ),
    );
    scope.bind(
        "z-",
        CachedText::new(
            |s: &Snapshot| Fixed1::from_f64(s.position.z),
            |v| format!("{v:>5}"),
        ),
    );
}

fn bind_light(scope: &mut Scope<Snapshot>) {
    scope.bind(
        "light",
        CachedText::new(
            |s: &Snapshot| s.block.sky_light.max(s.block.block_light),
            |v| format!("{v:2}"),
        ),
    );
    scope.bind(
        "skylight",
        CachedText::new(|s: &Snapshot| s.block.sky_light, |v| format!("{v:2}")),
    );
    scope.bind(
        "blocklight",
        CachedText::new(|s: &Snapshot| s.block.block_light, |v| format!("{v:2}")),
    );
}

fn bind_time(scope: &mut Scope<Snapshot>) {
    scope.bind(
        "h",
        CachedText::new(
            |s: &Snapshot| clock::hour12(clock::hour24(tod(s))),
            |v| v.to_string(),
        ),
    );
    scope.bind(
        "hh",
        CachedText::new(|s: &Snapshot| clock::hour24(tod(s)), |v| format!("{v:02}")),
    );
    scope.bind(
        "mm",
        CachedText::new(|s: &Snapshot| clock::minute(tod(s)), |v| format!("{v:02}")),
    );
    scope.bind(
        "am-pm",
        CachedText::new(
            |s: &Snapshot| clock::hour24(tod(s)) < 12,
            |am| if *am { "am" } else { "pm" }.to_string(),
        ),
    );
    // Day/night follows the raw tick; the epoch offset only moves the clock.
    scope.bind(
        "sun-moon",
        CachedText::new(
            |s: &Snapshot| clock::is_day(s.ticks),
            |day| if *day { "☀" } else { "☾" }.to_string(),
        ),
    );
    scope.bind(
        "ticks",
        CachedText::new(|s: &Snapshot| clock::wrapped(s.ticks), |v| v.to_string()),
    );
}

/// Displayed time of day for a snapshot, epoch offset applied.
fn tod(snapshot: &Snapshot) -> i64 {
    clock::time_of_day(snapshot.ticks, cfg().time.epoch_offset_ticks)
}

// ============================================================================
// Tests
// ============================================================================
