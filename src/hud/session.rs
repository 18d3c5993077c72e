//! Per-user session state and the render pipeline.
//!
//! A [`SessionState`] lives from attach to detach. It owns the user's 14
//! settings (visibility and format for the HUD and for each of the six
//! sections), one variable scope per section, the aggregating scope that
//! binds section names to their rendered text, and the snapshot captured for
//! the current cycle.
//!
//! Rendering is a fixed sequence: expand each visible section against its
//! own scope, bind the results into the aggregating scope (hidden sections
//! bind empty text), expand the top-level format, translate `&`-style codes,
//! truncate. Sub-templates nest exactly one level: section names resolve to
//! already-rendered text, never to live producers, so user formats cannot
//! recurse.

use crate::config::cfg;
use crate::format::{MAX_HUD_LENGTH, Scope, Template, translate_codes, truncate};
use crate::world::Snapshot;

use super::settings::{FormatSetting, Setting};
use super::variables::section_scope;

// ============================================================================
// Sections
// ============================================================================

/// The six display sections, in settings-key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Biome,
    Chunk,
    Compass,
    Coords,
    Light,
    Time,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Biome,
        Section::Chunk,
        Section::Compass,
        Section::Coords,
        Section::Light,
        Section::Time,
    ];

    /// The section's name, as used for its variable in the top-level format.
    pub fn name(self) -> &'static str {
        match self {
            Section::Biome => "biome",
            Section::Chunk => "chunk",
            Section::Compass => "compass",
            Section::Coords => "coords",
            Section::Light => "light",
            Section::Time => "time",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "biome" => Section::Biome,
            "chunk" => Section::Chunk,
            "compass" => Section::Compass,
            "coords" => Section::Coords,
            "light" => Section::Light,
            "time" => Section::Time,
            _ => return None,
        })
    }

    fn visible_key(self) -> &'static str {
        match self {
            Section::Biome => "biome-visible",
            Section::Chunk => "chunk-visible",
            Section::Compass => "compass-visible",
            Section::Coords => "coords-visible",
            Section::Light => "light-visible",
            Section::Time => "time-visible",
        }
    }

    fn format_key(self) -> &'static str {
        match self {
            Section::Biome => "biome-format",
            Section::Chunk => "chunk-format",
            Section::Compass => "compass-format",
            Section::Coords => "coords-format",
            Section::Light => "light-format",
            Section::Time => "time-format",
        }
    }

    fn default_visible(self) -> bool {
        let defaults = &cfg().defaults;
        match self {
            Section::Biome => defaults.biome_visible,
            Section::Chunk => defaults.chunk_visible,
            Section::Compass => defaults.compass_visible,
            Section::Coords => defaults.coords_visible,
            Section::Light => defaults.light_visible,
            Section::Time => defaults.time_visible,
        }
    }

    fn default_format(self) -> Template {
        let defaults = &cfg().defaults;
        match self {
            Section::Biome => defaults.biome_format.clone(),
            Section::Chunk => defaults.chunk_format.clone(),
            Section::Compass => defaults.compass_format.clone(),
            Section::Coords => defaults.coords_format.clone(),
            Section::Light => defaults.light_format.clone(),
            Section::Time => defaults.time_format.clone(),
        }
    }
}

/// What a settings command addresses: the whole HUD or one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Hud,
    Section(Section),
}

impl Target {
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("hud") {
            return Some(Target::Hud);
        }
        Section::from_name(name).map(Target::Section)
    }

    pub fn name(self) -> &'static str {
        match self {
            Target::Hud => "hud",
            Target::Section(section) => section.name(),
        }
    }
}

// ============================================================================
// Session state
// ============================================================================

struct SectionState {
    section: Section,
    visible: Setting<bool>,
    format: FormatSetting,
    scope: Scope<Snapshot>,
}

impl SectionState {
    fn new(section: Section) -> Self {
        Self {
            section,
            visible: Setting::new(section.visible_key(), move || section.default_visible()),
            format: Setting::new(section.format_key(), move || section.default_format()),
            scope: section_scope(section),
        }
    }
}

/// Everything the engine keeps for one attached user.
pub struct SessionState {
    user: String,
    hud_visible: Setting<bool>,
    hud_format: FormatSetting,
    /// Aggregating scope: section name → rendered section text.
    hud_scope: Scope<Snapshot>,
    sections: [SectionState; 6],
    suspended_at_ms: Option<i64>,
    snapshot: Option<Snapshot>,
}

impl SessionState {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            hud_visible: Setting::new("hud-visible", || cfg().defaults.hud_visible),
            hud_format: Setting::new("hud-format", || cfg().defaults.hud_format.clone()),
            hud_scope: Scope::new(),
            sections: Section::ALL.map(SectionState::new),
            suspended_at_ms: None,
            snapshot: None,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    fn section_state(&self, section: Section) -> &SectionState {
        &self.sections[section as usize]
    }

    fn section_state_mut(&mut self, section: Section) -> &mut SectionState {
        &mut self.sections[section as usize]
    }

    // ------------------------------------------------------------------
    // Settings surface (host commands go through these)
    // ------------------------------------------------------------------

    pub fn visible(&self, target: Target) -> bool {
        match target {
            Target::Hud => self.hud_visible.get(),
            Target::Section(section) => self.section_state(section).visible.get(),
        }
    }

    pub fn set_visible(&mut self, target: Target, value: Option<bool>) {
        match target {
            Target::Hud => self.hud_visible.set(value),
            Target::Section(section) => self.section_state_mut(section).visible.set(value),
        }
    }

    /// The effective format's source string.
    pub fn format_source(&self, target: Target) -> String {
        match target {
            Target::Hud => self.hud_format.get().to_string(),
            Target::Section(section) => self.section_state(section).format.get().to_string(),
        }
    }

    /// Set a format from its source string. The keyword `default` clears the
    /// override.
    pub fn set_format(&mut self, target: Target, source: &str) {
        let value = if source.eq_ignore_ascii_case("default") {
            None
        } else {
            Some(Template::compile(source))
        };
        match target {
            Target::Hud => self.hud_format.set(value),
            Target::Section(section) => self.section_state_mut(section).format.set(value),
        }
    }

    // ------------------------------------------------------------------
    // Suspension
    // ------------------------------------------------------------------

    /// Record a suppression trigger at `now_ms`.
    pub fn suspend(&mut self, now_ms: i64) {
        self.suspended_at_ms = Some(now_ms);
    }

    /// Whether the HUD is within the suppression window. The absolute
    /// difference keeps a backward clock step from wedging the state.
    pub fn is_suspended(&self, now_ms: i64) -> bool {
        let window = cfg().suspend.window_ms;
        if window <= 0 {
            return false;
        }
        match self.suspended_at_ms {
            Some(t0) => (now_ms - t0).abs() < window,
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Render pipeline
    // ------------------------------------------------------------------

    /// Store the snapshot captured for this cycle.
    pub fn prepare(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
    }

    /// Format the display line from the prepared snapshot, consuming it.
    /// Returns `None` when no snapshot was captured this cycle.
    pub fn render(&mut self) -> Option<String> {
        let snapshot = self.snapshot.take()?;

        for state in &mut self.sections {
            let text = if state.visible.get() {
                state.scope.expand(&state.format.get(), &snapshot)
            } else {
                String::new()
            };
            self.hud_scope.bind_text(state.section.name(), text);
        }

        let line = self.hud_scope.expand(&self.hud_format.get(), &snapshot);
        let line = translate_codes(&line);
        Some(truncate(&line, MAX_HUD_LENGTH).to_string())
    }

    // ------------------------------------------------------------------
    // Persistence document
    // ------------------------------------------------------------------

    /// Collect every override into a flat document. All-default users
    /// produce an empty table.
    pub fn save_doc(&self) -> toml::Table {
        let mut doc = toml::Table::new();
        self.hud_visible.save(&mut doc);
        self.hud_format.save(&mut doc);
        for state in &self.sections {
            state.visible.save(&mut doc);
            state.format.save(&mut doc);
        }
        doc
    }

    /// Apply overrides from a flat document; keys not present reset.
    pub fn load_doc(&mut self, doc: &toml::Table) {
        self.hud_visible.load(doc);
        self.hud_format.load(doc);
        for state in &mut self.sections {
            state.visible.load(doc);
            state.format.load(doc);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
