//! One-shot format inspection.
//!
//! Compiles a status line format, classifies what it references, renders one
//! frame against a fixed sample snapshot, and prints the report either as
//! log lines or as JSON.

use anyhow::Result;
use serde_json::json;

use crate::config::HudConfig;
use crate::format::{Segment, Template};
use crate::hud::{Section, SessionState, Store, Target};
use crate::log;
use crate::logger;
use crate::world::{BlockSample, Position, Snapshot};

/// How one variable in the checked format resolves.
struct VariableEntry {
    name: String,
    kind: &'static str,
    /// Set for section variables: whether that section currently renders.
    visible: Option<bool>,
}

/// Inspect a format and render one sample frame.
pub fn run_check(
    format: Option<&str>,
    user: Option<&str>,
    json: bool,
    config: &HudConfig,
) -> Result<()> {
    let mut session = SessionState::new(user.unwrap_or("sample"));
    if user.is_some() {
        Store::new(config.data_dir()).load(&mut session);
    }
    if let Some(source) = format {
        session.set_format(Target::Hud, source);
    }

    let source = session.format_source(Target::Hud);
    let template = Template::compile(&source);
    let variables = variable_entries(&template, &session);

    session.prepare(sample_snapshot());
    let line = session.render().unwrap_or_default();

    if json {
        let entries: Vec<_> = variables
            .iter()
            .map(|entry| {
                json!({
                    "name": entry.name,
                    "kind": entry.kind,
                    "visible": entry.visible,
                })
            })
            .collect();
        let report = json!({
            "user": session.user(),
            "format": source,
            "hud-visible": session.visible(Target::Hud),
            "variables": entries,
            "line": line,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    log!("check"; "user: {}", session.user());
    log!("check"; "format: {source}");
    if !session.visible(Target::Hud) {
        log!("check"; "note: the HUD is currently hidden for this user");
    }
    for entry in &variables {
        match entry.visible {
            Some(true) => log!("check"; "  %{}% -> {} (visible)", entry.name, entry.kind),
            Some(false) => log!("check"; "  %{}% -> {} (hidden)", entry.name, entry.kind),
            None => log!("check"; "  %{}% -> {}, stays literal", entry.name, entry.kind),
        }
    }
    log!("check"; "line: {}", logger::paint(&line));
    Ok(())
}

/// Classify every variable the template references. At the HUD level the
/// known names are exactly the section names.
fn variable_entries(template: &Template, session: &SessionState) -> Vec<VariableEntry> {
    let mut entries = Vec::new();
    for segment in template.segments() {
        if let Segment::Variable(name) = segment {
            let entry = match Section::from_name(name) {
                Some(section) => VariableEntry {
                    name: name.clone(),
                    kind: "section",
                    visible: Some(session.visible(Target::Section(section))),
                },
                None => VariableEntry {
                    name: name.clone(),
                    kind: "unknown",
                    visible: None,
                },
            };
            entries.push(entry);
        }
    }
    entries
}

/// The fixed frame `check` renders against.
fn sample_snapshot() -> Snapshot {
    Snapshot {
        position: Position {
            x: 12.5,
            y: 64.0,
            z: -7.3,
            yaw: 137.0,
        },
        block: BlockSample {
            biome: "windswept_hills".to_string(),
            sky_light: 12,
            block_light: 9,
        },
        ticks: 5500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_entries_classify() {
        let session = SessionState::new("sample");
        let template = Template::compile("%coords% %chunk% %nope%");

        let entries = variable_entries(&template, &session);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "coords");
        assert_eq!(entries[0].kind, "section");
        assert_eq!(entries[0].visible, Some(true));
        // chunk is hidden by default
        assert_eq!(entries[1].visible, Some(false));
        assert_eq!(entries[2].kind, "unknown");
        assert_eq!(entries[2].visible, None);
    }

    #[test]
    fn test_sample_frame_renders_default_line() {
        let mut session = SessionState::new("sample");
        session.prepare(sample_snapshot());

        let line = session.render().unwrap();
        assert_eq!(
            line,
            "§6X §f12 §6Y §f64 §6Z §f-8 §6NW§7|§6137 §2windswept hills §e☀ 11:30"
        );
    }

    #[test]
    fn test_custom_format_narrows_the_line() {
        let mut session = SessionState::new("sample");
        session.set_visible(Target::Section(Section::Light), Some(true));
        session.set_format(Target::Hud, "%light%");
        session.prepare(sample_snapshot());

        let line = session.render().unwrap();
        assert_eq!(line, "§eL §f12");
    }
}
