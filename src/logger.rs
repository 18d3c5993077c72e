//! Logging utilities with colored output and the HUD board.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro gated on `--verbose`
//! - `Board` for the pinned, repainted block of per-user HUD lines
//!
//! # Example
//!
//! ```ignore
//! log!("hud"; "attached {} users", count);
//!
//! let mut board = Board::new();
//! board.render(&[("alice".to_string(), "§6X §f10".to_string())]);
//! ```

use crate::format::style::{STYLE_PREFIX, is_style_code};
use crossterm::{
    cursor, execute,
    style::{Attribute, Color, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Lines currently pinned at the bottom by a [`Board`] (for log coordination)
static PINNED_LINES: AtomicUsize = AtomicUsize::new(0);

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix.
///
/// When a board is pinned below, the message is written above it and blank
/// lines re-reserve the board's region so the next repaint lands in place.
#[inline]
#[allow(clippy::cast_possible_truncation)] // Safe: pinned count is always small
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();

    let pinned = PINNED_LINES.load(Ordering::SeqCst);
    if pinned > 0 {
        execute!(stdout, cursor::MoveUp(pinned as u16)).ok();
        execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
    } else {
        execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
    }

    writeln!(stdout, "{prefix} {message}").ok();

    if pinned > 0 {
        for _ in 0..pinned {
            writeln!(stdout).ok();
        }
    }

    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "hud" => prefix.bright_blue().bold().to_string(),
        "run" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

// ============================================================================
// Style-code painting
// ============================================================================

/// Terminal color for a `§` color code.
fn code_color(code: char) -> Option<Color> {
    Some(match code {
        '0' => Color::Black,
        '1' => Color::DarkBlue,
        '2' => Color::DarkGreen,
        '3' => Color::DarkCyan,
        '4' => Color::DarkRed,
        '5' => Color::DarkMagenta,
        '6' => Color::DarkYellow,
        '7' => Color::Grey,
        '8' => Color::DarkGrey,
        '9' => Color::Blue,
        'a' => Color::Green,
        'b' => Color::Cyan,
        'c' => Color::Red,
        'd' => Color::Magenta,
        'e' => Color::Yellow,
        'f' => Color::White,
        _ => return None,
    })
}

/// Terminal attribute for a `§` attribute code.
fn code_attribute(code: char) -> Option<Attribute> {
    Some(match code {
        'l' => Attribute::Bold,
        'm' => Attribute::CrossedOut,
        'n' => Attribute::Underlined,
        'o' => Attribute::Italic,
        'r' => Attribute::Reset,
        _ => return None,
    })
}

/// Render `§`-coded text as terminal escapes. Codes with no terminal
/// equivalent (`§k` obfuscation) and bare trailing prefixes are dropped from
/// visible output.
pub fn paint(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 16);
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c != STYLE_PREFIX {
            out.push(c);
            continue;
        }
        let Some(&code) = chars.peek() else {
            continue;
        };
        chars.next();
        if !is_style_code(code) {
            continue;
        }
        let code = code.to_ascii_lowercase();
        if let Some(color) = code_color(code) {
            out.push_str(&SetForegroundColor(color).to_string());
        } else if let Some(attribute) = code_attribute(code) {
            out.push_str(&SetAttribute(attribute).to_string());
        }
    }
    out
}

// ============================================================================
// Board (pinned block of per-user lines)
// ============================================================================

/// Pinned block of per-user HUD lines, repainted in place each cycle.
///
/// The block stays at the bottom of the terminal; `log!` output scrolls
/// above it. Each row is `name  line` with the line's `§`-codes rendered as
/// terminal colors and a reset appended so styling never bleeds.
pub struct Board {
    /// Lines of previous output to clear
    last_lines: usize,
    /// Width reserved for user names, grown as users appear
    name_width: usize,
}

impl Board {
    pub const fn new() -> Self {
        Self {
            last_lines: 0,
            name_width: 0,
        }
    }

    /// Repaint the block with one row per user.
    #[allow(clippy::cast_possible_truncation)]
    pub fn render(&mut self, rows: &[(String, String)]) {
        let mut stdout = stdout().lock();

        if self.last_lines > 0 {
            execute!(stdout, cursor::MoveUp(self.last_lines as u16)).ok();
            execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
        }

        self.name_width = rows
            .iter()
            .map(|(name, _)| name.chars().count())
            .chain([self.name_width])
            .max()
            .unwrap_or(0);

        for (name, line) in rows {
            let reset = SetAttribute(Attribute::Reset);
            writeln!(
                stdout,
                "{:<width$}  {}{reset}",
                name.bold(),
                paint(line),
                width = self.name_width
            )
            .ok();
        }
        stdout.flush().ok();

        self.last_lines = rows.len();
        PINNED_LINES.store(self.last_lines, Ordering::SeqCst);
    }

    /// Clear the block and release the pinned region.
    pub fn clear(&mut self) {
        if self.last_lines > 0 {
            let mut stdout = stdout().lock();
            #[allow(clippy::cast_possible_truncation)]
            let lines = self.last_lines as u16;
            execute!(stdout, cursor::MoveUp(lines)).ok();
            execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
            stdout.flush().ok();
            self.last_lines = 0;
            PINNED_LINES.store(0, Ordering::SeqCst);
        }
    }
}

impl Drop for Board {
    fn drop(&mut self) {
        self.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_color_codes() {
        let painted = paint("§6gold§r");
        assert!(painted.contains("gold"));
        assert!(!painted.contains('§'));
        // Escape for DarkYellow, then the reset attribute.
        assert!(painted.contains(&SetForegroundColor(Color::DarkYellow).to_string()));
        assert!(painted.contains(&SetAttribute(Attribute::Reset).to_string()));
    }

    #[test]
    fn test_paint_drops_unknown_codes() {
        // `z` is not a style code; `k` has no terminal equivalent.
        assert_eq!(paint("§za§kb"), "ab");
        // A bare trailing prefix disappears.
        assert_eq!(paint("end§"), "end");
    }

    #[test]
    fn test_paint_plain_text_unchanged() {
        assert_eq!(paint("X 10 Y 64 Z -3"), "X 10 Y 64 Z -3");
    }

    #[test]
    fn test_board_starts_empty() {
        let board = Board::new();
        assert_eq!(board.last_lines, 0);
        drop(board);
    }
}
