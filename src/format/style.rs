//! Style-code translation and output truncation.
//!
//! HUD templates use `&` followed by a code character as user-facing style
//! markup; the display side expects the same codes behind `§`. Translation
//! runs before truncation, since it can change the length of the line.

/// Hard cap on a delivered HUD line, in characters.
pub const MAX_HUD_LENGTH: usize = 128;

/// The user-facing style marker accepted in templates.
pub const STYLE_MARKER: char = '&';

/// The style prefix understood by display sinks.
pub const STYLE_PREFIX: char = '§';

/// True for the code characters that form a style sequence: colors `0-9a-f`,
/// attributes `k-o`, reset `r`, either case.
pub fn is_style_code(c: char) -> bool {
    c.is_ascii_digit() || matches!(c.to_ascii_lowercase(), 'a'..='f' | 'k'..='o' | 'r')
}

/// Replace each `&` + code pair with `§` + lowercased code. Any other `&`
/// (including a trailing one) passes through literally.
pub fn translate_codes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == STYLE_MARKER
            && let Some(&next) = chars.peek()
            && is_style_code(next)
        {
            out.push(STYLE_PREFIX);
            out.push(next.to_ascii_lowercase());
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

/// Hard cut at `max_chars` characters. Not word-aware; a style sequence split
/// at the boundary loses its code character.
pub fn truncate(line: &str, max_chars: usize) -> &str {
    match line.char_indices().nth(max_chars) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_color_codes() {
        assert_eq!(translate_codes("&6gold &ftext"), "§6gold §ftext");
        assert_eq!(translate_codes("&6plains"), "§6plains");
    }

    #[test]
    fn test_translate_lowercases_code() {
        assert_eq!(translate_codes("&Abc"), "§abc");
        assert_eq!(translate_codes("&R&L"), "§r§l");
    }

    #[test]
    fn test_non_code_ampersand_passes_through() {
        assert_eq!(translate_codes("salt & pepper"), "salt & pepper");
        assert_eq!(translate_codes("&z &g"), "&z &g");
        assert_eq!(translate_codes("trailing &"), "trailing &");
    }

    #[test]
    fn test_truncate_at_char_boundary() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("hello", 3), "hel");
        // Multi-byte characters count as one each.
        assert_eq!(truncate("☀☾☀☾", 2), "☀☾");
    }

    #[test]
    fn test_truncate_caps_long_lines() {
        let long = "x".repeat(200);
        assert_eq!(truncate(&long, MAX_HUD_LENGTH).chars().count(), 128);
    }
}
