//! Sanitisation of server-supplied text before it reaches the terminal.
//!
//! Subjects, actions, error messages, and log lines originate from mail
//! headers and webhook payloads. Anything the terminal could interpret
//! is neutralised here; markup-looking text passes through as literal
//! characters.

/// Strip ANSI escape sequences and replace control characters with spaces.
///
/// Newlines and tabs are preserved for multi-line log output.
pub fn sanitize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        // ANSI escape sequence (ESC [ ... letter)
        if c == '\x1b' {
            if chars.peek() == Some(&'[') {
                chars.next();
                while let Some(&ch) = chars.peek() {
                    chars.next();
                    if ch.is_ascii_alphabetic() {
                        break;
                    }
                }
                continue;
            }
        }
        if c.is_control() && c != '\n' && c != '\t' {
            result.push(' ');
        } else {
            result.push(c);
        }
    }

    result
}

/// Sanitize a single display line: escapes stripped, newlines flattened.
pub fn sanitize_line(text: &str) -> String {
    sanitize_text(text).replace(['\n', '\t'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ansi_color_sequences() {
        assert_eq!(sanitize_text("\x1b[31mred\x1b[0m"), "red");
    }

    #[test]
    fn replaces_control_chars_with_spaces() {
        assert_eq!(sanitize_text("a\x07b\x00c"), "a b c");
    }

    #[test]
    fn keeps_newlines_and_tabs() {
        assert_eq!(sanitize_text("line1\nline2\tend"), "line1\nline2\tend");
    }

    #[test]
    fn markup_passes_through_as_literal_text() {
        assert_eq!(sanitize_text("<b>x</b>"), "<b>x</b>");
    }

    #[test]
    fn sanitize_line_flattens_newlines() {
        assert_eq!(sanitize_line("subject\nwith break"), "subject with break");
    }

    #[test]
    fn bare_escape_without_bracket_becomes_space() {
        assert_eq!(sanitize_text("a\x1bz"), "a z");
    }
}
