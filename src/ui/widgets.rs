//! Common UI widgets: help bar, modal overlays, small text utilities.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::input::KeybindingEntry;

use super::theme::{Theme, borders, symbols};

/// Bottom help bar: as many `key description` hints as fit the width.
pub fn help_bar(frame: &mut Frame, area: Rect, hints: &[(&str, &str)]) {
    let available = area.width as usize;

    let mut total = 0;
    let mut shown = 0;
    for (i, (key, desc)) in hints.iter().enumerate() {
        let mut w = format!(" {} ", key).width() + desc.width();
        w += if i + 1 < hints.len() { 3 } else { 1 };
        if total + w > available {
            break;
        }
        total += w;
        shown += 1;
    }
    let shown = shown.max(1).min(hints.len());

    let mut spans: Vec<Span> = Vec::new();
    for (i, (key, desc)) in hints.iter().take(shown).enumerate() {
        spans.push(Span::styled(format!(" {} ", key), Theme::help_key()));
        spans.push(Span::styled(desc.to_string(), Theme::help_desc()));
        if i + 1 < shown {
            spans.push(Span::styled(" │ ", Theme::status_muted()));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Theme::status_bar());
    frame.render_widget(paragraph, area);
}

/// Char-based truncation with a `...` tail.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    } else {
        s.chars().take(max_len).collect()
    }
}

/// A fixed-size rect centered in `area`, clamped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(borders::popup())
        .border_style(Theme::border_focused())
        .title(Span::styled(format!(" {} ", title), Theme::label()))
}

/// Simple yes/no confirmation box.
pub fn confirm_overlay(frame: &mut Frame, title: &str, lines: &[&str]) {
    let width = lines
        .iter()
        .map(|l| l.width())
        .max()
        .unwrap_or(0)
        .max(title.width()) as u16
        + 4;
    let area = centered_rect(width, lines.len() as u16 + 2, frame.area());

    let text: Vec<Line> = lines
        .iter()
        .map(|l| Line::from(Span::styled(l.to_string(), Theme::text())))
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(popup_block(title)),
        area,
    );
}

/// Settings-reset confirmation. With auth enabled the dashboard secret
/// must be re-typed; otherwise a plain yes/no.
pub fn reset_overlay(frame: &mut Frame, secret_required: bool, input: &str) {
    if !secret_required {
        confirm_overlay(
            frame,
            "Reset settings",
            &[
                "Reset all settings to their defaults?",
                "",
                "y / Enter to confirm   n / Esc to cancel",
            ],
        );
        return;
    }

    let area = centered_rect(48, 6, frame.area());
    let masked = "*".repeat(input.chars().count());
    let text = vec![
        Line::from(Span::styled(
            "Type the dashboard secret to confirm:",
            Theme::text(),
        )),
        Line::from(Span::styled(
            format!("{}{}", masked, symbols::EDIT_CURSOR),
            Theme::input_highlight(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to confirm   Esc to cancel",
            Theme::text_muted(),
        )),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(popup_block("Reset settings")),
        area,
    );
}

/// Scrollable keymap overlay, grouped by category.
pub fn help_overlay(frame: &mut Frame, entries: &[KeybindingEntry], scroll: usize) {
    let mut lines: Vec<Line> = Vec::new();
    let mut category = "";
    for entry in entries {
        if entry.category != category {
            if !lines.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(entry.category, Theme::label())));
            category = entry.category;
        }
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", entry.key), Theme::text_accent()),
            Span::styled(entry.description.clone(), Theme::text_secondary()),
        ]));
    }

    let frame_area = frame.area();
    let height = (lines.len() as u16 + 2).min(frame_area.height.saturating_sub(2));
    let area = centered_rect(44, height, frame_area);

    let max_scroll = lines.len().saturating_sub(area.height.saturating_sub(2) as usize);
    let scroll = scroll.min(max_scroll) as u16;

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .scroll((scroll, 0))
            .block(popup_block("Keys")),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_string("short", 10), "short");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate_string("a long subject line", 10), "a long ...");
    }

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_rect(100, 100, area);
        assert!(rect.width <= 20 && rect.height <= 10);
    }
}
