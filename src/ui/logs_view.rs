//! Logs tab: a scrollable view over the server's recent log lines.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::state::AppState;

use super::theme::{Theme, borders};

pub fn render_logs(frame: &mut Frame, area: Rect, state: &AppState) {
    let logs = &state.logs;

    let title = if logs.lines.is_empty() {
        " Logs ".to_string()
    } else {
        format!(" Logs ({}/{}) ", logs.scroll + 1, logs.lines.len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(borders::panel())
        .border_style(Theme::border())
        .title(Span::styled(title, Theme::label()));

    if logs.lines.is_empty() {
        let text = if logs.loaded {
            "Log file is empty"
        } else {
            "Fetching logs..."
        };
        let paragraph = Paragraph::new(Span::styled(text, Theme::text_muted()))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    // The scroll cursor marks the bottom visible line.
    let visible = area.height.saturating_sub(2) as usize;
    let end = (logs.scroll + 1).min(logs.lines.len());
    let start = end.saturating_sub(visible.max(1));

    let lines: Vec<Line> = logs.lines[start..end]
        .iter()
        .map(|line| Line::from(Span::styled(line.clone(), line_style(line))))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Color a log line by its severity token, if one is present.
fn line_style(line: &str) -> ratatui::style::Style {
    if line.contains("ERROR") || line.contains("CRITICAL") {
        Theme::text_error()
    } else if line.contains("WARNING") {
        Theme::input_highlight()
    } else if line.contains("DEBUG") {
        Theme::text_muted()
    } else {
        Theme::text_secondary()
    }
}
