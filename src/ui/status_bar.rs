//! Bottom status bar: channel health, operation mode, and transient
//! notices from completed or failed actions.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::state::{AppState, NoticeKind};

use super::theme::{Theme, symbols};

pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let base = Theme::status_bar();
    let conn = &state.connection;

    let api_style = if conn.api_ok {
        Theme::status_ok()
    } else {
        Theme::status_error()
    };
    let push_style = if conn.push_connected {
        Theme::status_ok()
    } else {
        Theme::status_error()
    };
    let indicator = |ok: bool| {
        if ok {
            symbols::CONNECTED
        } else {
            symbols::DISCONNECTED
        }
    };

    let mut spans = vec![
        Span::styled(format!(" {} api ", indicator(conn.api_ok)), api_style),
        Span::styled(format!(" {} push ", indicator(conn.push_connected)), push_style),
        Span::styled("│ ", Theme::status_muted()),
    ];
    if state.form.loaded {
        spans.push(Span::styled(
            format!("{} ", state.form.config.operation_mode.label()),
            Theme::status_muted(),
        ));
    }

    if let Some((text, kind)) = &state.notice.current {
        let style = match kind {
            NoticeKind::Success => Theme::status_ok(),
            NoticeKind::Error => Theme::status_error(),
        };
        spans.push(Span::styled("│ ", Theme::status_muted()));
        spans.push(Span::styled(text.clone(), style));
    }

    let right = match conn.last_update {
        Some(at) => format!("updated {} ", relative_age(at.elapsed().as_secs())),
        None => "waiting for first update ".to_string(),
    };

    let left_width: usize = spans.iter().map(|s| s.content.width()).sum();
    let padding = (area.width as usize).saturating_sub(left_width + right.width());
    spans.push(Span::styled(" ".repeat(padding), base));
    spans.push(Span::styled(right, Theme::status_muted()));

    let paragraph = Paragraph::new(Line::from(spans)).style(base);
    frame.render_widget(paragraph, area);
}

/// Short relative age for the status bar ("3s ago", "2m ago").
fn relative_age(secs: u64) -> String {
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_age_switches_units() {
        assert_eq!(relative_age(0), "0s ago");
        assert_eq!(relative_age(59), "59s ago");
        assert_eq!(relative_age(60), "1m ago");
        assert_eq!(relative_age(7200), "2h ago");
    }
}
