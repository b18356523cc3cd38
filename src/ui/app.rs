//! Frame composition: tab bar, active tab content, status bar, help
//! bar, and modal overlays on top.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::state::{AppState, ModalState, Tab};
use crate::constants::{HELP_BAR_HEIGHT, STATUS_BAR_HEIGHT, TAB_BAR_HEIGHT};

use super::config_view::render_config;
use super::logs_view::render_logs;
use super::status_bar::render_status_bar;
use super::status_view::render_status;
use super::theme::Theme;
use super::widgets;

pub fn render(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(STATUS_BAR_HEIGHT),
            Constraint::Length(HELP_BAR_HEIGHT),
        ])
        .split(frame.area());

    render_tab_bar(frame, chunks[0], state);

    match state.tab {
        Tab::Status => render_status(frame, chunks[1], state),
        Tab::Config => render_config(frame, chunks[1], state),
        Tab::Logs => render_logs(frame, chunks[1], state),
    }

    render_status_bar(frame, chunks[2], state);
    widgets::help_bar(frame, chunks[3], &hints_for(state));

    match &state.modal {
        ModalState::None => {}
        ModalState::Help { scroll } => {
            widgets::help_overlay(frame, &state.help_entries, *scroll);
        }
        ModalState::ConfirmClearCache => widgets::confirm_overlay(
            frame,
            "Clear cache",
            &[
                "Delete all cached job files on the server?",
                "Cleared jobs can no longer be reprinted.",
                "",
                "y / Enter to confirm   n / Esc to cancel",
            ],
        ),
        ModalState::ConfirmReset {
            secret_required,
            input,
        } => widgets::reset_overlay(frame, *secret_required, input),
    }
}

fn render_tab_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![Span::styled(" flowdash ", Theme::text_accent())];
    for (i, tab) in [Tab::Status, Tab::Config, Tab::Logs].into_iter().enumerate() {
        let style = if tab == state.tab {
            Theme::tab_active()
        } else {
            Theme::tab_inactive()
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, tab.title()), style));
        if tab == Tab::Config && state.form.dirty {
            // unsaved-edits marker sits on the tab itself
            spans.push(Span::styled(
                super::theme::symbols::DIRTY,
                Theme::text_error(),
            ));
        }
        spans.push(Span::styled("│", Theme::text_muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Per-tab key hints for the bottom help bar.
fn hints_for(state: &AppState) -> Vec<(&'static str, &'static str)> {
    if state.form.editing.is_some() && state.tab == Tab::Config {
        return vec![
            ("Enter", "apply"),
            ("Esc", "cancel"),
            ("Ctrl+S", "apply+save"),
        ];
    }
    match state.tab {
        Tab::Status => vec![
            ("s", "start"),
            ("x", "stop"),
            ("c", "check now"),
            ("p", "reprint"),
            ("C", "clear cache"),
            ("?", "help"),
            ("q", "quit"),
        ],
        Tab::Config => vec![
            ("Enter", "edit/toggle"),
            ("Ctrl+S", "save"),
            ("t", "test"),
            ("R", "reset"),
            ("?", "help"),
            ("q", "quit"),
        ],
        Tab::Logs => vec![
            ("Ctrl+R", "refresh"),
            ("d", "download"),
            ("g/G", "top/bottom"),
            ("?", "help"),
            ("q", "quit"),
        ],
    }
}
