//! Status tab: service banner, countdown gauge, activity counters, and
//! the recent job / error tables.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState};

use crate::app::state::AppState;
use crate::constants::SUBJECT_DISPLAY_WIDTH;
use crate::status::banner::BannerKind;
use crate::status::reconcile::DashboardView;

use super::theme::{Theme, borders, symbols};
use super::widgets::truncate_string;

pub fn render_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let dash = &state.dashboard;

    let mut constraints = vec![Constraint::Length(3)];
    if dash.banner.show_countdown {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(4));
    constraints.push(Constraint::Min(4));
    if !dash.errors.is_empty() {
        constraints.push(Constraint::Length(dash.errors.len().min(4) as u16 + 2));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let mut next = 0;

    render_banner(frame, chunks[next], dash);
    next += 1;

    if dash.banner.show_countdown {
        render_countdown(frame, chunks[next], dash);
        next += 1;
    }

    render_counters(frame, chunks[next], dash);
    next += 1;

    render_jobs(frame, chunks[next], state);
    next += 1;

    if !dash.errors.is_empty() {
        render_errors(frame, chunks[next], dash);
    }
}

fn banner_style(kind: BannerKind) -> ratatui::style::Style {
    match kind {
        BannerKind::Stopped => Theme::banner_stopped(),
        BannerKind::Active => Theme::banner_active(),
        BannerKind::Waiting => Theme::banner_waiting(),
        BannerKind::Processing => Theme::banner_processing(),
    }
}

fn render_banner(frame: &mut Frame, area: Rect, dash: &DashboardView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(borders::panel())
        .border_style(Theme::border())
        .title(Span::styled(" Service ", Theme::label()));

    let caption = Span::styled(dash.banner.caption.clone(), banner_style(dash.banner.kind));
    let paragraph = Paragraph::new(Line::from(caption))
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_countdown(frame: &mut Frame, area: Rect, dash: &DashboardView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(borders::panel())
        .border_style(Theme::border())
        .title(Span::styled(" Next check ", Theme::label()));

    match &dash.countdown {
        Some(view) => {
            let style = if view.urgent {
                Theme::gauge_urgent()
            } else {
                Theme::gauge()
            };
            let gauge = Gauge::default()
                .block(block)
                .gauge_style(style)
                .percent(view.remaining_percent)
                .label(view.label.clone());
            frame.render_widget(gauge, area);
        }
        None => {
            let text = dash
                .next_check
                .clone()
                .unwrap_or_else(|| "--".to_string());
            let paragraph = Paragraph::new(Span::styled(text, Theme::text_muted()))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, area);
        }
    }
}

fn render_counters(frame: &mut Frame, area: Rect, dash: &DashboardView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(borders::panel())
        .border_style(Theme::border())
        .title(Span::styled(" Activity ", Theme::label()));

    let dash_or = |v: &Option<String>| v.clone().unwrap_or_else(|| "--".to_string());

    let lines = vec![
        Line::from(vec![
            Span::styled("Found ", Theme::label()),
            Span::styled(dash.messages_found.to_string(), Theme::text()),
            Span::styled("  Printed ", Theme::label()),
            Span::styled(dash.jobs_processed.to_string(), Theme::text()),
            Span::styled("  Pending ", Theme::label()),
            Span::styled(dash.jobs_pending.to_string(), Theme::text()),
        ]),
        Line::from(vec![
            Span::styled("Check ", Theme::label()),
            Span::styled(dash_or(&dash.last_check), Theme::text_secondary()),
            Span::styled("  Cleanup ", Theme::label()),
            Span::styled(dash_or(&dash.last_cleanup), Theme::text_secondary()),
            Span::styled(" → ", Theme::text_muted()),
            Span::styled(dash_or(&dash.next_cleanup), Theme::text_secondary()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_jobs(frame: &mut Frame, area: Rect, state: &AppState) {
    let dash = &state.dashboard;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(borders::panel())
        .border_style(Theme::border())
        .title(Span::styled(
            format!(" Jobs ({}) ", dash.jobs.len()),
            Theme::label(),
        ));

    if dash.jobs.is_empty() {
        let paragraph = Paragraph::new(Span::styled("No jobs yet", Theme::text_muted()))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec!["Time", "Source", "Subject", "Action", ""])
        .style(Theme::label())
        .bottom_margin(0);

    let rows: Vec<Row> = dash
        .jobs
        .iter()
        .map(|job| {
            let reprint = if job.can_reprint {
                symbols::REPRINTABLE
            } else {
                " "
            };
            Row::new(vec![
                Cell::from(job.timestamp.clone()),
                Cell::from(job.source.label()),
                Cell::from(truncate_string(&job.subject, SUBJECT_DISPLAY_WIDTH)),
                Cell::from(job.action.clone()),
                Cell::from(Span::styled(reprint, Theme::text_accent())),
            ])
            .style(Theme::text())
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(19),
            Constraint::Length(8),
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(2),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Theme::selected_bold());

    let mut table_state = TableState::default().with_selected(Some(state.selected_job));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn render_errors(frame: &mut Frame, area: Rect, dash: &DashboardView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(borders::panel())
        .border_style(Theme::text_error())
        .title(Span::styled(
            format!(" Errors ({}) ", dash.errors.len()),
            Theme::text_error(),
        ));

    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = dash
        .errors
        .iter()
        .take(visible)
        .map(|err| {
            Line::from(vec![
                Span::styled(format!("{} ", err.timestamp), Theme::text_muted()),
                Span::styled(err.message.clone(), Theme::text_error()),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
