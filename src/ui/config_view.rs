//! Config tab: the editable settings form.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::state::{AppState, ConfigField, FieldKind};

use super::theme::{Theme, borders, symbols, with_selection_bg};

const LABEL_WIDTH: usize = 24;

pub fn render_config(frame: &mut Frame, area: Rect, state: &AppState) {
    let form = &state.form;

    let title = if form.dirty {
        format!(" Settings {} ", symbols::DIRTY)
    } else {
        " Settings ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(borders::panel())
        .border_style(if form.editing.is_some() {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(title, Theme::label()));

    if !form.loaded {
        let paragraph = Paragraph::new(Span::styled(
            "Waiting for server configuration...",
            Theme::text_muted(),
        ))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    // Keep the cursor row inside the visible window.
    let visible = area.height.saturating_sub(2) as usize;
    let offset = form.selected.saturating_sub(visible.saturating_sub(1));

    let lines: Vec<Line> = ConfigField::ALL
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible.max(1))
        .map(|(i, field)| field_line(state, i, *field))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line(state: &AppState, index: usize, field: ConfigField) -> Line<'static> {
    let form = &state.form;
    let selected = index == form.selected;
    let editing = selected && form.editing.is_some();

    let label = format!(" {:<width$}", field.label(), width = LABEL_WIDTH);
    let label_style = with_selection_bg(
        if selected { Theme::selected_bold() } else { Theme::label() },
        selected,
    );

    let mut spans = vec![Span::styled(label, label_style)];

    if editing {
        let buffer = form.editing.as_deref().unwrap_or_default();
        let shown = if field.kind() == FieldKind::Secret {
            "*".repeat(buffer.chars().count())
        } else {
            buffer.to_string()
        };
        spans.push(Span::styled(
            format!("{}{}", shown, symbols::EDIT_CURSOR),
            Theme::input_highlight(),
        ));
    } else {
        let value = form.display_value(field);
        let value_style = with_selection_bg(
            match field.kind() {
                FieldKind::Toggle | FieldKind::Mode => Theme::text_accent(),
                _ => Theme::text(),
            },
            selected,
        );
        spans.push(Span::styled(value, value_style));
    }

    Line::from(spans)
}
