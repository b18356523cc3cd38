//! Centralized theming for the flowdash TUI.
//!
//! Single source of truth for the colors and styles used across the
//! tabs, keyed off the configured theme variant.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;
use std::sync::RwLock;

use crate::config::ThemeVariant;

/// Global theme variant storage.
static THEME_VARIANT: RwLock<ThemeVariant> = RwLock::new(ThemeVariant::Dark);

/// Initialize the theme variant (call once at startup).
pub fn init_theme(variant: ThemeVariant) {
    if let Ok(mut guard) = THEME_VARIANT.write() {
        *guard = variant;
    }
}

/// Get the current theme variant.
pub fn current_theme() -> ThemeVariant {
    THEME_VARIANT.read().map(|g| *g).unwrap_or_default()
}

/// Border type helpers for different UI contexts.
pub mod borders {
    use super::*;

    /// Border type for popups and modals.
    pub fn popup() -> BorderType {
        match current_theme() {
            ThemeVariant::Dark => BorderType::Rounded,
            ThemeVariant::HighContrast => BorderType::Plain,
        }
    }

    /// Border type for main panels (always plain for a clean look).
    pub fn panel() -> BorderType {
        BorderType::Plain
    }
}

/// Color palette - colors that vary by theme.
pub mod colors {
    use super::*;

    pub fn bg_selection() -> Color {
        Color::LightBlue
    }

    pub fn bg_status() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::DarkGray,
            ThemeVariant::HighContrast => Color::Black,
        }
    }

    pub fn fg_primary() -> Color {
        Color::White
    }

    pub fn fg_secondary() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::Gray,
            ThemeVariant::HighContrast => Color::White,
        }
    }

    pub fn fg_muted() -> Color {
        Color::Gray
    }

    pub fn fg_accent() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::Cyan,
            ThemeVariant::HighContrast => Color::LightCyan,
        }
    }

    pub fn fg_warning() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::Yellow,
            ThemeVariant::HighContrast => Color::LightYellow,
        }
    }

    pub fn border() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::DarkGray,
            ThemeVariant::HighContrast => Color::Gray,
        }
    }

    pub fn border_focused() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::Cyan,
            ThemeVariant::HighContrast => Color::LightCyan,
        }
    }

    pub fn status_ok() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::Green,
            ThemeVariant::HighContrast => Color::LightGreen,
        }
    }

    pub fn status_error() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::Red,
            ThemeVariant::HighContrast => Color::LightRed,
        }
    }

    pub fn processing() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::Magenta,
            ThemeVariant::HighContrast => Color::LightMagenta,
        }
    }
}

/// UI symbols - centralized for consistency.
pub mod symbols {
    pub const CONNECTED: &str = "●";
    pub const DISCONNECTED: &str = "○";
    pub const EDIT_CURSOR: &str = "▏";
    pub const DIRTY: &str = "*";
    pub const REPRINTABLE: &str = "↺";
}

/// Pre-composed styles for common UI elements.
pub struct Theme;

impl Theme {
    // === Selection ===

    pub fn selected() -> Style {
        Style::default()
            .bg(colors::bg_selection())
            .fg(colors::fg_primary())
    }

    pub fn selected_bold() -> Style {
        Self::selected().add_modifier(Modifier::BOLD)
    }

    // === Text ===

    pub fn text() -> Style {
        Style::default().fg(colors::fg_primary())
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(colors::fg_secondary())
    }

    pub fn text_muted() -> Style {
        Style::default().fg(colors::fg_muted())
    }

    pub fn text_accent() -> Style {
        Style::default().fg(colors::fg_accent())
    }

    pub fn text_success() -> Style {
        Style::default().fg(colors::status_ok())
    }

    pub fn text_error() -> Style {
        Style::default().fg(colors::status_error())
    }

    /// Bold muted label, used for field and counter names.
    pub fn label() -> Style {
        Style::default()
            .fg(colors::fg_muted())
            .add_modifier(Modifier::BOLD)
    }

    /// Highlighted input text while a field is being edited.
    pub fn input_highlight() -> Style {
        Style::default()
            .fg(colors::fg_warning())
            .add_modifier(Modifier::BOLD)
    }

    // === Tab bar ===

    pub fn tab_active() -> Style {
        Style::default()
            .fg(colors::fg_accent())
            .add_modifier(Modifier::BOLD)
    }

    pub fn tab_inactive() -> Style {
        Style::default().fg(colors::fg_muted())
    }

    // === Banner ===

    pub fn banner_stopped() -> Style {
        Style::default()
            .fg(colors::status_error())
            .add_modifier(Modifier::BOLD)
    }

    pub fn banner_active() -> Style {
        Style::default()
            .fg(colors::status_ok())
            .add_modifier(Modifier::BOLD)
    }

    pub fn banner_waiting() -> Style {
        Style::default()
            .fg(colors::fg_warning())
            .add_modifier(Modifier::BOLD)
    }

    pub fn banner_processing() -> Style {
        Style::default()
            .fg(colors::processing())
            .add_modifier(Modifier::BOLD)
    }

    // === Countdown gauge ===

    pub fn gauge() -> Style {
        Style::default().fg(colors::fg_accent())
    }

    pub fn gauge_urgent() -> Style {
        Style::default()
            .fg(colors::status_error())
            .add_modifier(Modifier::BOLD)
    }

    // === Status bar ===

    pub fn status_bar() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_primary())
    }

    pub fn status_ok() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::status_ok())
    }

    pub fn status_error() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::status_error())
    }

    pub fn status_muted() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_muted())
    }

    // === Help bar ===

    pub fn help_key() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_warning())
    }

    pub fn help_desc() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_muted())
    }

    // === Borders ===

    pub fn border() -> Style {
        Style::default().fg(colors::border())
    }

    pub fn border_focused() -> Style {
        Style::default().fg(colors::border_focused())
    }
}

/// Merge a style with the selection background so the highlight covers
/// the entire row.
pub fn with_selection_bg(style: Style, selected: bool) -> Style {
    if selected {
        style.bg(colors::bg_selection())
    } else {
        style
    }
}
