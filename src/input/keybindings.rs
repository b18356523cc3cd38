use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::config::KeybindingMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Top,
    Bottom,
    PageUp,
    PageDown,
    NextTab,
    PrevTab,
    GotoStatus,
    GotoConfig,
    GotoLogs,

    // General
    Open,
    Back,
    Quit,

    // Service control
    StartService,
    StopService,
    ManualCheck,
    Reprint,
    ClearCache,

    // Config
    SaveConfig,
    TestConnection,
    ResetConfig,

    // Logs
    RefreshLogs,
    DownloadLogs,

    // Help
    Help,
}

pub struct KeyBindings {
    bindings: HashMap<KeyEvent, Action>,
}

/// A displayable keybinding entry
#[derive(Debug, Clone)]
pub struct KeybindingEntry {
    pub key: String,
    pub description: String,
    pub category: &'static str,
}

impl KeyBindings {
    pub fn new(mode: &KeybindingMode) -> Self {
        let bindings = match mode {
            KeybindingMode::Vim => Self::vim_bindings(),
            KeybindingMode::Arrows => Self::arrow_bindings(),
        };
        Self { bindings }
    }

    pub fn get(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings.get(event).copied()
    }

    /// Get all keybindings as displayable entries grouped by category
    pub fn all_bindings(&self) -> Vec<KeybindingEntry> {
        let mut entries: Vec<_> = self
            .bindings
            .iter()
            .map(|(event, action)| KeybindingEntry {
                key: format_key_event(event),
                description: action_description(action),
                category: action_category(action),
            })
            .collect();

        entries.sort_by(|a, b| {
            let cat_order = category_order(a.category).cmp(&category_order(b.category));
            if cat_order == std::cmp::Ordering::Equal {
                a.description.cmp(&b.description)
            } else {
                cat_order
            }
        });
        entries
    }

    fn common_bindings(map: &mut HashMap<KeyEvent, Action>) {
        map.insert(key_code(KeyCode::Tab), Action::NextTab);
        map.insert(shift_key_code(KeyCode::BackTab), Action::PrevTab);
        map.insert(key('1'), Action::GotoStatus);
        map.insert(key('2'), Action::GotoConfig);
        map.insert(key('3'), Action::GotoLogs);

        map.insert(key_code(KeyCode::Enter), Action::Open);
        map.insert(key_code(KeyCode::Esc), Action::Back);

        map.insert(key('s'), Action::StartService);
        map.insert(key('x'), Action::StopService);
        map.insert(key('c'), Action::ManualCheck);
        map.insert(key('p'), Action::Reprint);
        map.insert(shift_key('C'), Action::ClearCache);

        map.insert(ctrl_key('s'), Action::SaveConfig);
        map.insert(key('t'), Action::TestConnection);
        map.insert(shift_key('R'), Action::ResetConfig);

        map.insert(ctrl_key('r'), Action::RefreshLogs);
        map.insert(key('d'), Action::DownloadLogs);

        map.insert(key('?'), Action::Help);
        map.insert(shift_key('?'), Action::Help);
    }

    fn vim_bindings() -> HashMap<KeyEvent, Action> {
        let mut map = HashMap::new();

        map.insert(key('j'), Action::Down);
        map.insert(key('k'), Action::Up);
        map.insert(key('g'), Action::Top);
        map.insert(shift_key('G'), Action::Bottom);
        map.insert(ctrl_key('d'), Action::PageDown);
        map.insert(ctrl_key('u'), Action::PageUp);
        map.insert(key('q'), Action::Quit);

        Self::common_bindings(&mut map);
        map
    }

    fn arrow_bindings() -> HashMap<KeyEvent, Action> {
        let mut map = HashMap::new();

        map.insert(key_code(KeyCode::Down), Action::Down);
        map.insert(key_code(KeyCode::Up), Action::Up);
        map.insert(key_code(KeyCode::Home), Action::Top);
        map.insert(key_code(KeyCode::End), Action::Bottom);
        map.insert(key_code(KeyCode::PageDown), Action::PageDown);
        map.insert(key_code(KeyCode::PageUp), Action::PageUp);
        map.insert(ctrl_key('q'), Action::Quit);
        map.insert(key('q'), Action::Quit);

        Self::common_bindings(&mut map);
        map
    }
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn shift_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::SHIFT)
}

fn ctrl_key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn shift_key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::SHIFT)
}

/// Format a KeyEvent for display
fn format_key_event(event: &KeyEvent) -> String {
    let mut parts = Vec::new();

    if event.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push("Ctrl+");
    }
    if event.modifiers.contains(KeyModifiers::SHIFT) {
        parts.push("Shift+");
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        parts.push("Alt+");
    }

    let key_str = match event.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        _ => format!("{:?}", event.code),
    };

    format!("{}{}", parts.join(""), key_str)
}

/// Get a human-readable description for an action
fn action_description(action: &Action) -> String {
    match action {
        Action::Up => "Move up".to_string(),
        Action::Down => "Move down".to_string(),
        Action::Top => "Go to top".to_string(),
        Action::Bottom => "Go to bottom".to_string(),
        Action::PageUp => "Page up".to_string(),
        Action::PageDown => "Page down".to_string(),
        Action::NextTab => "Next tab".to_string(),
        Action::PrevTab => "Previous tab".to_string(),
        Action::GotoStatus => "Status tab".to_string(),
        Action::GotoConfig => "Config tab".to_string(),
        Action::GotoLogs => "Logs tab".to_string(),
        Action::Open => "Open / edit / reprint".to_string(),
        Action::Back => "Go back / close".to_string(),
        Action::Quit => "Quit".to_string(),
        Action::StartService => "Start service".to_string(),
        Action::StopService => "Stop service".to_string(),
        Action::ManualCheck => "Manual mail check".to_string(),
        Action::Reprint => "Reprint selected job".to_string(),
        Action::ClearCache => "Clear print cache".to_string(),
        Action::SaveConfig => "Save settings".to_string(),
        Action::TestConnection => "Test mail connection".to_string(),
        Action::ResetConfig => "Reset settings to defaults".to_string(),
        Action::RefreshLogs => "Refresh logs".to_string(),
        Action::DownloadLogs => "Download logs".to_string(),
        Action::Help => "Toggle help".to_string(),
    }
}

/// Get the category for an action
fn action_category(action: &Action) -> &'static str {
    match action {
        Action::Up
        | Action::Down
        | Action::Top
        | Action::Bottom
        | Action::PageUp
        | Action::PageDown => "Navigation",

        Action::NextTab
        | Action::PrevTab
        | Action::GotoStatus
        | Action::GotoConfig
        | Action::GotoLogs => "Tabs",

        Action::Open | Action::Back | Action::Quit => "General",

        Action::StartService
        | Action::StopService
        | Action::ManualCheck
        | Action::Reprint
        | Action::ClearCache => "Service",

        Action::SaveConfig | Action::TestConnection | Action::ResetConfig => "Config",

        Action::RefreshLogs | Action::DownloadLogs => "Logs",

        Action::Help => "Help",
    }
}

/// Get sort order for categories
fn category_order(category: &str) -> u8 {
    match category {
        "Navigation" => 0,
        "Tabs" => 1,
        "General" => 2,
        "Service" => 3,
        "Config" => 4,
        "Logs" => 5,
        "Help" => 6,
        _ => 99,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vim_bindings() {
        let bindings = KeyBindings::new(&KeybindingMode::Vim);

        assert_eq!(bindings.get(&key('j')), Some(Action::Down));
        assert_eq!(bindings.get(&key('k')), Some(Action::Up));
        assert_eq!(bindings.get(&key('q')), Some(Action::Quit));
        assert_eq!(bindings.get(&key('s')), Some(Action::StartService));
    }

    #[test]
    fn test_arrow_bindings() {
        let bindings = KeyBindings::new(&KeybindingMode::Arrows);

        assert_eq!(bindings.get(&key_code(KeyCode::Down)), Some(Action::Down));
        assert_eq!(bindings.get(&key_code(KeyCode::Up)), Some(Action::Up));
        assert_eq!(bindings.get(&ctrl_key('q')), Some(Action::Quit));
    }

    #[test]
    fn tab_switching_is_mode_independent() {
        for mode in [KeybindingMode::Vim, KeybindingMode::Arrows] {
            let bindings = KeyBindings::new(&mode);
            assert_eq!(bindings.get(&key('1')), Some(Action::GotoStatus));
            assert_eq!(bindings.get(&key_code(KeyCode::Tab)), Some(Action::NextTab));
            assert_eq!(bindings.get(&ctrl_key('s')), Some(Action::SaveConfig));
        }
    }
}
