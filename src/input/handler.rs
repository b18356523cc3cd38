use crossterm::event::{Event, KeyCode, KeyEvent};

use super::keybindings::{Action, KeyBindings};
use crate::app::state::{AppState, ModalState};

pub enum InputResult {
    Continue,
    Quit,
    Action(Action),
    Char(char),
    Backspace,
}

pub fn handle_input(event: Event, state: &AppState, bindings: &KeyBindings) -> InputResult {
    match event {
        Event::Key(key_event) => handle_key(key_event, state, bindings),
        _ => InputResult::Continue,
    }
}

fn handle_key(key: KeyEvent, state: &AppState, bindings: &KeyBindings) -> InputResult {
    // Modal input takes precedence over everything else
    match &state.modal {
        ModalState::ConfirmReset { secret_required, .. } => {
            return handle_confirm_reset(key, *secret_required);
        }
        ModalState::ConfirmClearCache => return handle_confirm_clear_cache(key),
        ModalState::Help { .. } => return handle_help_input(key, bindings),
        ModalState::None => {}
    }

    // A field being edited captures text input
    if state.form.editing.is_some() {
        return handle_field_edit(key, bindings);
    }

    if let Some(action) = bindings.get(&key) {
        if action == Action::Quit {
            return InputResult::Quit;
        }
        return InputResult::Action(action);
    }

    InputResult::Continue
}

fn handle_field_edit(key: KeyEvent, bindings: &KeyBindings) -> InputResult {
    // Ctrl+S commits the edit and saves in one step
    if let Some(Action::SaveConfig) = bindings.get(&key) {
        return InputResult::Action(Action::SaveConfig);
    }

    match key.code {
        KeyCode::Char(c) => InputResult::Char(c),
        KeyCode::Backspace => InputResult::Backspace,
        KeyCode::Enter => InputResult::Action(Action::Open),
        KeyCode::Esc => InputResult::Action(Action::Back),
        _ => InputResult::Continue,
    }
}

fn handle_confirm_reset(key: KeyEvent, secret_required: bool) -> InputResult {
    if secret_required {
        // Secret entry: typed characters build the confirmation input
        return match key.code {
            KeyCode::Char(c) => InputResult::Char(c),
            KeyCode::Backspace => InputResult::Backspace,
            KeyCode::Enter => InputResult::Action(Action::ResetConfig),
            KeyCode::Esc => InputResult::Action(Action::Back),
            _ => InputResult::Continue,
        };
    }

    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            InputResult::Action(Action::ResetConfig)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => InputResult::Action(Action::Back),
        _ => InputResult::Continue,
    }
}

fn handle_confirm_clear_cache(key: KeyEvent) -> InputResult {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            InputResult::Action(Action::ClearCache)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => InputResult::Action(Action::Back),
        _ => InputResult::Continue,
    }
}

fn handle_help_input(key: KeyEvent, bindings: &KeyBindings) -> InputResult {
    if let Some(action) = bindings.get(&key) {
        match action {
            Action::Help => return InputResult::Action(Action::Help),
            Action::Up | Action::Down => return InputResult::Action(action),
            _ => {}
        }
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => InputResult::Action(Action::Help),
        KeyCode::Up | KeyCode::Char('k') => InputResult::Action(Action::Up),
        KeyCode::Down | KeyCode::Char('j') => InputResult::Action(Action::Down),
        _ => InputResult::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeybindingMode;
    use crossterm::event::KeyModifiers;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn quit_maps_to_quit() {
        let bindings = KeyBindings::new(&KeybindingMode::Vim);
        let state = AppState::default();

        let result = handle_key(key('q'), &state, &bindings);
        assert!(matches!(result, InputResult::Quit));
    }

    #[test]
    fn editing_captures_characters() {
        let bindings = KeyBindings::new(&KeybindingMode::Vim);
        let mut state = AppState::default();
        state.form.editing = Some(String::new());

        let result = handle_key(key('q'), &state, &bindings);
        assert!(matches!(result, InputResult::Char('q')));

        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(matches!(
            handle_key(esc, &state, &bindings),
            InputResult::Action(Action::Back)
        ));
    }

    #[test]
    fn clear_cache_confirmation() {
        let bindings = KeyBindings::new(&KeybindingMode::Vim);
        let mut state = AppState::default();
        state.modal = ModalState::ConfirmClearCache;

        assert!(matches!(
            handle_key(key('y'), &state, &bindings),
            InputResult::Action(Action::ClearCache)
        ));
        assert!(matches!(
            handle_key(key('n'), &state, &bindings),
            InputResult::Action(Action::Back)
        ));
    }

    #[test]
    fn reset_with_secret_takes_text() {
        let bindings = KeyBindings::new(&KeybindingMode::Vim);
        let mut state = AppState::default();
        state.modal = ModalState::ConfirmReset {
            secret_required: true,
            input: String::new(),
        };

        assert!(matches!(
            handle_key(key('a'), &state, &bindings),
            InputResult::Char('a')
        ));
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert!(matches!(
            handle_key(enter, &state, &bindings),
            InputResult::Action(Action::ResetConfig)
        ));
    }
}
