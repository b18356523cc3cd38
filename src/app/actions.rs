//! Keyboard action dispatch.

use crate::api::actor::ApiCommand;
use crate::api::types::ReprintRequest;
use crate::input::Action;

use super::App;
use super::state::{ConfigField, FieldKind, ModalState, Tab};

impl App {
    pub(crate) fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.state.should_quit = true,

            Action::NextTab => self.switch_tab(self.state.tab.next()),
            Action::PrevTab => self.switch_tab(self.state.tab.prev()),
            Action::GotoStatus => self.switch_tab(Tab::Status),
            Action::GotoConfig => self.switch_tab(Tab::Config),
            Action::GotoLogs => self.switch_tab(Tab::Logs),

            Action::Up => self.move_up(1),
            Action::Down => self.move_down(1),
            Action::PageUp => self.move_up(10),
            Action::PageDown => self.move_down(10),
            Action::Top => self.move_top(),
            Action::Bottom => self.move_bottom(),

            Action::Open => self.open_selected(),
            Action::Back => self.go_back(),

            Action::StartService => self.send_api(ApiCommand::StartService),
            Action::StopService => self.send_api(ApiCommand::StopService),
            Action::ManualCheck => self.send_api(ApiCommand::ManualCheck),
            Action::Reprint => self.reprint_selected(),
            Action::ClearCache => self.clear_cache(),

            Action::SaveConfig => self.save_config(),
            Action::TestConnection => self.test_connection(),
            Action::ResetConfig => self.reset_config(),

            Action::RefreshLogs => self.send_api(ApiCommand::FetchLogs),
            Action::DownloadLogs => self.send_api(ApiCommand::DownloadLogs),

            Action::Help => self.toggle_help(),
        }
    }

    pub(crate) fn handle_char(&mut self, c: char) {
        if let ModalState::ConfirmReset { input, .. } = &mut self.state.modal {
            input.push(c);
            return;
        }
        if let Some(buffer) = &mut self.state.form.editing {
            buffer.push(c);
        }
    }

    pub(crate) fn handle_backspace(&mut self) {
        if let ModalState::ConfirmReset { input, .. } = &mut self.state.modal {
            input.pop();
            return;
        }
        if let Some(buffer) = &mut self.state.form.editing {
            buffer.pop();
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.state.tab = tab;
        if tab == Tab::Logs && !self.state.logs.loaded {
            self.send_api(ApiCommand::FetchLogs);
        }
    }

    fn move_up(&mut self, n: usize) {
        if let ModalState::Help { scroll } = &mut self.state.modal {
            *scroll = scroll.saturating_sub(n);
            return;
        }
        match self.state.tab {
            Tab::Status => {
                self.state.selected_job = self.state.selected_job.saturating_sub(n);
            }
            Tab::Config => {
                for _ in 0..n {
                    self.state.form.select_prev();
                }
            }
            Tab::Logs => self.state.logs.scroll_up(n),
        }
    }

    fn move_down(&mut self, n: usize) {
        if let ModalState::Help { scroll } = &mut self.state.modal {
            *scroll += n;
            return;
        }
        match self.state.tab {
            Tab::Status => {
                for _ in 0..n {
                    self.state.select_next_job();
                }
            }
            Tab::Config => {
                for _ in 0..n {
                    self.state.form.select_next();
                }
            }
            Tab::Logs => self.state.logs.scroll_down(n),
        }
    }

    fn move_top(&mut self) {
        match self.state.tab {
            Tab::Status => self.state.selected_job = 0,
            Tab::Config => self.state.form.selected = 0,
            Tab::Logs => self.state.logs.scroll = 0,
        }
    }

    fn move_bottom(&mut self) {
        match self.state.tab {
            Tab::Status => {
                self.state.selected_job = self.state.dashboard.jobs.len().saturating_sub(1);
            }
            Tab::Config => self.state.form.selected = ConfigField::ALL.len() - 1,
            Tab::Logs => {
                self.state.logs.scroll = self.state.logs.lines.len().saturating_sub(1);
            }
        }
    }

    fn open_selected(&mut self) {
        match self.state.tab {
            Tab::Status => self.reprint_selected(),
            Tab::Config => self.open_config_field(),
            Tab::Logs => {}
        }
    }

    /// Enter on the config tab: commit an open edit, flip a toggle, or
    /// begin editing a text field.
    fn open_config_field(&mut self) {
        if self.state.form.editing.is_some() {
            self.state.form.commit_edit();
            return;
        }
        let field = self.state.form.field();
        match field.kind() {
            FieldKind::Toggle | FieldKind::Mode => self.state.form.toggle(field),
            _ => self.state.form.editing = Some(self.state.form.edit_seed(field)),
        }
    }

    fn go_back(&mut self) {
        if self.state.form.editing.is_some() {
            self.state.form.editing = None;
            return;
        }
        if self.state.modal.is_active() {
            self.state.modal = ModalState::None;
        }
    }

    fn reprint_selected(&mut self) {
        let Some(job) = self.state.dashboard.jobs.get(self.state.selected_job) else {
            self.state.notice.error("no job selected");
            return;
        };
        if !job.can_reprint {
            self.state.notice.error("selected job cannot be reprinted");
            return;
        }
        let Some(temp_file) = job.temp_file.clone() else {
            self.state.notice.error("job file no longer cached");
            return;
        };
        let source = Some(job.source);
        self.send_api(ApiCommand::Reprint(ReprintRequest { temp_file, source }));
    }

    fn clear_cache(&mut self) {
        if matches!(self.state.modal, ModalState::ConfirmClearCache) {
            self.state.modal = ModalState::None;
            self.send_api(ApiCommand::ClearCache);
        } else {
            self.state.modal = ModalState::ConfirmClearCache;
        }
    }

    fn save_config(&mut self) {
        self.state.form.commit_edit();
        if let Err(e) = self.state.form.config.validate() {
            self.state.notice.error(e.to_string());
            return;
        }
        let config = Box::new(self.state.form.config.clone());
        self.send_api(ApiCommand::SaveConfig(config));
    }

    fn test_connection(&mut self) {
        self.state.form.commit_edit();
        let config = Box::new(self.state.form.config.clone());
        self.send_api(ApiCommand::TestConnection(config));
    }

    fn reset_config(&mut self) {
        let confirming = match &self.state.modal {
            ModalState::ConfirmReset {
                secret_required,
                input,
            } => Some((*secret_required, input.clone())),
            _ => None,
        };

        match confirming {
            Some((secret_required, typed)) => {
                if secret_required && self.credentials.load().as_deref() != Some(typed.as_str()) {
                    self.state.notice.error("secret does not match");
                    self.state.modal = ModalState::ConfirmReset {
                        secret_required: true,
                        input: String::new(),
                    };
                    return;
                }
                self.state.modal = ModalState::None;
                self.send_api(ApiCommand::ResetConfig);
            }
            None => {
                self.state.modal = ModalState::ConfirmReset {
                    secret_required: self.state.form.config.auth_enabled
                        && self.credentials.has_secret(),
                    input: String::new(),
                };
            }
        }
    }

    fn toggle_help(&mut self) {
        self.state.modal = if self.state.modal.is_help() {
            ModalState::None
        } else {
            ModalState::Help { scroll: 0 }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_app() -> App {
        let mut config = Config::default();
        config.server.url = "http://127.0.0.1:1".to_string();
        App::new(config).unwrap()
    }

    #[tokio::test]
    async fn help_toggles_open_and_closed() {
        let mut app = test_app();
        app.handle_action(Action::Help);
        assert!(app.state.modal.is_help());
        app.handle_action(Action::Help);
        assert!(!app.state.modal.is_active());
    }

    #[tokio::test]
    async fn clear_cache_requires_confirmation() {
        let mut app = test_app();
        app.handle_action(Action::ClearCache);
        assert!(matches!(app.state.modal, ModalState::ConfirmClearCache));

        // second dispatch is the confirmation
        app.handle_action(Action::ClearCache);
        assert!(!app.state.modal.is_active());
    }

    #[tokio::test]
    async fn tab_switch_to_logs_marks_fetch() {
        let mut app = test_app();
        app.handle_action(Action::GotoLogs);
        assert_eq!(app.state.tab, Tab::Logs);
    }

    #[tokio::test]
    async fn editing_buffer_takes_chars_and_backspace() {
        let mut app = test_app();
        app.state.tab = Tab::Config;
        app.handle_action(Action::Open);
        assert!(app.state.form.editing.is_some());

        app.handle_char('m');
        app.handle_char('x');
        app.handle_backspace();
        assert_eq!(app.state.form.editing.as_deref(), Some("m"));

        app.handle_action(Action::Open);
        assert!(app.state.form.editing.is_none());
        assert_eq!(app.state.form.config.imap_host, "m");
        assert!(app.state.form.dirty);
    }

    #[tokio::test]
    async fn reprint_without_jobs_reports_error() {
        let mut app = test_app();
        app.handle_action(Action::Reprint);
        assert!(app.state.notice.current.is_some());
    }

    #[tokio::test]
    async fn reset_without_auth_skips_secret_entry() {
        let mut app = test_app();
        app.handle_action(Action::ResetConfig);
        let ModalState::ConfirmReset {
            secret_required, ..
        } = &app.state.modal
        else {
            panic!("expected reset confirmation");
        };
        assert!(!secret_required);
    }
}
