//! Application state shared between the event loop and the render thread.
//!
//! `AppState` is cloneable so the event loop can ship snapshots to the
//! background render thread without locking.

use std::time::Instant;

use crate::api::types::{OperationMode, ServiceConfig};
use crate::constants::NOTICE_TTL_SECS;
use crate::input::KeybindingEntry;
use crate::status::reconcile::DashboardView;

/// Top-level tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Status,
    Config,
    Logs,
}

impl Tab {
    pub fn next(self) -> Self {
        match self {
            Tab::Status => Tab::Config,
            Tab::Config => Tab::Logs,
            Tab::Logs => Tab::Status,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Tab::Status => Tab::Logs,
            Tab::Config => Tab::Status,
            Tab::Logs => Tab::Config,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Status => "Status",
            Tab::Config => "Config",
            Tab::Logs => "Logs",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Status => 0,
            Tab::Config => 1,
            Tab::Logs => 2,
        }
    }
}

/// One editable field of the settings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    ImapHost,
    ImapPort,
    ImapUseSsl,
    ImapUsername,
    ImapPassword,
    Mailbox,
    PollIntervalSeconds,
    SubjectPrefix,
    AutoPrintEnabled,
    DeleteEmailAfterPrint,
    ChromePath,
    ChromePrintWaitSeconds,
    TempFileCleanupEnabled,
    TempFileCleanupHours,
    OperationMode,
    WebhookSecret,
    WebhookTemplate,
    AuthEnabled,
    Theme,
    LogFile,
}

/// How a field is edited and rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Secret,
    Number,
    Toggle,
    Mode,
}

impl ConfigField {
    pub const ALL: [ConfigField; 20] = [
        ConfigField::ImapHost,
        ConfigField::ImapPort,
        ConfigField::ImapUseSsl,
        ConfigField::ImapUsername,
        ConfigField::ImapPassword,
        ConfigField::Mailbox,
        ConfigField::PollIntervalSeconds,
        ConfigField::SubjectPrefix,
        ConfigField::AutoPrintEnabled,
        ConfigField::DeleteEmailAfterPrint,
        ConfigField::ChromePath,
        ConfigField::ChromePrintWaitSeconds,
        ConfigField::TempFileCleanupEnabled,
        ConfigField::TempFileCleanupHours,
        ConfigField::OperationMode,
        ConfigField::WebhookSecret,
        ConfigField::WebhookTemplate,
        ConfigField::AuthEnabled,
        ConfigField::Theme,
        ConfigField::LogFile,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConfigField::ImapHost => "IMAP host",
            ConfigField::ImapPort => "IMAP port",
            ConfigField::ImapUseSsl => "IMAP SSL",
            ConfigField::ImapUsername => "IMAP username",
            ConfigField::ImapPassword => "IMAP password",
            ConfigField::Mailbox => "Mailbox",
            ConfigField::PollIntervalSeconds => "Mail poll interval (s)",
            ConfigField::SubjectPrefix => "Subject prefix",
            ConfigField::AutoPrintEnabled => "Auto print",
            ConfigField::DeleteEmailAfterPrint => "Delete mail after print",
            ConfigField::ChromePath => "Chrome path",
            ConfigField::ChromePrintWaitSeconds => "Print wait (s)",
            ConfigField::TempFileCleanupEnabled => "Temp file cleanup",
            ConfigField::TempFileCleanupHours => "Cleanup age (h)",
            ConfigField::OperationMode => "Operation mode",
            ConfigField::WebhookSecret => "Webhook secret",
            ConfigField::WebhookTemplate => "Webhook template",
            ConfigField::AuthEnabled => "Authentication",
            ConfigField::Theme => "Server theme",
            ConfigField::LogFile => "Log file",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            ConfigField::ImapPort
            | ConfigField::PollIntervalSeconds
            | ConfigField::ChromePrintWaitSeconds
            | ConfigField::TempFileCleanupHours => FieldKind::Number,
            ConfigField::ImapUseSsl
            | ConfigField::AutoPrintEnabled
            | ConfigField::DeleteEmailAfterPrint
            | ConfigField::TempFileCleanupEnabled
            | ConfigField::AuthEnabled => FieldKind::Toggle,
            ConfigField::ImapPassword | ConfigField::WebhookSecret => FieldKind::Secret,
            ConfigField::OperationMode => FieldKind::Mode,
            _ => FieldKind::Text,
        }
    }
}

/// The settings form: a working copy of the server config plus cursor.
#[derive(Debug, Clone, Default)]
pub struct ConfigForm {
    pub config: ServiceConfig,
    pub selected: usize,
    /// Text buffer while a field is being edited.
    pub editing: Option<String>,
    pub dirty: bool,
    pub loaded: bool,
}

impl ConfigForm {
    pub fn field(&self) -> ConfigField {
        ConfigField::ALL[self.selected.min(ConfigField::ALL.len() - 1)]
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < ConfigField::ALL.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Load a fresh server config, dropping any local edits.
    pub fn load(&mut self, config: ServiceConfig) {
        self.config = config;
        self.editing = None;
        self.dirty = false;
        self.loaded = true;
    }

    /// Current display value of a field. Secrets are masked.
    pub fn display_value(&self, field: ConfigField) -> String {
        let c = &self.config;
        match field {
            ConfigField::ImapHost => c.imap_host.clone(),
            ConfigField::ImapPort => c.imap_port.to_string(),
            ConfigField::ImapUseSsl => toggle_text(c.imap_use_ssl),
            ConfigField::ImapUsername => c.imap_username.clone(),
            ConfigField::ImapPassword => mask(&c.imap_password),
            ConfigField::Mailbox => c.mailbox.clone(),
            ConfigField::PollIntervalSeconds => c.poll_interval_seconds.to_string(),
            ConfigField::SubjectPrefix => c.subject_prefix.clone(),
            ConfigField::AutoPrintEnabled => toggle_text(c.auto_print_enabled),
            ConfigField::DeleteEmailAfterPrint => toggle_text(c.delete_email_after_print),
            ConfigField::ChromePath => c.chrome_path.clone(),
            ConfigField::ChromePrintWaitSeconds => c.chrome_print_wait_seconds.to_string(),
            ConfigField::TempFileCleanupEnabled => toggle_text(c.temp_file_cleanup_enabled),
            ConfigField::TempFileCleanupHours => c.temp_file_cleanup_hours.to_string(),
            ConfigField::OperationMode => c.operation_mode.label().to_string(),
            ConfigField::WebhookSecret => mask(&c.webhook_secret),
            ConfigField::WebhookTemplate => c.webhook_template.clone(),
            ConfigField::AuthEnabled => toggle_text(c.auth_enabled),
            ConfigField::Theme => c.theme.clone(),
            ConfigField::LogFile => c.log_file.clone(),
        }
    }

    /// Raw edit buffer seed for a field. The stored password mask is
    /// kept as-is so saving it unchanged preserves the server credential.
    pub fn edit_seed(&self, field: ConfigField) -> String {
        let c = &self.config;
        match field {
            ConfigField::ImapPassword => c.imap_password.clone(),
            ConfigField::WebhookSecret => c.webhook_secret.clone(),
            _ => self.display_value(field),
        }
    }

    /// Flip a toggle field or cycle the operation mode in place.
    pub fn toggle(&mut self, field: ConfigField) {
        let c = &mut self.config;
        match field {
            ConfigField::ImapUseSsl => c.imap_use_ssl = !c.imap_use_ssl,
            ConfigField::AutoPrintEnabled => c.auto_print_enabled = !c.auto_print_enabled,
            ConfigField::DeleteEmailAfterPrint => {
                c.delete_email_after_print = !c.delete_email_after_print
            }
            ConfigField::TempFileCleanupEnabled => {
                c.temp_file_cleanup_enabled = !c.temp_file_cleanup_enabled
            }
            ConfigField::AuthEnabled => c.auth_enabled = !c.auth_enabled,
            ConfigField::OperationMode => {
                c.operation_mode = match c.operation_mode {
                    OperationMode::EmailOnly => OperationMode::EmailPrimary,
                    OperationMode::EmailPrimary => OperationMode::WebhookOnly,
                    OperationMode::WebhookOnly => OperationMode::WebhookPrimary,
                    OperationMode::WebhookPrimary => OperationMode::EmailOnly,
                };
            }
            _ => return,
        }
        self.dirty = true;
    }

    /// Commit the edit buffer into the selected field.
    ///
    /// Numeric fields that fail to parse keep their previous value.
    pub fn commit_edit(&mut self) {
        let Some(buffer) = self.editing.take() else {
            return;
        };
        let field = self.field();
        let c = &mut self.config;
        match field {
            ConfigField::ImapHost => c.imap_host = buffer,
            ConfigField::ImapPort => {
                if let Ok(port) = buffer.trim().parse() {
                    c.imap_port = port;
                }
            }
            ConfigField::ImapUsername => c.imap_username = buffer,
            ConfigField::ImapPassword => c.imap_password = buffer,
            ConfigField::Mailbox => c.mailbox = buffer,
            ConfigField::PollIntervalSeconds => {
                if let Ok(secs) = buffer.trim().parse::<i64>()
                    && secs > 0
                {
                    c.poll_interval_seconds = secs;
                }
            }
            ConfigField::SubjectPrefix => c.subject_prefix = buffer,
            ConfigField::ChromePath => c.chrome_path = buffer,
            ConfigField::ChromePrintWaitSeconds => {
                if let Ok(secs) = buffer.trim().parse() {
                    c.chrome_print_wait_seconds = secs;
                }
            }
            ConfigField::TempFileCleanupHours => {
                if let Ok(hours) = buffer.trim().parse() {
                    c.temp_file_cleanup_hours = hours;
                }
            }
            ConfigField::WebhookSecret => c.webhook_secret = buffer,
            ConfigField::WebhookTemplate => c.webhook_template = buffer,
            ConfigField::Theme => c.theme = buffer,
            ConfigField::LogFile => c.log_file = buffer,
            // toggles and mode are flipped in place, never text-edited
            _ => return,
        }
        self.dirty = true;
    }
}

fn toggle_text(on: bool) -> String {
    if on { "on" } else { "off" }.to_string()
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        String::new()
    } else {
        "***".to_string()
    }
}

/// Modal overlay state, one at a time.
#[derive(Debug, Clone, Default)]
pub enum ModalState {
    #[default]
    None,
    Help {
        scroll: usize,
    },
    ConfirmClearCache,
    /// Settings reset. When the server has auth enabled the stored
    /// secret must be re-typed; otherwise a plain y/n confirm.
    ConfirmReset {
        secret_required: bool,
        input: String,
    },
}

impl ModalState {
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }

    pub fn is_help(&self) -> bool {
        matches!(self, Self::Help { .. })
    }
}

/// Kind of transient notice shown in the status bar area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message with a TTL.
#[derive(Debug, Clone, Default)]
pub struct NoticeState {
    pub current: Option<(String, NoticeKind)>,
    shown_at: Option<Instant>,
}

impl NoticeState {
    pub fn success(&mut self, text: impl ToString) {
        self.current = Some((text.to_string(), NoticeKind::Success));
        self.shown_at = Some(Instant::now());
    }

    pub fn error(&mut self, text: impl ToString) {
        self.current = Some((text.to_string(), NoticeKind::Error));
        self.shown_at = Some(Instant::now());
    }

    /// Drop the notice once its TTL has elapsed. True if it was cleared.
    pub fn clear_if_expired(&mut self) -> bool {
        if let Some(at) = self.shown_at
            && at.elapsed().as_secs() >= NOTICE_TTL_SECS
        {
            self.current = None;
            self.shown_at = None;
            true
        } else {
            false
        }
    }
}

/// Health of the two update channels.
#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    /// Last poll round-trip succeeded.
    pub api_ok: bool,
    pub push_connected: bool,
    pub last_update: Option<Instant>,
}

/// Logs tab state.
#[derive(Debug, Clone, Default)]
pub struct LogsState {
    pub lines: Vec<String>,
    pub scroll: usize,
    pub loaded: bool,
}

impl LogsState {
    pub fn load(&mut self, lines: Vec<String>) {
        self.lines = lines;
        self.scroll = self.lines.len().saturating_sub(1);
        self.loaded = true;
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.scroll = (self.scroll + n).min(self.lines.len().saturating_sub(1));
    }
}

/// The whole UI state, cloned per frame for the render thread.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tab: Tab,
    pub dashboard: DashboardView,
    pub form: ConfigForm,
    pub logs: LogsState,
    pub modal: ModalState,
    pub notice: NoticeState,
    pub connection: ConnectionState,
    /// Selected row in the status tab's job table.
    pub selected_job: usize,
    /// Keymap entries shown in the help overlay, fixed at startup.
    pub help_entries: Vec<KeybindingEntry>,
    pub should_quit: bool,
}

impl AppState {
    pub fn select_next_job(&mut self) {
        if !self.dashboard.jobs.is_empty() {
            self.selected_job = (self.selected_job + 1).min(self.dashboard.jobs.len() - 1);
        }
    }

    pub fn select_prev_job(&mut self) {
        self.selected_job = self.selected_job.saturating_sub(1);
    }

    /// Keep the job cursor valid after a wholesale list replacement.
    pub fn clamp_job_selection(&mut self) {
        if self.dashboard.jobs.is_empty() {
            self.selected_job = 0;
        } else {
            self.selected_job = self.selected_job.min(self.dashboard.jobs.len() - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_cycle_wraps() {
        assert_eq!(Tab::Logs.next(), Tab::Status);
        assert_eq!(Tab::Status.prev(), Tab::Logs);
    }

    #[test]
    fn form_commit_parses_numbers_and_keeps_bad_input_out() {
        let mut form = ConfigForm::default();
        form.selected = ConfigField::ALL
            .iter()
            .position(|f| *f == ConfigField::ImapPort)
            .unwrap();
        form.editing = Some("2993".into());
        form.commit_edit();
        assert_eq!(form.config.imap_port, 2993);
        assert!(form.dirty);

        form.editing = Some("not a port".into());
        form.commit_edit();
        assert_eq!(form.config.imap_port, 2993);
    }

    #[test]
    fn poll_interval_rejects_zero() {
        let mut form = ConfigForm::default();
        form.selected = ConfigField::ALL
            .iter()
            .position(|f| *f == ConfigField::PollIntervalSeconds)
            .unwrap();
        form.editing = Some("0".into());
        form.commit_edit();
        assert_eq!(form.config.poll_interval_seconds, 30);
    }

    #[test]
    fn password_mask_round_trips() {
        let mut form = ConfigForm::default();
        form.config.imap_password = "***".into();
        assert_eq!(form.display_value(ConfigField::ImapPassword), "***");
        // seeding an edit with the mask and committing keeps it verbatim
        form.selected = ConfigField::ALL
            .iter()
            .position(|f| *f == ConfigField::ImapPassword)
            .unwrap();
        form.editing = Some(form.edit_seed(ConfigField::ImapPassword));
        form.commit_edit();
        assert_eq!(form.config.imap_password, "***");
    }

    #[test]
    fn mode_cycles_through_all_four() {
        let mut form = ConfigForm::default();
        let start = form.config.operation_mode;
        for _ in 0..4 {
            form.toggle(ConfigField::OperationMode);
        }
        assert_eq!(form.config.operation_mode, start);
    }

    #[test]
    fn job_selection_clamps_after_replacement() {
        let mut state = AppState::default();
        state.selected_job = 5;
        state.clamp_job_selection();
        assert_eq!(state.selected_job, 0);
    }
}
