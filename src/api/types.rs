//! Typed wire payloads for the FlowPrint server API.

use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;

/// How the service watches for print requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    #[default]
    EmailOnly,
    EmailPrimary,
    WebhookOnly,
    WebhookPrimary,
}

impl OperationMode {
    /// Modes that watch a mailbox, either as the sole source or as fallback.
    pub fn uses_email(self) -> bool {
        !matches!(self, OperationMode::WebhookOnly)
    }

    /// Modes that accept webhook submissions.
    pub fn uses_webhook(self) -> bool {
        !matches!(self, OperationMode::EmailOnly)
    }

    pub fn label(self) -> &'static str {
        match self {
            OperationMode::EmailOnly => "Email Only",
            OperationMode::EmailPrimary => "Email + Webhook Fallback",
            OperationMode::WebhookOnly => "Webhook Only",
            OperationMode::WebhookPrimary => "Webhook + Email Fallback",
        }
    }
}

/// The full server-side settings document.
///
/// The server masks `imap_password` as `***`; sending the mask back
/// verbatim keeps the stored credential unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub imap_host: String,
    #[serde(default = "default_imap_port")]
    pub imap_port: u16,
    #[serde(default = "default_true")]
    pub imap_use_ssl: bool,
    #[serde(default)]
    pub imap_username: String,
    #[serde(default)]
    pub imap_password: String,
    #[serde(default = "default_mailbox")]
    pub mailbox: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: i64,
    #[serde(default)]
    pub subject_prefix: String,
    #[serde(default = "default_true")]
    pub auto_print_enabled: bool,
    #[serde(default)]
    pub delete_email_after_print: bool,
    #[serde(default)]
    pub chrome_path: String,
    #[serde(default = "default_print_wait")]
    pub chrome_print_wait_seconds: i64,
    #[serde(default = "default_true")]
    pub temp_file_cleanup_enabled: bool,
    #[serde(default = "default_cleanup_hours")]
    pub temp_file_cleanup_hours: i64,
    #[serde(default)]
    pub operation_mode: OperationMode,
    #[serde(default)]
    pub webhook_secret: String,
    #[serde(default)]
    pub webhook_template: String,
    #[serde(default)]
    pub auth_enabled: bool,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub log_file: String,
}

fn default_imap_port() -> u16 {
    993
}

fn default_true() -> bool {
    true
}

fn default_mailbox() -> String {
    "Inbox".to_string()
}

fn default_poll_interval() -> i64 {
    30
}

fn default_print_wait() -> i64 {
    8
}

fn default_cleanup_hours() -> i64 {
    6
}

fn default_theme() -> String {
    "dark".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        // serde's field defaults are the single source of truth
        serde_json::from_str("{}").expect("empty config object deserializes")
    }
}

impl ServiceConfig {
    /// Presence checks for the fields the active mode depends on.
    ///
    /// The `***` mask counts as present; it means a credential is stored
    /// server-side.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mode = self.operation_mode;
        if mode.uses_email() {
            if self.imap_host.trim().is_empty() {
                return Err(ApiError::Validation("IMAP host is required".into()));
            }
            if self.imap_username.trim().is_empty() {
                return Err(ApiError::Validation("IMAP username is required".into()));
            }
            if self.imap_password.is_empty() {
                return Err(ApiError::Validation("IMAP password is required".into()));
            }
        }
        if mode.uses_webhook() && self.webhook_secret.trim().is_empty() {
            return Err(ApiError::Validation("webhook secret is required".into()));
        }
        Ok(())
    }
}

/// Where a print job came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JobSource {
    #[default]
    Email,
    Webhook,
}

impl JobSource {
    pub fn label(self) -> &'static str {
        match self {
            JobSource::Email => "email",
            JobSource::Webhook => "webhook",
        }
    }
}

/// One processed print job as the server reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Wall-clock `HH:MM:SS`; the server calls this field `time`.
    #[serde(rename = "time", default)]
    pub timestamp: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub action: String,
    /// Absent once the temp file has been cleaned up.
    #[serde(default)]
    pub temp_file: Option<String>,
    #[serde(default)]
    pub can_reprint: bool,
    #[serde(default)]
    pub source: JobSource,
}

/// One recorded processing error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(rename = "time", default)]
    pub timestamp: String,
    #[serde(default)]
    pub message: String,
}

/// Counters and schedules nested inside a status snapshot.
///
/// Every field is optional: push events may carry partial stats, and
/// absent fields leave the previously displayed values untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub last_check: Option<String>,
    pub next_check: Option<String>,
    pub messages_found: Option<u64>,
    pub jobs_processed: Option<u64>,
    pub jobs_pending: Option<u64>,
    pub last_cleanup: Option<String>,
    pub next_cleanup: Option<String>,
    #[serde(default)]
    pub recent_jobs: Vec<JobRecord>,
    #[serde(default)]
    pub errors: Vec<ErrorRecord>,
}

/// A point-in-time report of service state, from either channel.
///
/// `stats` is `None` when the payload carried no stats object at all;
/// prior displayed values stay in place. A present stats object replaces
/// lists wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub stats: Option<Stats>,
}

/// Uniform success/failure envelope for command endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiResponse {
    /// The human-readable text of this response, preferring the error.
    pub fn text(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| if self.success { "OK".into() } else { "request failed".into() })
    }
}

/// Body for `POST /api/reprint`.
#[derive(Debug, Clone, Serialize)]
pub struct ReprintRequest {
    pub temp_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<JobSource>,
}

/// Response body for `GET /api/logs`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg: ServiceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.imap_port, 993);
        assert!(cfg.imap_use_ssl);
        assert_eq!(cfg.mailbox, "Inbox");
        assert_eq!(cfg.poll_interval_seconds, 30);
        assert_eq!(cfg.operation_mode, OperationMode::EmailOnly);
        assert!(!cfg.auth_enabled);
    }

    #[test]
    fn operation_mode_round_trips_snake_case() {
        let json = "\"webhook_primary\"";
        let mode: OperationMode = serde_json::from_str(json).unwrap();
        assert_eq!(mode, OperationMode::WebhookPrimary);
        assert_eq!(serde_json::to_string(&mode).unwrap(), json);
    }

    #[test]
    fn validation_requires_imap_fields_for_email_modes() {
        let mut cfg = ServiceConfig::default();
        cfg.operation_mode = OperationMode::EmailOnly;
        assert!(cfg.validate().is_err());

        cfg.imap_host = "mail.example.com".into();
        cfg.imap_username = "printer".into();
        cfg.imap_password = "***".into();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validation_requires_webhook_secret_for_webhook_modes() {
        let mut cfg = ServiceConfig::default();
        cfg.operation_mode = OperationMode::WebhookOnly;
        assert!(cfg.validate().is_err());

        cfg.webhook_secret = "s3cret".into();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn primary_modes_require_both_sets() {
        let mut cfg = ServiceConfig::default();
        cfg.operation_mode = OperationMode::WebhookPrimary;
        cfg.webhook_secret = "s3cret".into();
        assert!(cfg.validate().is_err());

        cfg.imap_host = "mail.example.com".into();
        cfg.imap_username = "printer".into();
        cfg.imap_password = "pw".into();
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn snapshot_with_partial_stats_parses() {
        let json = r#"{
            "running": true,
            "status": "Idle - Waiting for next check",
            "stats": {
                "next_check": "14:32:05",
                "jobs_processed": 7,
                "recent_jobs": [
                    {"time": "14:30:00", "subject": "invoice.pdf",
                     "action": "printed", "temp_file": null,
                     "can_reprint": false, "source": "webhook"}
                ]
            }
        }"#;
        let snap: StatusSnapshot = serde_json::from_str(json).unwrap();
        assert!(snap.running);
        let stats = snap.stats.unwrap();
        assert_eq!(stats.next_check.as_deref(), Some("14:32:05"));
        assert_eq!(stats.jobs_processed, Some(7));
        assert!(stats.messages_found.is_none());
        assert_eq!(stats.recent_jobs.len(), 1);
        assert_eq!(stats.recent_jobs[0].source, JobSource::Webhook);
        assert!(stats.recent_jobs[0].temp_file.is_none());
    }

    #[test]
    fn snapshot_without_stats_parses_as_none() {
        let snap: StatusSnapshot =
            serde_json::from_str(r#"{"running": false, "status": "Stopped"}"#).unwrap();
        assert!(snap.stats.is_none());
    }

    #[test]
    fn malformed_snapshot_is_rejected() {
        let json = r#"{"running": "maybe"}"#;
        assert!(serde_json::from_str::<StatusSnapshot>(json).is_err());
    }

    #[test]
    fn api_response_prefers_error_text() {
        let resp: ApiResponse =
            serde_json::from_str(r#"{"success": false, "message": "ok", "error": "boom"}"#)
                .unwrap();
        assert_eq!(resp.text(), "boom");
    }

    #[test]
    fn reprint_request_omits_absent_source() {
        let req = ReprintRequest {
            temp_file: "/tmp/flowprint/abc.html".into(),
            source: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("source"));
    }
}
