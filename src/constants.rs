//! Application-wide constants for tuning and configuration
//!
//! Centralizes magic numbers to make them discoverable and configurable.

/// Period in seconds between background status polls of the server.
pub const STATUS_POLL_PERIOD_SECS: u64 = 5;

/// Countdown tick granularity in milliseconds.
pub const COUNTDOWN_TICK_MS: u64 = 1000;

/// Remaining seconds at or below which the countdown switches to the
/// urgent style.
pub const URGENT_THRESHOLD_SECS: i64 = 10;

/// Fallback mail poll interval in seconds when the server config has
/// not been loaded yet.
pub const DEFAULT_MAIL_POLL_INTERVAL_SECS: i64 = 30;

/// Next-check value the server reports before the first scheduled check.
pub const PENDING_SENTINEL: &str = "Pending...";

/// Substring of the status text while the server is scanning the inbox.
/// The countdown is suppressed for its duration.
pub const SCANNING_SENTINEL: &str = "Scanning";

/// Transient notice display duration in seconds before auto-dismiss.
pub const NOTICE_TTL_SECS: u64 = 5;

/// Initial delay in seconds before reconnecting the push channel.
pub const PUSH_RECONNECT_INITIAL_SECS: u64 = 1;

/// Maximum delay in seconds between push channel reconnect attempts.
pub const PUSH_RECONNECT_MAX_SECS: u64 = 30;

/// HTTP request timeout in seconds for all server API calls.
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Number of recent log lines requested from the server.
pub const LOG_FETCH_LINES: usize = 100;

// === UI Constants ===

/// Input poll timeout in milliseconds while the countdown is running.
pub const INPUT_POLL_FAST_MS: u64 = 50;

/// Input poll timeout in milliseconds while the dashboard is quiescent.
pub const INPUT_POLL_SLOW_MS: u64 = 150;

/// Tab bar height in lines.
pub const TAB_BAR_HEIGHT: u16 = 1;

/// Status bar height in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Help bar height in lines.
pub const HELP_BAR_HEIGHT: u16 = 1;

/// Maximum display width in characters for job subjects in the table.
pub const SUBJECT_DISPLAY_WIDTH: usize = 50;
