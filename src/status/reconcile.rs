//! Status reconciliation: snapshots in, derived view-state out.
//!
//! Both update channels (the 5-second poll and the push socket) feed the
//! same entry point. Snapshots may interleave in any order; each call is
//! the unit of atomicity and the last writer wins. No version or
//! timestamp comparison is performed between channels.

use crate::api::types::{ErrorRecord, JobRecord, JobSource, OperationMode, ServiceConfig, Stats, StatusSnapshot};
use crate::status::banner::{self, Banner};
use crate::status::countdown::CountdownView;
use crate::status::text::sanitize_line;

/// What the reconciler wants the countdown engine to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownCommand {
    /// (Re)start toward the given `HH:MM:SS` target with the captured
    /// poll-interval denominator.
    Start {
        target: String,
        poll_interval_secs: i64,
    },
    Stop,
}

/// One job row, sanitized for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRow {
    pub timestamp: String,
    pub subject: String,
    pub action: String,
    pub temp_file: Option<String>,
    pub can_reprint: bool,
    pub source: JobSource,
}

impl JobRow {
    fn from_record(record: &JobRecord) -> Self {
        JobRow {
            timestamp: sanitize_line(&record.timestamp),
            subject: sanitize_line(&record.subject),
            action: sanitize_line(&record.action),
            temp_file: record.temp_file.clone(),
            can_reprint: record.can_reprint,
            source: record.source,
        }
    }
}

/// One error row, sanitized for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRow {
    pub timestamp: String,
    pub message: String,
}

impl ErrorRow {
    fn from_record(record: &ErrorRecord) -> Self {
        ErrorRow {
            timestamp: sanitize_line(&record.timestamp),
            message: sanitize_line(&record.message),
        }
    }
}

/// Everything the status tab renders, derived from snapshots.
///
/// The countdown field is written by the event loop from the engine's
/// ticks; the reconciler owns the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub running: bool,
    pub banner: Banner,
    pub messages_found: u64,
    pub jobs_processed: u64,
    pub jobs_pending: u64,
    pub last_check: Option<String>,
    pub next_check: Option<String>,
    pub last_cleanup: Option<String>,
    pub next_cleanup: Option<String>,
    pub jobs: Vec<JobRow>,
    pub errors: Vec<ErrorRow>,
    pub countdown: Option<CountdownView>,
}

impl Default for DashboardView {
    fn default() -> Self {
        DashboardView {
            running: false,
            banner: Banner::stopped(),
            messages_found: 0,
            jobs_processed: 0,
            jobs_pending: 0,
            last_check: None,
            next_check: None,
            last_cleanup: None,
            next_cleanup: None,
            jobs: Vec::new(),
            errors: Vec::new(),
            countdown: None,
        }
    }
}

/// Merges snapshots into the dashboard view and drives the countdown.
#[derive(Debug, Clone)]
pub struct Reconciler {
    mode: OperationMode,
    poll_interval_secs: i64,
    processing: bool,
    running: bool,
    last_status: String,
    next_check: Option<String>,
}

impl Reconciler {
    pub fn new() -> Self {
        Reconciler {
            mode: OperationMode::default(),
            poll_interval_secs: crate::constants::DEFAULT_MAIL_POLL_INTERVAL_SECS,
            processing: false,
            running: false,
            last_status: String::new(),
            next_check: None,
        }
    }

    /// Pick up mode and poll interval from a freshly loaded server config.
    pub fn apply_config(&mut self, config: &ServiceConfig) {
        self.mode = config.operation_mode;
        if config.poll_interval_seconds > 0 {
            self.poll_interval_secs = config.poll_interval_seconds;
        }
    }

    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    /// Merge a snapshot from either channel into the view.
    ///
    /// Returns the command the engine must apply before the next tick.
    pub fn reconcile(
        &mut self,
        view: &mut DashboardView,
        snapshot: &StatusSnapshot,
    ) -> CountdownCommand {
        self.running = snapshot.running;
        view.running = snapshot.running;

        if !snapshot.running {
            // job and error lists are assumed unchanged while stopped
            view.banner = Banner::stopped();
            view.countdown = None;
            return CountdownCommand::Stop;
        }

        self.last_status = snapshot.status.clone();
        if let Some(stats) = &snapshot.stats {
            self.next_check = stats.next_check.clone();
            Self::merge_stats(view, stats);
        }

        self.resolve_running(view)
    }

    /// Flip the transient webhook-processing flag from a push event.
    ///
    /// Clearing it re-evaluates the banner against the latest known mode
    /// and status, not the snapshot that was current when it was set.
    pub fn set_processing(
        &mut self,
        view: &mut DashboardView,
        processing: bool,
    ) -> CountdownCommand {
        self.processing = processing;
        if !self.running {
            view.banner = Banner::stopped();
            view.countdown = None;
            return CountdownCommand::Stop;
        }
        self.resolve_running(view)
    }

    fn resolve_running(&self, view: &mut DashboardView) -> CountdownCommand {
        let banner = banner::resolve(self.mode, self.processing, &self.last_status);
        let show = banner.show_countdown;
        view.banner = banner;

        if !show {
            view.countdown = None;
            return CountdownCommand::Stop;
        }

        match &self.next_check {
            Some(target)
                if target != crate::constants::PENDING_SENTINEL
                    && !self.last_status.contains(crate::constants::SCANNING_SENTINEL) =>
            {
                CountdownCommand::Start {
                    target: target.clone(),
                    poll_interval_secs: self.poll_interval_secs,
                }
            }
            _ => {
                view.countdown = None;
                CountdownCommand::Stop
            }
        }
    }

    fn merge_stats(view: &mut DashboardView, stats: &Stats) {
        if let Some(n) = stats.messages_found {
            view.messages_found = n;
        }
        if let Some(n) = stats.jobs_processed {
            view.jobs_processed = n;
        }
        if let Some(n) = stats.jobs_pending {
            view.jobs_pending = n;
        }
        if stats.last_check.is_some() {
            view.last_check = stats.last_check.clone();
        }
        view.next_check = stats.next_check.clone();
        if stats.last_cleanup.is_some() {
            view.last_cleanup = stats.last_cleanup.clone();
        }
        if stats.next_cleanup.is_some() {
            view.next_cleanup = stats.next_cleanup.clone();
        }
        view.jobs = stats.recent_jobs.iter().map(JobRow::from_record).collect();
        view.errors = stats.errors.iter().map(ErrorRow::from_record).collect();
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::banner::BannerKind;

    fn running_snapshot(status: &str, next_check: Option<&str>) -> StatusSnapshot {
        StatusSnapshot {
            running: true,
            status: status.to_string(),
            stats: Some(Stats {
                next_check: next_check.map(str::to_string),
                ..Stats::default()
            }),
        }
    }

    fn email_reconciler(poll: i64) -> Reconciler {
        let mut r = Reconciler::new();
        let config = ServiceConfig {
            operation_mode: OperationMode::EmailOnly,
            poll_interval_seconds: poll,
            ..ServiceConfig::default()
        };
        r.apply_config(&config);
        r
    }

    #[test]
    fn stopped_snapshot_stops_countdown_despite_next_check() {
        let mut r = email_reconciler(30);
        let mut view = DashboardView::default();

        let snapshot = StatusSnapshot {
            running: false,
            status: "Stopped".into(),
            stats: Some(Stats {
                next_check: Some("14:30:00".into()),
                ..Stats::default()
            }),
        };
        let cmd = r.reconcile(&mut view, &snapshot);
        assert_eq!(cmd, CountdownCommand::Stop);
        assert_eq!(view.banner.kind, BannerKind::Stopped);
        assert_eq!(view.banner.caption, "Stopped");
        assert!(!view.running);
    }

    #[test]
    fn stopped_snapshot_leaves_lists_untouched() {
        let mut r = email_reconciler(30);
        let mut view = DashboardView::default();
        view.jobs.push(JobRow {
            timestamp: "14:20".into(),
            subject: "report".into(),
            action: "Printed".into(),
            temp_file: Some("t1".into()),
            can_reprint: true,
            source: JobSource::Email,
        });

        let snapshot = StatusSnapshot {
            running: false,
            status: "Stopped".into(),
            stats: None,
        };
        r.reconcile(&mut view, &snapshot);
        assert_eq!(view.jobs.len(), 1);
    }

    #[test]
    fn running_email_mode_starts_countdown() {
        let mut r = email_reconciler(60);
        let mut view = DashboardView::default();

        let cmd = r.reconcile(&mut view, &running_snapshot("Idle", Some("14:30:00")));
        assert_eq!(
            cmd,
            CountdownCommand::Start {
                target: "14:30:00".into(),
                poll_interval_secs: 60,
            }
        );
        assert_eq!(view.banner.caption, "Idle");
        assert_eq!(view.banner.kind, BannerKind::Active);
    }

    #[test]
    fn pending_next_check_stops_countdown() {
        let mut r = email_reconciler(30);
        let mut view = DashboardView::default();

        let cmd = r.reconcile(&mut view, &running_snapshot("Idle", Some("Pending...")));
        assert_eq!(cmd, CountdownCommand::Stop);
    }

    #[test]
    fn scanning_status_suppresses_countdown() {
        let mut r = email_reconciler(30);
        let mut view = DashboardView::default();

        let cmd = r.reconcile(
            &mut view,
            &running_snapshot("Scanning inbox...", Some("14:30:00")),
        );
        assert_eq!(cmd, CountdownCommand::Stop);
        assert_eq!(view.banner.caption, "Scanning inbox...");
    }

    #[test]
    fn webhook_only_never_starts_countdown() {
        let mut r = Reconciler::new();
        r.apply_config(&ServiceConfig {
            operation_mode: OperationMode::WebhookOnly,
            webhook_secret: "s".into(),
            ..ServiceConfig::default()
        });
        let mut view = DashboardView::default();

        let cmd = r.reconcile(&mut view, &running_snapshot("Idle", Some("14:30:00")));
        assert_eq!(cmd, CountdownCommand::Stop);
        assert_eq!(view.banner.caption, "Waiting for Webhook");
        assert!(view.countdown.is_none());
    }

    #[test]
    fn stats_replace_lists_wholesale() {
        let mut r = email_reconciler(30);
        let mut view = DashboardView::default();

        let first = StatusSnapshot {
            running: true,
            status: "Idle".into(),
            stats: Some(Stats {
                next_check: Some("14:30:00".into()),
                recent_jobs: vec![
                    JobRecord {
                        timestamp: "14:20".into(),
                        subject: "a".into(),
                        action: "Printed".into(),
                        temp_file: Some("t1".into()),
                        can_reprint: true,
                        source: JobSource::Email,
                    },
                    JobRecord {
                        timestamp: "14:21".into(),
                        subject: "b".into(),
                        action: "Printed".into(),
                        temp_file: Some("t2".into()),
                        can_reprint: true,
                        source: JobSource::Email,
                    },
                ],
                ..Stats::default()
            }),
        };
        r.reconcile(&mut view, &first);
        assert_eq!(view.jobs.len(), 2);

        let second = running_snapshot("Idle", Some("14:31:00"));
        r.reconcile(&mut view, &second);
        assert!(view.jobs.is_empty());
    }

    #[test]
    fn absent_stats_leave_counters_untouched() {
        let mut r = email_reconciler(30);
        let mut view = DashboardView::default();

        let with_stats = StatusSnapshot {
            running: true,
            status: "Idle".into(),
            stats: Some(Stats {
                messages_found: Some(4),
                jobs_processed: Some(2),
                next_check: Some("14:30:00".into()),
                ..Stats::default()
            }),
        };
        r.reconcile(&mut view, &with_stats);
        assert_eq!(view.messages_found, 4);

        let without = StatusSnapshot {
            running: true,
            status: "Idle".into(),
            stats: None,
        };
        let cmd = r.reconcile(&mut view, &without);
        assert_eq!(view.messages_found, 4);
        assert_eq!(view.jobs_processed, 2);
        // stored next_check survives, countdown keeps its target
        assert_eq!(
            cmd,
            CountdownCommand::Start {
                target: "14:30:00".into(),
                poll_interval_secs: 30,
            }
        );
    }

    #[test]
    fn subjects_render_as_literal_text() {
        let mut r = email_reconciler(30);
        let mut view = DashboardView::default();

        let snapshot = StatusSnapshot {
            running: true,
            status: "Idle".into(),
            stats: Some(Stats {
                next_check: Some("14:30:00".into()),
                messages_found: Some(2),
                jobs_processed: Some(1),
                jobs_pending: Some(0),
                recent_jobs: vec![JobRecord {
                    timestamp: "14:20".into(),
                    subject: "<b>x</b>".into(),
                    action: "Printed\x1b[31m".into(),
                    temp_file: Some("t1".into()),
                    can_reprint: true,
                    source: JobSource::Email,
                }],
                ..Stats::default()
            }),
        };
        let cmd = r.reconcile(&mut view, &snapshot);

        assert_eq!(view.banner.caption, "Idle");
        assert!(matches!(cmd, CountdownCommand::Start { ref target, .. } if target == "14:30:00"));
        assert_eq!(view.jobs[0].subject, "<b>x</b>");
        assert_eq!(view.jobs[0].action, "Printed");
        assert!(view.jobs[0].can_reprint);
        assert_eq!(view.jobs[0].temp_file.as_deref(), Some("t1"));
    }

    #[test]
    fn processing_flag_overrides_and_restores() {
        let mut r = email_reconciler(30);
        let mut view = DashboardView::default();
        r.reconcile(&mut view, &running_snapshot("Idle", Some("14:30:00")));

        let cmd = r.set_processing(&mut view, true);
        assert_eq!(cmd, CountdownCommand::Stop);
        assert_eq!(view.banner.caption, "Processing Webhook");
        assert_eq!(view.banner.kind, BannerKind::Processing);

        let cmd = r.set_processing(&mut view, false);
        assert_eq!(view.banner.caption, "Idle");
        assert!(matches!(cmd, CountdownCommand::Start { .. }));
    }

    #[test]
    fn processing_complete_uses_latest_mode() {
        let mut r = email_reconciler(30);
        let mut view = DashboardView::default();
        r.reconcile(&mut view, &running_snapshot("Idle", Some("14:30:00")));
        r.set_processing(&mut view, true);

        // mode switches while processing
        r.apply_config(&ServiceConfig {
            operation_mode: OperationMode::WebhookOnly,
            webhook_secret: "s".into(),
            ..ServiceConfig::default()
        });

        let cmd = r.set_processing(&mut view, false);
        assert_eq!(cmd, CountdownCommand::Stop);
        assert_eq!(view.banner.caption, "Waiting for Webhook");
    }

    #[test]
    fn processing_while_stopped_stays_stopped() {
        let mut r = email_reconciler(30);
        let mut view = DashboardView::default();

        let cmd = r.set_processing(&mut view, true);
        assert_eq!(cmd, CountdownCommand::Stop);
        assert_eq!(view.banner.kind, BannerKind::Stopped);
    }
}
