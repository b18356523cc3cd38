//! Main event loop: actor events, push events, countdown ticks, input.

use anyhow::Result;
use chrono::Local;
use crossterm::event;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::api::actor::{ActionKind, ApiCommand, ApiEvent};
use crate::api::push::PushEvent;
use crate::api::types::{ApiResponse, StatusSnapshot};
use crate::constants::{COUNTDOWN_TICK_MS, INPUT_POLL_FAST_MS, INPUT_POLL_SLOW_MS};
use crate::input::{InputResult, handle_input};
use crate::status::reconcile::CountdownCommand;
use crate::status::text::sanitize_line;

use super::App;
use super::render_thread::RenderThread;

impl App {
    pub(crate) async fn event_loop(&mut self, render_thread: &RenderThread) -> Result<()> {
        loop {
            // Drain both update channels first; input can wait a frame
            if self.process_api_events() {
                self.dirty = true;
            }
            if self.process_push_events() {
                self.dirty = true;
            }

            if self.tick_countdown() {
                self.dirty = true;
            }
            if self.state.notice.clear_if_expired() {
                self.dirty = true;
            }

            // Render only when dirty (non-blocking - sends to render thread)
            if self.dirty {
                render_thread.render(self.state.clone());
                self.dirty = false;
            }

            // Adaptive timeout: tighter while the countdown is animating
            let poll_timeout = if self.engine.is_running() {
                INPUT_POLL_FAST_MS
            } else {
                INPUT_POLL_SLOW_MS
            };
            if event::poll(Duration::from_millis(poll_timeout))? {
                let evt = event::read()?;
                // Any input event (including resize) requires re-render
                self.dirty = true;
                match handle_input(evt, &self.state, &self.bindings) {
                    InputResult::Quit => break,
                    InputResult::Action(action) => self.handle_action(action),
                    InputResult::Char(c) => self.handle_char(c),
                    InputResult::Backspace => self.handle_backspace(),
                    InputResult::Continue => {}
                }
            }

            if self.state.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Drain the API actor's event queue. True if anything arrived.
    fn process_api_events(&mut self) -> bool {
        let mut had_events = false;
        while let Ok(event) = self.api.event_rx.try_recv() {
            had_events = true;
            match event {
                ApiEvent::Status(snapshot) => {
                    self.state.connection.api_ok = true;
                    self.state.connection.last_update = Some(Instant::now());
                    self.apply_snapshot(&snapshot);
                }
                ApiEvent::PollFailed(err) => {
                    // last good view stays on screen; only the indicator flips
                    self.state.connection.api_ok = false;
                    tracing::debug!("status poll failed: {}", err);
                }
                ApiEvent::Config(config) => {
                    self.reconciler.apply_config(&config);
                    // never clobber local edits with a server refresh
                    if !self.state.form.dirty && self.state.form.editing.is_none() {
                        self.state.form.load(*config);
                    }
                }
                ApiEvent::ActionDone(kind, response) => {
                    self.handle_action_done(kind, response);
                }
                ApiEvent::ActionFailed(kind, err) => {
                    self.state
                        .notice
                        .error(format!("{}: {}", kind.label(), err));
                }
                ApiEvent::Logs(lines) => {
                    let lines = lines.iter().map(|l| sanitize_line(l)).collect();
                    self.state.logs.load(lines);
                }
                ApiEvent::LogText(text) => self.save_log_file(&text),
                ApiEvent::FetchFailed(err) => self.state.notice.error(err),
            }
        }
        had_events
    }

    fn handle_action_done(&mut self, kind: ActionKind, response: ApiResponse) {
        self.state.notice.success(response.text());
        match kind {
            ActionKind::SaveConfig => {
                self.state.form.dirty = false;
                self.send_api(ApiCommand::FetchConfig);
                self.send_api(ApiCommand::FetchStatus);
            }
            ActionKind::ResetConfig => {
                self.state.form.dirty = false;
                self.send_api(ApiCommand::FetchConfig);
                self.send_api(ApiCommand::FetchStatus);
            }
            ActionKind::StartService
            | ActionKind::StopService
            | ActionKind::ManualCheck
            | ActionKind::Reprint
            | ActionKind::ClearCache => {
                self.send_api(ApiCommand::FetchStatus);
            }
            ActionKind::TestConnection => {}
        }
    }

    /// Drain the push channel. True if anything arrived.
    fn process_push_events(&mut self) -> bool {
        let mut had_events = false;
        while let Ok(event) = self.push_rx.try_recv() {
            had_events = true;
            match event {
                PushEvent::Connected => self.state.connection.push_connected = true,
                PushEvent::Disconnected => self.state.connection.push_connected = false,
                PushEvent::Status(snapshot) => {
                    self.state.connection.last_update = Some(Instant::now());
                    self.apply_snapshot(&snapshot);
                }
                PushEvent::WebhookProcessing(flag) => {
                    let cmd = self
                        .reconciler
                        .set_processing(&mut self.state.dashboard, flag);
                    self.apply_countdown_command(cmd);
                }
            }
        }
        had_events
    }

    /// Merge a snapshot from either channel and apply the resulting
    /// countdown command.
    pub(crate) fn apply_snapshot(&mut self, snapshot: &StatusSnapshot) {
        let cmd = self
            .reconciler
            .reconcile(&mut self.state.dashboard, snapshot);
        self.state.clamp_job_selection();
        self.apply_countdown_command(cmd);
        self.maybe_notify_jobs();
    }

    pub(crate) fn apply_countdown_command(&mut self, cmd: CountdownCommand) {
        match cmd {
            CountdownCommand::Start {
                target,
                poll_interval_secs,
            } => {
                let now = Local::now().naive_local();
                if self.engine.start(&target, Some(poll_interval_secs), now) {
                    self.state.dashboard.countdown = self.engine.tick(now);
                } else {
                    tracing::debug!("unparseable next-check time: {}", target);
                    self.engine.stop();
                    self.state.dashboard.countdown = None;
                }
            }
            CountdownCommand::Stop => {
                self.engine.stop();
                self.state.dashboard.countdown = None;
            }
        }
    }

    fn maybe_notify_jobs(&mut self) {
        let current = self.state.dashboard.jobs_processed;
        if let Some(prev) = self.last_jobs_processed
            && current > prev
        {
            let subject = self
                .state
                .dashboard
                .jobs
                .first()
                .map(|job| job.subject.as_str());
            crate::notification::notify_jobs_printed(&self.config, current - prev, subject);
        }
        self.last_jobs_processed = Some(current);
    }

    /// Advance the countdown once per second while it is running.
    fn tick_countdown(&mut self) -> bool {
        if !self.engine.is_running() {
            return false;
        }
        if self.last_countdown_tick.elapsed() < Duration::from_millis(COUNTDOWN_TICK_MS) {
            return false;
        }
        self.last_countdown_tick = Instant::now();
        self.state.dashboard.countdown = self.engine.tick(Local::now().naive_local());
        true
    }

    fn save_log_file(&mut self, text: &str) {
        let dir = dirs::download_dir().unwrap_or_else(|| PathBuf::from("."));
        let name = format!("flowprint_logs_{}.txt", Local::now().format("%Y-%m-%d"));
        let path = dir.join(name);
        match std::fs::write(&path, text) {
            Ok(()) => self
                .state
                .notice
                .success(format!("Logs saved to {}", path.display())),
            Err(e) => self.state.notice.error(format!("Saving logs failed: {}", e)),
        }
    }
}
