//! Countdown engine for the next scheduled mail check.
//!
//! An explicit state machine ticked by the event loop. The engine never
//! stops itself: at or past the target it keeps reporting zero until a
//! reconcile cycle stops or restarts it.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::constants::{DEFAULT_MAIL_POLL_INTERVAL_SECS, URGENT_THRESHOLD_SECS};

/// What the countdown renders this tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownView {
    /// `"2m 5s"`, `"45s"`, or `"0s"` once the target has passed.
    pub label: String,
    /// Remaining time as a share of the poll interval, clamped to 0..=100.
    pub remaining_percent: u16,
    /// True in the final stretch before the check fires.
    pub urgent: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Idle,
    Running {
        target: NaiveDateTime,
        poll_interval_secs: i64,
    },
}

/// Ticking countdown toward a wall-clock target.
#[derive(Debug, Clone, PartialEq)]
pub struct CountdownEngine {
    phase: Phase,
}

impl CountdownEngine {
    pub fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Aim at the next wall-clock occurrence of `time_text` (`HH:MM:SS`).
    ///
    /// A time earlier than `now` rolls over to tomorrow. The poll
    /// interval is captured here and not re-read while running. Starting
    /// a running engine replaces the target; there is never more than
    /// one active target. Returns false when the text does not parse,
    /// leaving the previous phase untouched.
    pub fn start(
        &mut self,
        time_text: &str,
        poll_interval_secs: Option<i64>,
        now: NaiveDateTime,
    ) -> bool {
        let Ok(time) = NaiveTime::parse_from_str(time_text.trim(), "%H:%M:%S") else {
            return false;
        };

        let mut target = now.date().and_time(time);
        if target < now {
            target += Duration::days(1);
        }

        let poll_interval_secs = poll_interval_secs
            .filter(|&secs| secs > 0)
            .unwrap_or(DEFAULT_MAIL_POLL_INTERVAL_SECS);

        self.phase = Phase::Running {
            target,
            poll_interval_secs,
        };
        true
    }

    /// Return to idle. Idempotent.
    pub fn stop(&mut self) {
        self.phase = Phase::Idle;
    }

    /// Produce the current view, or None when idle.
    pub fn tick(&self, now: NaiveDateTime) -> Option<CountdownView> {
        let Phase::Running {
            target,
            poll_interval_secs,
        } = &self.phase
        else {
            return None;
        };

        let remaining = (*target - now).num_seconds().max(0);

        let label = if remaining >= 60 {
            format!("{}m {}s", remaining / 60, remaining % 60)
        } else {
            format!("{}s", remaining)
        };

        let percent = (remaining * 100 / poll_interval_secs).min(100) as u16;

        Some(CountdownView {
            label,
            remaining_percent: percent,
            urgent: remaining > 0 && remaining <= URGENT_THRESHOLD_SECS,
        })
    }
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn starts_toward_same_day_future_time() {
        let mut engine = CountdownEngine::new();
        assert!(engine.start("12:01:30", Some(120), at(12, 0, 0)));

        let view = engine.tick(at(12, 0, 0)).unwrap();
        assert_eq!(view.label, "1m 30s");
        assert_eq!(view.remaining_percent, 75);
        assert!(!view.urgent);
    }

    #[test]
    fn past_time_rolls_over_to_tomorrow() {
        let mut engine = CountdownEngine::new();
        assert!(engine.start("01:00:00", Some(30), at(23, 59, 0)));

        let view = engine.tick(at(23, 59, 0)).unwrap();
        // 1h01m away, far beyond the interval
        assert_eq!(view.remaining_percent, 100);
        assert_eq!(view.label, "61m 0s");
    }

    #[test]
    fn urgent_in_final_ten_seconds() {
        let mut engine = CountdownEngine::new();
        engine.start("12:00:30", Some(30), at(12, 0, 0));

        assert!(!engine.tick(at(12, 0, 19)).unwrap().urgent);
        assert!(engine.tick(at(12, 0, 20)).unwrap().urgent);
        assert!(engine.tick(at(12, 0, 29)).unwrap().urgent);
    }

    #[test]
    fn reports_zero_past_target_and_keeps_running() {
        let mut engine = CountdownEngine::new();
        engine.start("12:00:10", Some(30), at(12, 0, 0));

        let view = engine.tick(at(12, 0, 15)).unwrap();
        assert_eq!(view.label, "0s");
        assert_eq!(view.remaining_percent, 0);
        assert!(!view.urgent);
        assert!(engine.is_running());

        // still reporting on later ticks
        let view = engine.tick(at(12, 5, 0)).unwrap();
        assert_eq!(view.label, "0s");
    }

    #[test]
    fn start_replaces_previous_target() {
        let mut engine = CountdownEngine::new();
        engine.start("12:00:10", Some(30), at(12, 0, 0));
        engine.start("12:01:00", Some(30), at(12, 0, 0));

        let view = engine.tick(at(12, 0, 0)).unwrap();
        assert_eq!(view.label, "1m 0s");
    }

    #[test]
    fn stop_is_idempotent() {
        let mut engine = CountdownEngine::new();
        engine.start("12:00:10", Some(30), at(12, 0, 0));
        engine.stop();
        engine.stop();
        assert!(!engine.is_running());
        assert!(engine.tick(at(12, 0, 0)).is_none());
    }

    #[test]
    fn unparseable_time_leaves_phase_untouched() {
        let mut engine = CountdownEngine::new();
        assert!(!engine.start("Pending...", Some(30), at(12, 0, 0)));
        assert!(!engine.is_running());

        engine.start("12:00:10", Some(30), at(12, 0, 0));
        assert!(!engine.start("not a time", Some(30), at(12, 0, 0)));
        assert!(engine.is_running());
    }

    #[test]
    fn missing_interval_falls_back_to_default() {
        let mut engine = CountdownEngine::new();
        engine.start("12:00:30", None, at(12, 0, 0));

        let view = engine.tick(at(12, 0, 0)).unwrap();
        assert_eq!(view.remaining_percent, 100);
        let view = engine.tick(at(12, 0, 15)).unwrap();
        assert_eq!(view.remaining_percent, 50);
    }

    #[test]
    fn percent_clamps_at_one_hundred() {
        let mut engine = CountdownEngine::new();
        engine.start("12:10:00", Some(30), at(12, 0, 0));
        assert_eq!(engine.tick(at(12, 0, 0)).unwrap().remaining_percent, 100);
    }
}
