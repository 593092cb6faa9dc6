use std::fmt;
use std::time::Duration;

use chrono::NaiveTime;

use crate::domain::MinuteSeries;
use crate::replay::scheduler::TickScheduler;

/// Playback state of one panel's replay clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplayState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Non-fatal start-time problems, surfaced to the user as a notice while the
/// cursor falls back to the beginning of the session.
#[derive(Debug, Clone, PartialEq)]
pub enum StartWarning {
    MalformedTime(String),
    TimeNotInSession(String),
}

impl fmt::Display for StartWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartWarning::MalformedTime(raw) => {
                write!(f, "'{raw}' is not a valid HH:MM time; starting from the open")
            }
            StartWarning::TimeNotInSession(raw) => {
                write!(f, "No minute at or after {raw} in this session; starting from the open")
            }
        }
    }
}

/// Per-panel replay state machine over a minute cursor in `[0, series_len]`.
///
/// The cursor counts minutes already played: 0 = not started, `series_len` =
/// fully played. The clock owns exactly one scheduler; every (re)start disarms
/// it before arming so a panel can never tick twice per interval.
pub struct ReplayClock {
    state: ReplayState,
    cursor: usize,
    series_len: usize,
    interval: Duration,
    scheduler: Box<dyn TickScheduler + Send>,
}

impl ReplayClock {
    pub fn new(scheduler: Box<dyn TickScheduler + Send>, interval: Duration) -> Self {
        Self {
            state: ReplayState::Stopped,
            cursor: 0,
            series_len: 0,
            interval,
            scheduler,
        }
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn series_len(&self) -> usize {
        self.series_len
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn at_end(&self) -> bool {
        self.cursor >= self.series_len
    }

    /// Rebinds the clock to a freshly loaded series. Everything resets.
    pub fn reset(&mut self, series_len: usize) {
        self.scheduler.disarm();
        self.state = ReplayState::Stopped;
        self.cursor = 0;
        self.series_len = series_len;
    }

    /// Transitions to Playing. Resuming from Paused keeps the cursor; any
    /// other start resolves it from `from_time_of_day` (invalid or unmatched
    /// times fall back to 0 with a warning, never an error).
    pub fn start(
        &mut self,
        from_time_of_day: Option<&str>,
        series: &MinuteSeries,
    ) -> Option<StartWarning> {
        let mut warning = None;
        if self.state != ReplayState::Paused {
            if let Some(raw) = from_time_of_day {
                match parse_time_of_day(raw) {
                    Some(target) => match series.index_at_or_after(target) {
                        Some(idx) => self.cursor = idx,
                        None => {
                            self.cursor = 0;
                            warning = Some(StartWarning::TimeNotInSession(raw.to_string()));
                        }
                    },
                    None => {
                        self.cursor = 0;
                        warning = Some(StartWarning::MalformedTime(raw.to_string()));
                    }
                }
            }
        }

        self.state = ReplayState::Playing;
        // Clear any previous schedule before arming; one live timer per panel.
        self.scheduler.disarm();
        self.scheduler.arm(self.interval);
        warning
    }

    /// Valid only from Playing; the cursor is preserved.
    pub fn pause(&mut self) {
        if self.state == ReplayState::Playing {
            self.scheduler.disarm();
            self.state = ReplayState::Paused;
        }
    }

    /// Stops playback without touching the cursor (the auto-stop path).
    pub fn stop(&mut self) {
        self.scheduler.disarm();
        self.state = ReplayState::Stopped;
    }

    /// Valid from any state: cancel, rewind to 0, clear the chart.
    pub fn start_over(&mut self) {
        self.scheduler.disarm();
        self.cursor = 0;
        self.state = ReplayState::Stopped;
    }

    /// Advances one minute along the tick path. Caller handles the end of the
    /// series; the cursor never leaves `[0, series_len]`.
    pub fn advance(&mut self) {
        debug_assert!(self.cursor < self.series_len, "advance past end of series");
        self.cursor = (self.cursor + 1).min(self.series_len);
    }

    /// Manual single-minute steps, only when not Playing.
    pub fn step_forward(&mut self) {
        if self.state != ReplayState::Playing {
            self.cursor = (self.cursor + 1).min(self.series_len);
        }
    }

    pub fn step_back(&mut self) {
        if self.state != ReplayState::Playing {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    /// Changes the tick interval; takes effect immediately when Playing.
    pub fn set_speed(&mut self, interval: Duration) {
        self.interval = interval;
        if self.state == ReplayState::Playing {
            self.scheduler.disarm();
            self.scheduler.arm(interval);
        }
    }

    /// Ticks owed since the last poll (zero unless Playing).
    pub fn poll_due(&mut self) -> u32 {
        self.scheduler.poll_due()
    }
}

/// Strict "HH:MM" with hours 0-23 and minutes 0-59. Anything else is None.
fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let (hours, minutes) = raw.split_once(':')?;
    let hours: u32 = hours.trim().parse().ok()?;
    let minutes: u32 = minutes.trim().parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::minute_series::test_support::synthetic_series;
    use crate::replay::scheduler::ManualScheduler;

    const T0: i64 = 1_709_303_400_000; // 2024-03-01 14:30 UTC

    fn clock() -> ReplayClock {
        ReplayClock::new(Box::new(ManualScheduler::default()), Duration::from_millis(250))
    }

    #[test]
    fn test_start_from_valid_time_of_day() {
        let series = synthetic_series(10, T0, 100.0);
        let mut clock = clock();
        clock.reset(series.len());

        let warning = clock.start(Some("14:33"), &series);
        assert!(warning.is_none());
        assert_eq!(clock.cursor(), 3);
        assert_eq!(clock.state(), ReplayState::Playing);
    }

    #[test]
    fn test_start_with_malformed_time_warns_and_resets() {
        let series = synthetic_series(10, T0, 100.0);
        let mut clock = clock();
        clock.reset(series.len());
        clock.step_forward();

        for raw in ["25:00", "9:70", "930", "ab:cd"] {
            let warning = clock.start(Some(raw), &series);
            assert!(
                matches!(warning, Some(StartWarning::MalformedTime(_))),
                "expected malformed warning for {raw:?}"
            );
            assert_eq!(clock.cursor(), 0, "cursor must reset for {raw:?}");
            clock.stop();
        }
    }

    #[test]
    fn test_start_with_unmatched_time_warns_and_resets() {
        let series = synthetic_series(10, T0, 100.0);
        let mut clock = clock();
        clock.reset(series.len());

        let warning = clock.start(Some("23:00"), &series);
        assert!(matches!(warning, Some(StartWarning::TimeNotInSession(_))));
        assert_eq!(clock.cursor(), 0);
        assert_eq!(clock.state(), ReplayState::Playing);
    }

    #[test]
    fn test_pause_preserves_cursor_and_resume_keeps_it() {
        let series = synthetic_series(10, T0, 100.0);
        let mut clock = clock();
        clock.reset(series.len());
        clock.start(None, &series);
        clock.advance();
        clock.advance();

        clock.pause();
        assert_eq!(clock.state(), ReplayState::Paused);
        assert_eq!(clock.cursor(), 2);

        // Resuming must not re-resolve the start position.
        clock.start(Some("14:39"), &series);
        assert_eq!(clock.cursor(), 2);
    }

    #[test]
    fn test_start_over_resets_from_any_state() {
        let series = synthetic_series(10, T0, 100.0);
        let mut clock = clock();
        clock.reset(series.len());
        clock.start(None, &series);
        clock.advance();

        clock.start_over();
        assert_eq!(clock.state(), ReplayState::Stopped);
        assert_eq!(clock.cursor(), 0);

        clock.step_forward();
        clock.start_over();
        assert_eq!(clock.cursor(), 0);
    }

    #[test]
    fn test_steps_clamp_and_ignore_playing() {
        let series = synthetic_series(3, T0, 100.0);
        let mut clock = clock();
        clock.reset(series.len());

        clock.step_back();
        assert_eq!(clock.cursor(), 0, "step back clamps at 0");

        for _ in 0..10 {
            clock.step_forward();
        }
        assert_eq!(clock.cursor(), 3, "step forward clamps at N");

        clock.start_over();
        clock.start(None, &series);
        clock.step_forward();
        assert_eq!(clock.cursor(), 0, "steps are ignored while Playing");
    }
}
