use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

use crate::config;
use crate::config::SpeedPreset;
use crate::domain::{AggregatedCandle, MinuteSeries, Timeframe};
use crate::replay::{self, ReplayClock, ReplayState, RenderFrame, TickScheduler};
use crate::sim::{DeskSummary, TradeDesk, TradeOutcome};

/// The four analysis panels. Each owns a fully isolated session; only the
/// replay panel carries the paper-trading capability.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum PanelKind {
    #[default]
    Replay,
    Gaps,
    Events,
    Earnings,
}

/// Everything one panel owns: the loaded series, its aggregation for the
/// chosen timeframe, the replay clock, and (replay panel only) the trade
/// desk. Panels never share state; an error here cannot leak elsewhere.
pub struct PanelSession {
    kind: PanelKind,
    series: Option<MinuteSeries>,
    timeframe: Timeframe,
    candles: Vec<AggregatedCandle>,
    speed: SpeedPreset,
    clock: ReplayClock,
    desk: Option<TradeDesk>,
    notice: Option<String>,
}

impl PanelSession {
    pub fn new(kind: PanelKind, scheduler: Box<dyn TickScheduler + Send>) -> Self {
        let speed = config::REPLAY.default_speed;
        let desk = (kind == PanelKind::Replay)
            .then(|| TradeDesk::new(config::REPLAY.sim.trade_size));
        Self {
            kind,
            series: None,
            timeframe: Timeframe::default(),
            candles: Vec::new(),
            speed,
            clock: ReplayClock::new(scheduler, speed.interval()),
            desk,
            notice: None,
        }
    }

    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    pub fn series(&self) -> Option<&MinuteSeries> {
        self.series.as_ref()
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn candles(&self) -> &[AggregatedCandle] {
        &self.candles
    }

    pub fn speed(&self) -> SpeedPreset {
        self.speed
    }

    pub fn replay_state(&self) -> ReplayState {
        self.clock.state()
    }

    pub fn cursor(&self) -> usize {
        self.clock.cursor()
    }

    pub fn desk(&self) -> Option<&TradeDesk> {
        self.desk.as_ref()
    }

    /// One-shot notice for the UI status line.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Installs a freshly fetched series. Replay and simulator state reset;
    /// a fetch failure never reaches this point, so a bad load leaves the
    /// previous chart intact.
    pub fn load_series(&mut self, series: MinuteSeries) {
        self.clock.reset(series.len());
        self.candles = replay::aggregate(&series, self.timeframe);
        if let Some(desk) = &mut self.desk {
            *desk = TradeDesk::new(config::REPLAY.sim.trade_size);
        }
        self.series = Some(series);
        self.notice = None;
    }

    /// Re-aggregates under the new timeframe. The cursor is minute-indexed,
    /// so playback position survives the switch.
    pub fn set_timeframe(&mut self, timeframe: Timeframe) {
        if self.timeframe == timeframe {
            return;
        }
        self.timeframe = timeframe;
        if let Some(series) = &self.series {
            self.candles = replay::aggregate(series, timeframe);
        }
    }

    pub fn start_replay(&mut self, from_time_of_day: Option<&str>) {
        let Some(series) = &self.series else {
            return;
        };
        if let Some(warning) = self.clock.start(from_time_of_day, series) {
            log::warn!("[{}] {warning}", self.kind);
            self.notice = Some(warning.to_string());
        }
    }

    pub fn pause_replay(&mut self) {
        self.clock.pause();
    }

    /// Rewinds to an empty chart. Any open position settles first, at the
    /// last played minute's close.
    pub fn start_over(&mut self) {
        self.stop_replay();
        self.clock.start_over();
    }

    pub fn step_forward(&mut self) {
        self.clock.step_forward();
    }

    pub fn step_back(&mut self) {
        self.clock.step_back();
    }

    pub fn set_speed(&mut self, speed: SpeedPreset) {
        self.speed = speed;
        self.clock.set_speed(speed.interval());
    }

    /// Runs every tick the scheduler owes since the last frame. Auto-stop at
    /// the end of the series settles any open position.
    pub fn poll(&mut self) {
        let due = self.clock.poll_due();
        for _ in 0..due {
            if self.clock.state() != ReplayState::Playing {
                break;
            }
            self.tick();
        }
    }

    fn tick(&mut self) {
        if self.clock.at_end() {
            self.stop_replay();
            return;
        }
        self.clock.advance();
        if config::PRINT_REPLAY_TICKS {
            log::debug!("[{}] tick -> cursor {}", self.kind, self.clock.cursor());
        }
        if self.clock.at_end() {
            self.stop_replay();
        }
    }

    /// Settles any leftover position before the Playing flag drops, so the
    /// simulator always closes against a live cursor.
    fn stop_replay(&mut self) {
        if let (Some(desk), Some(series)) = (&mut self.desk, &self.series) {
            if let Some(idx) = self.clock.cursor().checked_sub(1) {
                if let Some(pnl) = desk.force_close(series.closes[idx], series.timestamps_ms[idx]) {
                    if config::PRINT_SIM_EVENTS {
                        log::info!("[{}] auto-closed position, pnl {pnl:.2}", self.kind);
                    }
                    self.notice = Some(format!("Position auto-closed, P/L {pnl:+.2}"));
                }
            }
        }
        self.clock.stop();
    }

    /// No-op unless Playing with at least one minute on the chart. Entries
    /// fill at the close of the minute just played.
    pub fn buy(&mut self) {
        self.trade(TradeDesk::buy);
    }

    pub fn sell(&mut self) {
        self.trade(TradeDesk::sell);
    }

    fn trade(&mut self, action: fn(&mut TradeDesk, f64, i64) -> TradeOutcome) {
        let (Some(desk), Some(series)) = (&mut self.desk, &self.series) else {
            return;
        };
        if self.clock.state() != ReplayState::Playing {
            return;
        }
        let Some(idx) = self.clock.cursor().checked_sub(1) else {
            return;
        };
        let outcome = action(desk, series.closes[idx], series.timestamps_ms[idx]);
        if config::PRINT_SIM_EVENTS {
            log::info!("[{}] trade action -> {outcome:?}", self.kind);
        }
        self.notice = Some(match outcome {
            TradeOutcome::Opened(side) => format!("{side} opened at {:.2}", series.closes[idx]),
            TradeOutcome::Closed { pnl } => format!("Position closed, P/L {pnl:+.2}"),
            TradeOutcome::AlreadyOpen => "A position is already open".to_string(),
        });
    }

    /// Open-position mark-to-market at the cursor, or realized total.
    pub fn desk_summary(&self) -> Option<DeskSummary> {
        let desk = self.desk.as_ref()?;
        let price = self
            .series
            .as_ref()
            .zip(self.clock.cursor().checked_sub(1))
            .map(|(series, idx)| series.closes[idx])
            .unwrap_or(0.0);
        Some(desk.summary(price))
    }

    /// Chart-ready view of the current replay position.
    pub fn frame(&self) -> RenderFrame {
        match &self.series {
            Some(series) => replay::build_frame(
                series,
                &self.candles,
                self.timeframe,
                self.clock.cursor(),
                self.clock.state(),
            ),
            None => RenderFrame::default(),
        }
    }
}

/// The four panel sessions, keyed by panel. Built once at startup; each
/// session gets its own scheduler so concurrent playback never interleaves
/// timers.
pub struct Workbench {
    sessions: HashMap<PanelKind, PanelSession>,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new(|| Box::new(crate::replay::WallScheduler::default()))
    }
}

impl Workbench {
    pub fn new<F>(make_scheduler: F) -> Self
    where
        F: Fn() -> Box<dyn TickScheduler + Send>,
    {
        let sessions = PanelKind::iter()
            .map(|kind| (kind, PanelSession::new(kind, make_scheduler())))
            .collect();
        Self { sessions }
    }

    pub fn session(&self, kind: PanelKind) -> &PanelSession {
        &self.sessions[&kind]
    }

    pub fn session_mut(&mut self, kind: PanelKind) -> &mut PanelSession {
        self.sessions.get_mut(&kind).unwrap_or_else(|| {
            unreachable!("workbench always holds every panel kind")
        })
    }

    /// Drives all panels; any of the four may be Playing at once.
    pub fn poll_all(&mut self) {
        for session in self.sessions.values_mut() {
            session.poll();
        }
    }

    /// True while any panel is Playing, used to keep the UI repainting.
    pub fn any_playing(&self) -> bool {
        self.sessions
            .values()
            .any(|session| session.replay_state() == ReplayState::Playing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::minute_series::test_support::synthetic_series;
    use crate::replay::ManualScheduler;
    use crate::sim::Side;

    const T0: i64 = 1_709_303_400_000; // 2024-03-01 14:30 UTC

    fn replay_session() -> (PanelSession, ManualScheduler) {
        let scheduler = ManualScheduler::default();
        let session = PanelSession::new(PanelKind::Replay, Box::new(scheduler.clone()));
        (session, scheduler)
    }

    #[test]
    fn test_full_window_replay_auto_stops_after_last_tick() {
        let (mut session, scheduler) = replay_session();
        session.set_timeframe(Timeframe::M5);
        session.load_series(synthetic_series(5, T0, 100.0));
        assert_eq!(session.candles().len(), 1);

        session.start_replay(None);
        assert_eq!(session.replay_state(), ReplayState::Playing);

        scheduler.fire(5);
        session.poll();

        assert_eq!(session.cursor(), 5);
        assert_eq!(session.replay_state(), ReplayState::Stopped);
        let frame = session.frame();
        assert_eq!(frame.candles.len(), 1);
        assert!(!frame.candles[0].in_progress);
    }

    #[test]
    fn test_cursor_monotonic_and_bounded_under_ticks() {
        let (mut session, scheduler) = replay_session();
        session.load_series(synthetic_series(3, T0, 100.0));
        session.start_replay(None);

        let mut last = session.cursor();
        for _ in 0..10 {
            scheduler.fire(1);
            session.poll();
            assert!(session.cursor() >= last);
            assert!(session.cursor() <= 3);
            last = session.cursor();
        }
        assert_eq!(session.cursor(), 3);
    }

    #[test]
    fn test_pause_resume_preserves_cursor() {
        let (mut session, scheduler) = replay_session();
        session.load_series(synthetic_series(10, T0, 100.0));
        session.start_replay(None);
        scheduler.fire(4);
        session.poll();

        session.pause_replay();
        assert_eq!(session.replay_state(), ReplayState::Paused);
        assert_eq!(session.cursor(), 4);

        session.start_replay(Some("14:37"));
        assert_eq!(session.cursor(), 4, "resume must not re-resolve the start time");

        session.start_over();
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.replay_state(), ReplayState::Stopped);
    }

    #[test]
    fn test_trades_fill_at_last_played_close() {
        let (mut session, scheduler) = replay_session();
        let series = synthetic_series(10, T0, 100.0);
        let entry_close = series.closes[2];
        let exit_close = series.closes[5];
        session.load_series(series);

        session.buy();
        assert!(session.desk().unwrap().position().is_none(), "no trades before start");

        session.start_replay(None);
        scheduler.fire(3);
        session.poll();
        session.buy();
        let position = session.desk().unwrap().position().copied().unwrap();
        assert_eq!(position.side, Side::Buy);
        assert_eq!(position.entry_price, entry_close);

        scheduler.fire(3);
        session.poll();
        session.sell();
        let trade = session.desk().unwrap().history()[0];
        assert_eq!(trade.exit_price, exit_close);
        assert_eq!(
            trade.pnl,
            crate::sim::round_cents((exit_close - entry_close) * 100.0)
        );
    }

    #[test]
    fn test_auto_stop_settles_open_position() {
        let (mut session, scheduler) = replay_session();
        let series = synthetic_series(4, T0, 100.0);
        let last_close = series.closes[3];
        session.load_series(series);

        session.start_replay(None);
        scheduler.fire(2);
        session.poll();
        session.buy();

        scheduler.fire(2);
        session.poll();
        assert_eq!(session.replay_state(), ReplayState::Stopped);

        let desk = session.desk().unwrap();
        assert!(desk.position().is_none());
        assert_eq!(desk.history().len(), 1);
        assert_eq!(desk.history()[0].exit_price, last_close);
    }

    #[test]
    fn test_panels_are_isolated() {
        let mut bench = Workbench::new(|| Box::new(ManualScheduler::default()));
        bench
            .session_mut(PanelKind::Gaps)
            .load_series(synthetic_series(6, T0, 50.0));
        bench.session_mut(PanelKind::Gaps).start_replay(None);

        assert_eq!(bench.session(PanelKind::Gaps).replay_state(), ReplayState::Playing);
        assert_eq!(bench.session(PanelKind::Events).replay_state(), ReplayState::Stopped);
        assert!(bench.session(PanelKind::Gaps).desk().is_none());
        assert!(bench.session(PanelKind::Replay).desk().is_some());
        assert!(bench.any_playing());
    }

    #[test]
    fn test_invalid_start_time_surfaces_notice() {
        let (mut session, _scheduler) = replay_session();
        session.load_series(synthetic_series(5, T0, 100.0));

        session.start_replay(Some("9:70"));
        assert_eq!(session.cursor(), 0);
        assert!(session.take_notice().unwrap().contains("not a valid"));
        assert!(session.take_notice().is_none(), "notice is one-shot");
    }
}
