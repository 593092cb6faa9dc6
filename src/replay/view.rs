use crate::domain::{AggregatedCandle, Candle, MinuteSeries, Timeframe};
use crate::replay::clock::ReplayState;

/// Decomposition of a minute cursor against a candle window.
///
/// `completed` full candles are visible, and when `minute_offset > 0` the
/// next candle is drawn in progress, built from its first `minute_offset`
/// minutes only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorView {
    pub completed: usize,
    pub minute_offset: usize,
}

impl CursorView {
    pub fn derive(cursor: usize, timeframe: Timeframe) -> Self {
        let window = timeframe.minutes();
        Self {
            completed: cursor / window,
            minute_offset: cursor % window,
        }
    }
}

/// One candle as the chart should draw it right now.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleCandle {
    pub start_timestamp_ms: i64,
    pub candle: Candle,
    pub in_progress: bool,
}

/// Which replay controls are actionable in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlFlags {
    pub can_start: bool,
    pub can_pause: bool,
    pub can_step: bool,
    pub at_start: bool,
    pub at_end: bool,
}

/// Everything the chart and control strip need for one frame, derived from
/// replay state in one place so every widget agrees on what is visible.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderFrame {
    pub candles: Vec<VisibleCandle>,
    pub clock_label: Option<String>,
    pub controls: ControlFlags,
}

pub fn build_frame(
    series: &MinuteSeries,
    aggregated: &[AggregatedCandle],
    timeframe: Timeframe,
    cursor: usize,
    state: ReplayState,
) -> RenderFrame {
    let view = CursorView::derive(cursor, timeframe);

    let mut candles: Vec<VisibleCandle> = aggregated
        .iter()
        .take(view.completed)
        .map(|agg| VisibleCandle {
            start_timestamp_ms: agg.start_timestamp_ms,
            candle: agg.as_candle(),
            in_progress: false,
        })
        .collect();

    if view.minute_offset > 0 {
        if let Some(agg) = aggregated.get(view.completed) {
            candles.push(VisibleCandle {
                start_timestamp_ms: agg.start_timestamp_ms,
                candle: agg.snapshot_after(view.minute_offset),
                in_progress: true,
            });
        }
    }

    let at_end = cursor >= series.len();
    RenderFrame {
        candles,
        clock_label: cursor.checked_sub(1).map(|idx| series.clock_label(idx)),
        controls: ControlFlags {
            can_start: state != ReplayState::Playing && !at_end,
            can_pause: state == ReplayState::Playing,
            can_step: state != ReplayState::Playing,
            at_start: cursor == 0,
            at_end,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::minute_series::test_support::synthetic_series;
    use crate::replay::aggregate::aggregate;

    const T0: i64 = 1_709_303_400_000; // 2024-03-01 14:30 UTC

    #[test]
    fn test_cursor_zero_shows_empty_chart() {
        let series = synthetic_series(12, T0, 100.0);
        let aggregated = aggregate(&series, Timeframe::M5);

        let frame = build_frame(&series, &aggregated, Timeframe::M5, 0, ReplayState::Stopped);
        assert!(frame.candles.is_empty());
        assert_eq!(frame.clock_label, None);
        assert!(frame.controls.at_start);
        assert!(frame.controls.can_start);
        assert!(!frame.controls.can_pause);
    }

    #[test]
    fn test_mid_window_cursor_draws_partial_candle() {
        let series = synthetic_series(12, T0, 100.0);
        let aggregated = aggregate(&series, Timeframe::M5);

        // 7 minutes played: one closed 5m candle plus 2 minutes of the next.
        let frame = build_frame(&series, &aggregated, Timeframe::M5, 7, ReplayState::Playing);
        assert_eq!(frame.candles.len(), 2);
        assert!(!frame.candles[0].in_progress);
        assert!(frame.candles[1].in_progress);
        assert_eq!(frame.candles[1].candle, aggregated[1].snapshot_after(2));
        // Partial never leaks the window's final close early.
        assert_ne!(frame.candles[1].candle.close, aggregated[1].close);
    }

    #[test]
    fn test_window_boundary_draws_only_closed_candles() {
        let series = synthetic_series(12, T0, 100.0);
        let aggregated = aggregate(&series, Timeframe::M5);

        let frame = build_frame(&series, &aggregated, Timeframe::M5, 10, ReplayState::Playing);
        assert_eq!(frame.candles.len(), 2);
        assert!(frame.candles.iter().all(|c| !c.in_progress));
        assert_eq!(frame.candles[1].candle, aggregated[1].as_candle());
    }

    #[test]
    fn test_clock_label_follows_last_played_minute() {
        let series = synthetic_series(12, T0, 100.0);
        let aggregated = aggregate(&series, Timeframe::M1);

        let frame = build_frame(&series, &aggregated, Timeframe::M1, 3, ReplayState::Playing);
        assert_eq!(frame.clock_label.as_deref(), Some("14:32"));
    }

    #[test]
    fn test_end_of_series_disables_start_and_flags_end() {
        let series = synthetic_series(12, T0, 100.0);
        let aggregated = aggregate(&series, Timeframe::M5);

        let frame = build_frame(&series, &aggregated, Timeframe::M5, 12, ReplayState::Stopped);
        assert_eq!(frame.candles.len(), 3);
        assert!(frame.candles[2].in_progress, "trailing short window stays partial");
        assert!(frame.controls.at_end);
        assert!(!frame.controls.can_start);
        assert!(frame.controls.can_step);
    }
}
