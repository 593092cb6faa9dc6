use itertools::Itertools;

use crate::domain::{AggregatedCandle, MinuteSeries, MinuteSnapshot, Timeframe};

/// Folds a minute series into `timeframe`-sized candles, recording the
/// running high/low/close/volume after every minute past each window's first
/// so the replay clock can redraw an in-progress candle minute by minute.
///
/// A trailing partial window is kept as a short final candle, never dropped.
/// Deterministic; output order matches input order.
pub fn aggregate(series: &MinuteSeries, timeframe: Timeframe) -> Vec<AggregatedCandle> {
    series.debug_check_parallel();
    if series.is_empty() {
        return Vec::new();
    }

    let window = timeframe.minutes();
    if window == 1 {
        // One candle per minute, no intra-candle updates to record.
        return (0..series.len())
            .map(|idx| {
                let bar = series.get_candle(idx);
                AggregatedCandle {
                    start_timestamp_ms: series.timestamps_ms[idx],
                    open: bar.open,
                    high: bar.high,
                    low: bar.low,
                    close: bar.close,
                    volume: bar.volume,
                    first_minute: MinuteSnapshot {
                        high: bar.high,
                        low: bar.low,
                        close: bar.close,
                        volume: bar.volume,
                    },
                    minute_updates: Vec::new(),
                }
            })
            .collect();
    }

    let mut candles = Vec::with_capacity(series.len().div_ceil(window));
    for chunk in &(0..series.len()).chunks(window) {
        let mut candle: Option<AggregatedCandle> = None;
        for idx in chunk {
            let bar = series.get_candle(idx);
            match candle.as_mut() {
                None => {
                    candle = Some(AggregatedCandle {
                        start_timestamp_ms: series.timestamps_ms[idx],
                        open: bar.open,
                        high: bar.high,
                        low: bar.low,
                        close: bar.close,
                        volume: bar.volume,
                        first_minute: MinuteSnapshot {
                            high: bar.high,
                            low: bar.low,
                            close: bar.close,
                            volume: bar.volume,
                        },
                        minute_updates: Vec::new(),
                    });
                }
                Some(current) => {
                    current.high = current.high.max(bar.high);
                    current.low = current.low.min(bar.low);
                    current.close = bar.close;
                    current.volume += bar.volume;
                    current.minute_updates.push(MinuteSnapshot {
                        high: current.high,
                        low: current.low,
                        close: current.close,
                        volume: current.volume,
                    });
                }
            }
        }
        // chunks() never yields an empty chunk
        candles.push(candle.expect("empty aggregation window"));
    }
    candles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::minute_series::test_support::synthetic_series;

    const T0: i64 = 1_709_303_400_000;

    #[test]
    fn test_timeframe_1_is_one_candle_per_minute() {
        let series = synthetic_series(7, T0, 100.0);
        let candles = aggregate(&series, Timeframe::M1);

        assert_eq!(candles.len(), series.len());
        for (idx, candle) in candles.iter().enumerate() {
            assert!(candle.minute_updates.is_empty(), "candle {idx} has updates");
            assert_eq!(candle.open, series.opens[idx]);
            assert_eq!(candle.close, series.closes[idx]);
        }
    }

    #[test]
    fn test_partition_counts_and_window_stats() {
        // 11 minutes at timeframe 5 -> 3 candles, last one short (1 minute)
        let series = synthetic_series(11, T0, 100.0);
        let candles = aggregate(&series, Timeframe::M5);

        assert_eq!(candles.len(), 3, "expected ceil(11/5) candles");
        assert_eq!(candles[0].window_len(), 5);
        assert_eq!(candles[2].window_len(), 1, "trailing partial window kept");

        for (c_idx, candle) in candles.iter().enumerate() {
            let start = c_idx * 5;
            let end = (start + 5).min(series.len());
            let window_high = series.highs[start..end]
                .iter()
                .fold(f64::MIN, |acc, &h| acc.max(h));
            let window_volume: f64 = series.volumes[start..end].iter().sum();

            assert_eq!(candle.open, series.opens[start]);
            assert_eq!(candle.high, window_high);
            assert_eq!(candle.close, series.closes[end - 1]);
            assert_eq!(candle.volume, window_volume);
            assert_eq!(candle.start_timestamp_ms, series.timestamps_ms[start]);
        }
    }

    #[test]
    fn test_minute_updates_reflect_running_state() {
        let series = synthetic_series(10, T0, 100.0);
        let candles = aggregate(&series, Timeframe::M5);

        let candle = &candles[0];
        assert_eq!(candle.minute_updates.len(), 4);
        for (i, snap) in candle.minute_updates.iter().enumerate() {
            // Entry i covers window minutes 0 ..= i+1, never the final close
            // until the last minute is actually absorbed.
            let through = i + 2;
            let high = series.highs[..through]
                .iter()
                .fold(f64::MIN, |acc, &h| acc.max(h));
            let volume: f64 = series.volumes[..through].iter().sum();
            assert_eq!(snap.high, high, "running high at update {i}");
            assert_eq!(snap.close, series.closes[through - 1]);
            assert_eq!(snap.volume, volume);
        }
    }

    #[test]
    fn test_snapshot_after_matches_updates() {
        let series = synthetic_series(6, T0, 50.0);
        let candles = aggregate(&series, Timeframe::M3);

        let candle = &candles[0];
        let after_one = candle.snapshot_after(1);
        assert_eq!(after_one.close, series.closes[0]);
        assert_eq!(after_one.open, candle.open);

        let after_three = candle.snapshot_after(3);
        assert_eq!(after_three.close, candle.close);
        assert_eq!(after_three.volume, candle.volume);
    }
}
