use chrono::{DateTime, NaiveTime, Timelike};

use crate::domain::candle::Candle;

// ============================================================================
// MinuteSeries: one trading day of minute bars for a single (ticker, date)
// ============================================================================

/// Parallel ordered sequences, one entry per trading minute. All vectors are
/// equal length and timestamps are strictly increasing; a violation is a
/// programming error upstream, not a handled condition.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MinuteSeries {
    pub ticker: String,
    pub date: String,

    pub timestamps_ms: Vec<i64>,

    // Prices
    pub opens: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,

    // Volumes
    pub volumes: Vec<f64>,
}

impl MinuteSeries {
    pub fn len(&self) -> usize {
        self.timestamps_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps_ms.is_empty()
    }

    pub fn get_candle(&self, idx: usize) -> Candle {
        Candle::new(
            self.opens[idx],
            self.highs[idx],
            self.lows[idx],
            self.closes[idx],
            self.volumes[idx],
        )
    }

    /// Fail-fast consistency check. Called by the aggregator before any work;
    /// mismatched lengths mean the gateway produced garbage.
    pub fn debug_check_parallel(&self) {
        let n = self.timestamps_ms.len();
        debug_assert!(
            self.opens.len() == n
                && self.highs.len() == n
                && self.lows.len() == n
                && self.closes.len() == n
                && self.volumes.len() == n,
            "MinuteSeries columns out of sync: ts={} o={} h={} l={} c={} v={}",
            n,
            self.opens.len(),
            self.highs.len(),
            self.lows.len(),
            self.closes.len(),
            self.volumes.len()
        );
        debug_assert!(
            self.timestamps_ms.windows(2).all(|w| w[0] < w[1]),
            "MinuteSeries timestamps not strictly increasing"
        );
    }

    /// First index whose time-of-day is at or after `target`, if any.
    pub fn index_at_or_after(&self, target: NaiveTime) -> Option<usize> {
        self.timestamps_ms.iter().position(|&ts| {
            time_of_day(ts)
                .map(|tod| tod >= target)
                .unwrap_or(false)
        })
    }

    /// "HH:MM" label for the given minute, for the replay clock readout.
    pub fn clock_label(&self, idx: usize) -> String {
        match DateTime::from_timestamp_millis(self.timestamps_ms[idx]) {
            Some(dt) => format!("{:02}:{:02}", dt.hour(), dt.minute()),
            None => "--:--".to_string(),
        }
    }
}

fn time_of_day(ts_ms: i64) -> Option<NaiveTime> {
    DateTime::from_timestamp_millis(ts_ms).map(|dt| dt.time())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::MinuteSeries;

    /// Builds a series of `n` one-minute bars starting at `start_ms`, with
    /// close = base + index so price paths are easy to reason about in tests.
    pub fn synthetic_series(n: usize, start_ms: i64, base: f64) -> MinuteSeries {
        let mut series = MinuteSeries {
            ticker: "QQQ".to_string(),
            date: "2024-03-01".to_string(),
            ..Default::default()
        };
        for i in 0..n {
            let px = base + i as f64;
            series.timestamps_ms.push(start_ms + i as i64 * 60_000);
            series.opens.push(px);
            series.highs.push(px + 0.5);
            series.lows.push(px - 0.5);
            series.closes.push(px + 0.25);
            series.volumes.push(100.0 + i as f64);
        }
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    // 2024-03-01 14:30 UTC
    pub const SESSION_OPEN_MS: i64 = 1_709_303_400_000;

    #[test]
    fn test_index_at_or_after_finds_first_match() {
        let series = test_support::synthetic_series(10, SESSION_OPEN_MS, 100.0);
        let target = NaiveTime::from_hms_opt(14, 35, 0).unwrap();
        assert_eq!(series.index_at_or_after(target), Some(5));
    }

    #[test]
    fn test_index_at_or_after_none_when_past_session() {
        let series = test_support::synthetic_series(10, SESSION_OPEN_MS, 100.0);
        let target = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        assert_eq!(series.index_at_or_after(target), None);
    }

    #[test]
    fn test_clock_label_formats_minute() {
        let series = test_support::synthetic_series(3, SESSION_OPEN_MS, 100.0);
        assert_eq!(series.clock_label(0), "14:30");
        assert_eq!(series.clock_label(2), "14:32");
    }
}
