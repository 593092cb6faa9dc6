//! Built-in demo data source for running without a backend.
//!
//! Prices come from a seeded linear congruential walk, so a given
//! (ticker, date) always replays identically.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::{self, DEMO};
use crate::data::api::{
    ApiError, ChartQuery, DateList, GapCriteria, GapInsights, InsightRow, MarketDataApi,
    EARNINGS_BINS,
};
use crate::domain::MinuteSeries;

pub struct OfflineGateway;

struct Lcg(u64);

impl Lcg {
    fn seeded(parts: &[&str]) -> Self {
        // FNV-1a over the identifying strings
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for part in parts {
            for byte in part.bytes() {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
            }
        }
        Self(hash | 1)
    }

    fn next_unit(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        // Top bits have the best statistical quality
        ((self.0 >> 11) as f64) / ((1u64 << 53) as f64)
    }

    /// Uniform in [-1, 1).
    fn next_signed(&mut self) -> f64 {
        self.next_unit() * 2.0 - 1.0
    }
}

fn synthesize_session(ticker: &str, date: &str, base_price: f64) -> Result<MinuteSeries, ApiError> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| ApiError::Backend(format!("bad date '{date}': {e}")))?;
    let open_ms = day
        .and_hms_opt(config::API.session_hours.open.0, config::API.session_hours.open.1, 0)
        .ok_or_else(|| ApiError::Backend("invalid session open".to_string()))?
        .and_utc()
        .timestamp_millis();

    let n = DEMO.minutes_per_session;
    let mut rng = Lcg::seeded(&[ticker, date]);
    let mut series = MinuteSeries {
        ticker: ticker.to_string(),
        date: date.to_string(),
        timestamps_ms: Vec::with_capacity(n),
        opens: Vec::with_capacity(n),
        highs: Vec::with_capacity(n),
        lows: Vec::with_capacity(n),
        closes: Vec::with_capacity(n),
        volumes: Vec::with_capacity(n),
    };

    let mut last_close = base_price;
    for i in 0..n {
        let open = last_close;
        let drift = rng.next_signed() * base_price * 0.0015;
        let close = (open + drift).max(0.01);
        let wick = rng.next_unit() * base_price * 0.0008;
        series.timestamps_ms.push(open_ms + (i as i64) * 60_000);
        series.opens.push(open);
        series.highs.push(open.max(close) + wick);
        series.lows.push((open.min(close) - wick).max(0.01));
        series.closes.push(close);
        series.volumes.push((1_000.0 + rng.next_unit() * 9_000.0).round());
        last_close = close;
    }
    series.debug_check_parallel();
    Ok(series)
}

fn demo_base_price(ticker: &str) -> Option<f64> {
    DEMO.instruments
        .iter()
        .find(|inst| inst.ticker == ticker)
        .map(|inst| inst.base_price)
}

fn demo_dates() -> Vec<String> {
    DEMO.dates.iter().map(|d| d.to_string()).collect()
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataApi for OfflineGateway {
    async fn fetch_minute_series(&self, query: &ChartQuery) -> Result<MinuteSeries, ApiError> {
        let base = demo_base_price(&query.ticker)
            .ok_or_else(|| ApiError::Backend(format!("unknown demo ticker {}", query.ticker)))?;
        synthesize_session(&query.ticker, &query.date, base)
    }

    async fn fetch_tickers(&self) -> Result<Vec<String>, ApiError> {
        Ok(DEMO.instruments.iter().map(|inst| inst.ticker.to_string()).collect())
    }

    async fn fetch_valid_dates(&self, _ticker: &str) -> Result<Vec<String>, ApiError> {
        Ok(demo_dates())
    }

    async fn fetch_years(&self) -> Result<Vec<i32>, ApiError> {
        Ok(vec![2024])
    }

    async fn fetch_gap_dates(&self, _criteria: &GapCriteria) -> Result<DateList, ApiError> {
        // Alternate dates so different criteria still exercise the selector flow
        Ok(DateList {
            dates: demo_dates().into_iter().step_by(2).collect(),
            message: None,
        })
    }

    async fn fetch_event_dates(&self, _event_type: &str, _year: i32) -> Result<DateList, ApiError> {
        Ok(DateList {
            dates: demo_dates().into_iter().skip(1).collect(),
            message: None,
        })
    }

    async fn fetch_earnings_dates(
        &self,
        ticker: &str,
        bin: Option<&str>,
    ) -> Result<DateList, ApiError> {
        if let Some(bin) = bin {
            if !EARNINGS_BINS.contains(&bin) {
                return Ok(DateList {
                    dates: Vec::new(),
                    message: Some(format!("No earnings found for {ticker} in bin {bin}")),
                });
            }
        }
        Ok(DateList {
            dates: demo_dates().into_iter().take(2).collect(),
            message: None,
        })
    }

    async fn fetch_gap_insights(&self, criteria: &GapCriteria) -> Result<GapInsights, ApiError> {
        Ok(GapInsights {
            rows: vec![
                InsightRow {
                    key: "gap_fill_rate".to_string(),
                    median: None,
                    average: Some("68.40".to_string()),
                    description: "Percentage of gaps that close".to_string(),
                },
                InsightRow {
                    key: "median_time_to_fill".to_string(),
                    median: Some("34.00".to_string()),
                    average: Some("51.20".to_string()),
                    description: "Median time in minutes to fill gap".to_string(),
                },
                InsightRow {
                    key: "median_time_of_low".to_string(),
                    median: Some("10:05".to_string()),
                    average: Some("10:42".to_string()),
                    description: format!("Demo statistics for {} {}", criteria.gap_size, criteria.day),
                },
            ],
            message: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_session_is_deterministic() {
        let a = synthesize_session("AAPL", "2024-03-01", 182.5).unwrap();
        let b = synthesize_session("AAPL", "2024-03-01", 182.5).unwrap();
        assert_eq!(a.closes, b.closes);
        assert_eq!(a.len(), DEMO.minutes_per_session);
        assert_eq!(a.clock_label(0), "09:30");
    }

    #[test]
    fn test_synthetic_candles_are_well_formed() {
        let series = synthesize_session("SPY", "2024-02-28", 508.75).unwrap();
        for i in 0..series.len() {
            let candle = series.get_candle(i);
            assert!(candle.high >= candle.open.max(candle.close));
            assert!(candle.low <= candle.open.min(candle.close));
            assert!(candle.low > 0.0);
        }
    }

    #[test]
    fn test_bad_date_is_a_backend_error() {
        let err = synthesize_session("AAPL", "03/01/2024", 182.5).unwrap_err();
        assert!(matches!(err, ApiError::Backend(_)));
    }
}
