//! The backend contract: gateway trait, wire models, and selector vocabulary.

use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::MinuteSeries;

/// Gap size bins offered by the backend's gap statistics.
pub const GAP_SIZE_BINS: &[&str] = &["0.15-0.35%", "0.35-0.5%", "0.5-1%", "1-1.5%", "1.5%+"];

/// Trading weekdays for the gap day-of-week selector.
pub const WEEKDAYS: &[&str] = &["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

/// Earnings outcome bins used by the earnings date lookup.
pub const EARNINGS_BINS: &[&str] = &["Beat", "Slight Beat", "Miss", "Slight Miss", "Unknown"];

/// Errors the gateway surfaces to the UI. Rate limits are terminal for the
/// current load and never retried here.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    RateLimited(String),
    Backend(String),
    Network(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::RateLimited(msg) => write!(f, "Rate limited: {msg}"),
            ApiError::Backend(msg) => write!(f, "Backend error: {msg}"),
            ApiError::Network(msg) => write!(f, "Network error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Parameters for a chart load. Replay always requests 1-minute bars; coarser
/// timeframes are aggregated client-side.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartQuery {
    pub ticker: String,
    pub date: String,
    pub restrict_hours: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GapDirection {
    #[default]
    Up,
    Down,
}

impl GapDirection {
    pub fn query_value(&self) -> &'static str {
        match self {
            GapDirection::Up => "up",
            GapDirection::Down => "down",
        }
    }
}

impl fmt::Display for GapDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapDirection::Up => write!(f, "Gap Up"),
            GapDirection::Down => write!(f, "Gap Down"),
        }
    }
}

/// Filter tuple shared by the gap date lookup and the gap insights readout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GapCriteria {
    pub gap_size: String,
    pub day: String,
    pub direction: GapDirection,
}

/// Date lookups may come back empty with an explanatory message.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct DateList {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One row of the gap insights readout, already formatted for display.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightRow {
    pub key: String,
    pub median: Option<String>,
    pub average: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GapInsights {
    pub rows: Vec<InsightRow>,
    pub message: Option<String>,
}

/// Read-only backend lookups. Implemented by the HTTP gateway and by the
/// offline demo source; nothing here touches replay state.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataApi {
    async fn fetch_minute_series(&self, query: &ChartQuery) -> Result<MinuteSeries, ApiError>;

    async fn fetch_tickers(&self) -> Result<Vec<String>, ApiError>;

    async fn fetch_valid_dates(&self, ticker: &str) -> Result<Vec<String>, ApiError>;

    async fn fetch_years(&self) -> Result<Vec<i32>, ApiError>;

    async fn fetch_gap_dates(&self, criteria: &GapCriteria) -> Result<DateList, ApiError>;

    async fn fetch_event_dates(&self, event_type: &str, year: i32) -> Result<DateList, ApiError>;

    async fn fetch_earnings_dates(
        &self,
        ticker: &str,
        bin: Option<&str>,
    ) -> Result<DateList, ApiError>;

    async fn fetch_gap_insights(&self, criteria: &GapCriteria) -> Result<GapInsights, ApiError>;
}

/// Chart payload as the backend serializes it: parallel arrays plus metadata,
/// timestamps as "%Y-%m-%d %H:%M:%S" strings.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartPayload {
    pub timestamp: Vec<String>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub volume: Vec<f64>,
    pub ticker: String,
    pub date: String,
    #[serde(default)]
    pub count: usize,
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

impl ChartPayload {
    /// Validates the parallel arrays and parses timestamps into epoch millis.
    /// A malformed payload is a backend fault, not an engine precondition.
    pub fn into_minute_series(self) -> Result<MinuteSeries, ApiError> {
        let n = self.timestamp.len();
        if [&self.open, &self.high, &self.low, &self.close, &self.volume]
            .iter()
            .any(|column| column.len() != n)
        {
            return Err(ApiError::Backend(format!(
                "mismatched chart columns for {} {}",
                self.ticker, self.date
            )));
        }

        let mut timestamps_ms = Vec::with_capacity(n);
        for raw in &self.timestamp {
            let parsed = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
                .map_err(|e| ApiError::Backend(format!("bad timestamp '{raw}': {e}")))?;
            timestamps_ms.push(parsed.and_utc().timestamp_millis());
        }

        let series = MinuteSeries {
            ticker: self.ticker,
            date: self.date,
            timestamps_ms,
            opens: self.open,
            highs: self.high,
            lows: self.low,
            closes: self.close,
            volumes: self.volume,
        };
        series.debug_check_parallel();
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(n: usize) -> ChartPayload {
        ChartPayload {
            timestamp: (0..n)
                .map(|i| format!("2024-03-01 09:{:02}:00", 30 + i))
                .collect(),
            open: vec![1.0; n],
            high: vec![2.0; n],
            low: vec![0.5; n],
            close: vec![1.5; n],
            volume: vec![100.0; n],
            ticker: "QQQ".to_string(),
            date: "2024-03-01".to_string(),
            count: n,
        }
    }

    #[test]
    fn test_chart_payload_parses_timestamps_to_millis() {
        let series = payload(3).into_minute_series().unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.timestamps_ms[1] - series.timestamps_ms[0], 60_000);
        assert_eq!(series.clock_label(0), "09:30");
    }

    #[test]
    fn test_chart_payload_rejects_ragged_columns() {
        let mut bad = payload(3);
        bad.close.pop();
        let err = bad.into_minute_series().unwrap_err();
        assert!(matches!(err, ApiError::Backend(_)));
    }

    #[test]
    fn test_chart_payload_rejects_bad_timestamp() {
        let mut bad = payload(2);
        bad.timestamp[1] = "2024-03-01T09:31:00Z".to_string();
        let err = bad.into_minute_series().unwrap_err();
        assert!(matches!(err, ApiError::Backend(_)));
    }
}
