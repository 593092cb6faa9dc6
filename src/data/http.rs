//! reqwest-backed implementation of the backend contract.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config;
use crate::data::api::{
    ApiError, ChartPayload, ChartQuery, DateList, GapCriteria, GapInsights, InsightRow,
    MarketDataApi,
};
use crate::domain::MinuteSeries;

/// Error envelope the backend uses for every failure, including 429s.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    limit_reached: bool,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart_data: ChartPayload,
}

#[derive(Debug, Deserialize)]
struct TickersResponse {
    tickers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct YearsResponse {
    years: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct InsightsResponse {
    #[serde(default)]
    insights: BTreeMap<String, RawInsight>,
    #[serde(default)]
    message: Option<String>,
}

/// Metric values arrive as numbers or preformatted "HH:MM" strings.
#[derive(Debug, Deserialize)]
struct RawInsight {
    #[serde(default)]
    median: Option<serde_json::Value>,
    #[serde(default)]
    average: Option<serde_json::Value>,
    #[serde(default)]
    description: Option<String>,
}

fn format_metric(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().map(|v| format!("{v:.2}")),
        serde_json::Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

pub struct HttpGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_millis(config::API.client.timeout_ms));
        Ok(Self {
            base_url: base_url.into(),
            client: builder.build()?,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        if config::PRINT_DATA_FETCH {
            log::debug!("GET {url} {params:?}");
        }

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .json::<ErrorBody>()
                .await
                .unwrap_or_else(|_| ErrorBody {
                    error: format!("HTTP {status}"),
                    limit_reached: false,
                });
            if status.as_u16() == 429 || body.limit_reached {
                return Err(ApiError::RateLimited(body.error));
            }
            return Err(ApiError::Backend(body.error));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Backend(format!("malformed response: {e}")))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketDataApi for HttpGateway {
    async fn fetch_minute_series(&self, query: &ChartQuery) -> Result<MinuteSeries, ApiError> {
        // timeframe stays 1: coarser candles are aggregated on our side so
        // the replay cursor keeps minute granularity.
        let params = [
            ("ticker", query.ticker.clone()),
            ("date", query.date.clone()),
            ("timeframe", "1".to_string()),
            ("restrict_hours", query.restrict_hours.to_string()),
            ("replay_mode", "true".to_string()),
        ];
        let response: ChartResponse = self.get_json("/api/stock/chart", &params).await?;
        response.chart_data.into_minute_series()
    }

    async fn fetch_tickers(&self) -> Result<Vec<String>, ApiError> {
        let response: TickersResponse = self.get_json("/api/tickers", &[]).await?;
        Ok(response.tickers)
    }

    async fn fetch_valid_dates(&self, ticker: &str) -> Result<Vec<String>, ApiError> {
        let params = [("ticker", ticker.to_string())];
        let response: DateList = self.get_json("/api/valid_dates", &params).await?;
        Ok(response.dates)
    }

    async fn fetch_years(&self) -> Result<Vec<i32>, ApiError> {
        let response: YearsResponse = self.get_json("/api/years", &[]).await?;
        Ok(response.years)
    }

    async fn fetch_gap_dates(&self, criteria: &GapCriteria) -> Result<DateList, ApiError> {
        let params = [
            ("gap_size", criteria.gap_size.clone()),
            ("day", criteria.day.clone()),
            ("gap_direction", criteria.direction.query_value().to_string()),
        ];
        self.get_json("/api/gaps", &params).await
    }

    async fn fetch_event_dates(&self, event_type: &str, year: i32) -> Result<DateList, ApiError> {
        let params = [
            ("event_type", event_type.to_string()),
            ("year", year.to_string()),
        ];
        self.get_json("/api/events", &params).await
    }

    async fn fetch_earnings_dates(
        &self,
        ticker: &str,
        bin: Option<&str>,
    ) -> Result<DateList, ApiError> {
        match bin {
            Some(bin) => {
                let params = [("ticker", ticker.to_string()), ("bin", bin.to_string())];
                self.get_json("/api/earnings_by_bin", &params).await
            }
            None => {
                let params = [("ticker", ticker.to_string())];
                self.get_json("/api/earnings", &params).await
            }
        }
    }

    async fn fetch_gap_insights(&self, criteria: &GapCriteria) -> Result<GapInsights, ApiError> {
        let params = [
            ("gap_size", criteria.gap_size.clone()),
            ("day", criteria.day.clone()),
            ("gap_direction", criteria.direction.query_value().to_string()),
        ];
        let response: InsightsResponse = self.get_json("/api/gap_insights", &params).await?;
        let rows = response
            .insights
            .into_iter()
            .map(|(key, raw)| InsightRow {
                key,
                median: raw.median.as_ref().and_then(format_metric),
                average: raw.average.as_ref().and_then(format_metric),
                description: raw.description.unwrap_or_default(),
            })
            .collect();
        Ok(GapInsights {
            rows,
            message: response.message,
        })
    }
}
