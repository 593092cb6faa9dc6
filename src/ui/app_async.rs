//! Promise plumbing between the immediate-mode UI and the async gateway.
//!
//! Requests are spawned into [`poll_promise::Promise`]s and polled each frame;
//! the handlers here keep one in-flight slot per request family so a second
//! click while a fetch is pending simply replaces the old promise.

use poll_promise::Promise;

use crate::config;
use crate::data::{
    ApiError, ChartQuery, DateList, GapCriteria, GapInsights, MarketDataApi,
};
use crate::domain::MinuteSeries;
use crate::session::PanelKind;
use crate::ui::app::ReplayDeskApp;

pub type FetchPromise<T> = Promise<Result<T, ApiError>>;

#[cfg(not(target_arch = "wasm32"))]
pub type SharedGateway = std::sync::Arc<dyn MarketDataApi + Send + Sync>;
#[cfg(target_arch = "wasm32")]
pub type SharedGateway = std::sync::Arc<dyn MarketDataApi>;

impl ReplayDeskApp {
    #[cfg(not(target_arch = "wasm32"))]
    fn spawn_fetch<T, F, Fut>(&self, op: F) -> Option<FetchPromise<T>>
    where
        T: Send + 'static,
        F: FnOnce(SharedGateway) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<T, ApiError>> + Send,
    {
        let gateway = self.gateway.clone()?;
        let runtime = self.runtime.clone()?;
        Some(Promise::spawn_thread("api_fetch", move || {
            runtime.block_on(op(gateway))
        }))
    }

    #[cfg(target_arch = "wasm32")]
    fn spawn_fetch<T, F, Fut>(&self, op: F) -> Option<FetchPromise<T>>
    where
        T: Send + 'static,
        F: FnOnce(SharedGateway) -> Fut + 'static,
        Fut: std::future::Future<Output = Result<T, ApiError>> + 'static,
    {
        let gateway = self.gateway.clone()?;
        Some(Promise::spawn_local(op(gateway)))
    }

    pub(super) fn start_tickers_fetch(&mut self) {
        self.tickers_promise =
            self.spawn_fetch(|gateway| async move { gateway.fetch_tickers().await });
    }

    pub(super) fn start_years_fetch(&mut self) {
        self.years_promise =
            self.spawn_fetch(|gateway| async move { gateway.fetch_years().await });
    }

    pub(super) fn start_valid_dates_fetch(&mut self, panel: PanelKind, ticker: String) {
        let promise = self.spawn_fetch(move |gateway| async move {
            gateway.fetch_valid_dates(&ticker).await
        });
        self.valid_dates_promise = promise.map(|p| (panel, p));
    }

    pub(super) fn start_chart_fetch(&mut self, panel: PanelKind, query: ChartQuery) {
        let promise = self.spawn_fetch(move |gateway| async move {
            gateway.fetch_minute_series(&query).await
        });
        self.chart_promise = promise.map(|p| (panel, p));
    }

    pub(super) fn start_gap_dates_fetch(&mut self, criteria: GapCriteria) {
        let promise = self.spawn_fetch(move |gateway| async move {
            gateway.fetch_gap_dates(&criteria).await
        });
        self.date_list_promise = promise.map(|p| (PanelKind::Gaps, p));
    }

    pub(super) fn start_event_dates_fetch(&mut self, event_type: String, year: i32) {
        let promise = self.spawn_fetch(move |gateway| async move {
            gateway.fetch_event_dates(&event_type, year).await
        });
        self.date_list_promise = promise.map(|p| (PanelKind::Events, p));
    }

    pub(super) fn start_earnings_dates_fetch(&mut self, ticker: String, bin: Option<String>) {
        let promise = self.spawn_fetch(move |gateway| async move {
            gateway.fetch_earnings_dates(&ticker, bin.as_deref()).await
        });
        self.date_list_promise = promise.map(|p| (PanelKind::Earnings, p));
    }

    pub(super) fn start_insights_fetch(&mut self, criteria: GapCriteria) {
        self.insights_promise = self.spawn_fetch(move |gateway| async move {
            gateway.fetch_gap_insights(&criteria).await
        });
    }

    /// Drains every finished promise into app state. Called once per frame.
    pub(super) fn poll_async_fetches(&mut self) {
        if let Some(promise) = &self.tickers_promise {
            if let Some(result) = promise.ready() {
                match result {
                    Ok(tickers) => self.tickers = tickers.clone(),
                    Err(err) => self.last_error = Some(err.to_string()),
                }
                self.tickers_promise = None;
            }
        }

        if let Some(promise) = &self.years_promise {
            if let Some(result) = promise.ready() {
                match result {
                    Ok(years) => self.years = years.clone(),
                    Err(err) => self.last_error = Some(err.to_string()),
                }
                self.years_promise = None;
            }
        }

        if let Some((panel, promise)) = &self.valid_dates_promise {
            if let Some(result) = promise.ready() {
                let panel = *panel;
                match result {
                    Ok(dates) => {
                        let dates = dates.clone();
                        let state = self.panel_state_mut(panel);
                        state.available_dates = dates;
                        state.dates_message = None;
                    }
                    Err(err) => self.last_error = Some(err.to_string()),
                }
                self.valid_dates_promise = None;
            }
        }

        if let Some((panel, promise)) = &self.chart_promise {
            if let Some(result) = promise.ready() {
                let panel = *panel;
                match result {
                    Ok(series) => {
                        if config::PRINT_DATA_FETCH {
                            log::info!(
                                "[{panel}] chart loaded, {} minutes",
                                series.len()
                            );
                        }
                        let series = series.clone();
                        self.workbench.session_mut(panel).load_series(series);
                    }
                    // A failed load leaves the current chart untouched
                    Err(err) => self.last_error = Some(err.to_string()),
                }
                self.chart_promise = None;
            }
        }

        if let Some((panel, promise)) = &self.date_list_promise {
            if let Some(result) = promise.ready() {
                let panel = *panel;
                match result {
                    Ok(list) => {
                        let list = list.clone();
                        let state = self.panel_state_mut(panel);
                        state.available_dates = list.dates;
                        state.dates_message = list.message;
                        state.date = None;
                    }
                    Err(err) => self.last_error = Some(err.to_string()),
                }
                self.date_list_promise = None;
            }
        }

        if let Some(promise) = &self.insights_promise {
            if let Some(result) = promise.ready() {
                match result {
                    Ok(insights) => {
                        let insights = insights.clone();
                        self.panel_state_mut(PanelKind::Gaps).insights = Some(insights);
                    }
                    Err(err) => self.last_error = Some(err.to_string()),
                }
                self.insights_promise = None;
            }
        }
    }
}
