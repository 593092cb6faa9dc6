use eframe::{Frame, egui};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::config;
use crate::data::{ActionBudget, ChartQuery, GapCriteria, GapInsights};
use crate::session::{PanelKind, Workbench};
use crate::ui::app_async::{FetchPromise, SharedGateway};
use crate::ui::config::UI_TEXT;
use crate::ui::ui_panels::{
    ChartLoadEvent, EarningsEvent, EventsEvent, GapEvent, ReplayEvent, TradeEvent,
};
use crate::ui::ui_plot_view::PlotView;
use crate::ui::utils::{format_wait, setup_custom_visuals};
use crate::domain::MinuteSeries;
use crate::data::DateList;

#[cfg(not(target_arch = "wasm32"))]
use std::sync::Arc;

/// Selector and notice state for one panel's side bar. Everything here is UI
/// bookkeeping; replay/simulator state lives in the panel's session.
#[derive(Serialize, Deserialize, Default)]
pub struct PanelUiState {
    pub ticker: Option<String>,
    #[serde(skip)]
    pub date: Option<String>,
    #[serde(skip)]
    pub available_dates: Vec<String>,
    #[serde(skip)]
    pub dates_message: Option<String>,
    pub restrict_hours: bool,
    pub start_time_text: String,

    pub gap_criteria: GapCriteria,
    pub event_type: String,
    #[serde(skip)]
    pub event_year: Option<i32>,
    pub earnings_bin: Option<String>,

    #[serde(skip)]
    pub insights: Option<GapInsights>,
    #[serde(skip)]
    pub notice: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ReplayDeskApp {
    // Persisted UI state
    pub(super) active_panel: PanelKind,
    pub(super) panel_ui: HashMap<PanelKind, PanelUiState>,

    // Runtime-only state below; everything is rebuilt on startup
    #[serde(skip)]
    pub(super) workbench: Workbench,
    #[serde(skip)]
    pub(super) plot_view: PlotView,
    #[serde(skip)]
    pub(super) gateway: Option<SharedGateway>,
    #[cfg(not(target_arch = "wasm32"))]
    #[serde(skip)]
    pub(super) runtime: Option<Arc<tokio::runtime::Runtime>>,
    #[serde(skip)]
    pub(super) budget: ActionBudget,
    #[serde(skip)]
    pub(super) tickers: Vec<String>,
    #[serde(skip)]
    pub(super) years: Vec<i32>,
    #[serde(skip)]
    pub(super) last_error: Option<String>,

    // In-flight fetches, one slot per request family
    #[serde(skip)]
    pub(super) tickers_promise: Option<FetchPromise<Vec<String>>>,
    #[serde(skip)]
    pub(super) years_promise: Option<FetchPromise<Vec<i32>>>,
    #[serde(skip)]
    pub(super) valid_dates_promise: Option<(PanelKind, FetchPromise<Vec<String>>)>,
    #[serde(skip)]
    pub(super) chart_promise: Option<(PanelKind, FetchPromise<MinuteSeries>)>,
    #[serde(skip)]
    pub(super) date_list_promise: Option<(PanelKind, FetchPromise<DateList>)>,
    #[serde(skip)]
    pub(super) insights_promise: Option<FetchPromise<GapInsights>>,
}

impl Default for ReplayDeskApp {
    fn default() -> Self {
        Self {
            active_panel: PanelKind::default(),
            panel_ui: HashMap::new(),
            workbench: Workbench::default(),
            plot_view: PlotView::default(),
            gateway: None,
            #[cfg(not(target_arch = "wasm32"))]
            runtime: None,
            budget: ActionBudget::default(),
            tickers: Vec::new(),
            years: Vec::new(),
            last_error: None,
            tickers_promise: None,
            years_promise: None,
            valid_dates_promise: None,
            chart_promise: None,
            date_list_promise: None,
            insights_promise: None,
        }
    }
}

impl ReplayDeskApp {
    pub fn new(cc: &eframe::CreationContext<'_>, gateway: SharedGateway) -> Self {
        let mut app: ReplayDeskApp = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        if config::PRINT_STATE_SERDE {
            log::info!("UI state restored for panel {:?}", app.active_panel);
        }

        app.gateway = Some(gateway);
        #[cfg(not(target_arch = "wasm32"))]
        {
            app.runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map(Arc::new)
                .ok();
        }
        for kind in [
            PanelKind::Replay,
            PanelKind::Gaps,
            PanelKind::Events,
            PanelKind::Earnings,
        ] {
            app.panel_ui.entry(kind).or_default();
        }
        // Gap analysis in the source data is index-only
        let gaps = app.panel_ui.entry(PanelKind::Gaps).or_default();
        if gaps.ticker.is_none() {
            gaps.ticker = Some("QQQ".to_string());
        }
        if gaps.gap_criteria.gap_size.is_empty() {
            gaps.gap_criteria.gap_size = crate::data::api::GAP_SIZE_BINS[0].to_string();
        }
        if gaps.gap_criteria.day.is_empty() {
            gaps.gap_criteria.day = crate::data::api::WEEKDAYS[0].to_string();
        }

        app.start_tickers_fetch();
        app.start_years_fetch();
        app
    }

    pub(super) fn panel_state(&self, kind: PanelKind) -> &PanelUiState {
        // Entries for every panel are created in new()
        self.panel_ui.get(&kind).unwrap_or_else(|| {
            unreachable!("panel ui state missing for {kind}")
        })
    }

    pub(super) fn panel_state_mut(&mut self, kind: PanelKind) -> &mut PanelUiState {
        self.panel_ui.entry(kind).or_default()
    }

    /// Charges the action budget, surfacing the cooldown when exhausted.
    pub(super) fn charge_budget(&mut self) -> bool {
        match self.budget.try_consume() {
            Ok(()) => {
                self.last_error = None;
                true
            }
            Err(wait) => {
                self.last_error = Some(format!(
                    "{}{}",
                    UI_TEXT.budget_exhausted_prefix,
                    format_wait(wait)
                ));
                false
            }
        }
    }

    // -- event handlers -----------------------------------------------------

    pub(super) fn handle_chart_event(&mut self, panel: PanelKind, event: ChartLoadEvent) {
        match event {
            ChartLoadEvent::TickerSelected(ticker) => {
                let state = self.panel_state_mut(panel);
                state.ticker = Some(ticker.clone());
                state.date = None;
                state.available_dates.clear();
                state.dates_message = None;
                self.start_valid_dates_fetch(panel, ticker);
            }
            ChartLoadEvent::DateSelected(date) => {
                self.panel_state_mut(panel).date = Some(date);
            }
            ChartLoadEvent::RestrictHours(value) => {
                self.panel_state_mut(panel).restrict_hours = value;
            }
            ChartLoadEvent::Load => {
                let state = self.panel_state(panel);
                let (Some(ticker), Some(date)) = (state.ticker.clone(), state.date.clone()) else {
                    return;
                };
                let query = ChartQuery {
                    ticker,
                    date,
                    restrict_hours: state.restrict_hours,
                };
                if self.charge_budget() {
                    if config::PRINT_UI_INTERACTIONS {
                        log::info!("[{panel}] loading {} {}", query.ticker, query.date);
                    }
                    self.panel_state_mut(panel).notice = None;
                    self.start_chart_fetch(panel, query);
                }
            }
        }
    }

    pub(super) fn handle_replay_event(&mut self, panel: PanelKind, event: ReplayEvent) {
        let start_time = {
            let text = self.panel_state(panel).start_time_text.trim().to_string();
            (!text.is_empty()).then_some(text)
        };
        if matches!(event, ReplayEvent::Start | ReplayEvent::StartOver) {
            self.panel_state_mut(panel).notice = None;
        }
        let session = self.workbench.session_mut(panel);
        match event {
            ReplayEvent::Start => session.start_replay(start_time.as_deref()),
            ReplayEvent::Pause => session.pause_replay(),
            ReplayEvent::StartOver => session.start_over(),
            ReplayEvent::StepBack => session.step_back(),
            ReplayEvent::StepForward => session.step_forward(),
            ReplayEvent::TimeframeSelected(timeframe) => session.set_timeframe(timeframe),
            ReplayEvent::SpeedSelected(speed) => session.set_speed(speed),
        }
    }

    pub(super) fn handle_trade_event(&mut self, panel: PanelKind, event: TradeEvent) {
        let session = self.workbench.session_mut(panel);
        match event {
            TradeEvent::Buy => session.buy(),
            TradeEvent::Sell => session.sell(),
        }
    }

    pub(super) fn handle_gap_event(&mut self, event: GapEvent) {
        match event {
            GapEvent::SizeSelected(size) => {
                self.panel_state_mut(PanelKind::Gaps).gap_criteria.gap_size = size;
            }
            GapEvent::DaySelected(day) => {
                self.panel_state_mut(PanelKind::Gaps).gap_criteria.day = day;
            }
            GapEvent::DirectionSelected(direction) => {
                self.panel_state_mut(PanelKind::Gaps).gap_criteria.direction = direction;
            }
            GapEvent::FindDates => {
                let criteria = self.panel_state(PanelKind::Gaps).gap_criteria.clone();
                if self.charge_budget() {
                    self.start_gap_dates_fetch(criteria);
                }
            }
            GapEvent::GetInsights => {
                let criteria = self.panel_state(PanelKind::Gaps).gap_criteria.clone();
                if self.charge_budget() {
                    self.start_insights_fetch(criteria);
                }
            }
        }
    }

    pub(super) fn handle_events_event(&mut self, event: EventsEvent) {
        match event {
            EventsEvent::YearSelected(year) => {
                self.panel_state_mut(PanelKind::Events).event_year = Some(year);
            }
            EventsEvent::FindDates => {
                let state = self.panel_state(PanelKind::Events);
                let (event_type, Some(year)) = (state.event_type.clone(), state.event_year) else {
                    return;
                };
                if self.charge_budget() {
                    self.start_event_dates_fetch(event_type, year);
                }
            }
        }
    }

    pub(super) fn handle_earnings_event(&mut self, event: EarningsEvent) {
        match event {
            EarningsEvent::BinSelected(bin) => {
                self.panel_state_mut(PanelKind::Earnings).earnings_bin = bin;
            }
            EarningsEvent::FindDates => {
                let state = self.panel_state(PanelKind::Earnings);
                let Some(ticker) = state.ticker.clone() else {
                    return;
                };
                let bin = state.earnings_bin.clone();
                if self.charge_budget() {
                    self.start_earnings_dates_fetch(ticker, bin);
                }
            }
        }
    }

    /// Trade actions are meaningful only mid-replay; the desk itself also
    /// refuses a second open.
    pub(super) fn can_trade(&self, panel: PanelKind) -> bool {
        let session = self.workbench.session(panel);
        session.desk().is_some()
            && session.replay_state() == crate::replay::ReplayState::Playing
            && session.cursor() > 0
    }

    fn any_fetch_in_flight(&self) -> bool {
        self.tickers_promise.is_some()
            || self.years_promise.is_some()
            || self.valid_dates_promise.is_some()
            || self.chart_promise.is_some()
            || self.date_list_promise.is_some()
            || self.insights_promise.is_some()
    }
}

impl eframe::App for ReplayDeskApp {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx);

        self.poll_async_fetches();
        self.workbench.poll_all();

        self.render_top_bar(ctx);
        self.render_side_panel(ctx);
        self.render_central_panel(ctx);
        self.render_status_panel(ctx);

        // Keep frames coming while a clock runs or a fetch is pending;
        // otherwise egui only repaints on input.
        if self.workbench.any_playing() || self.any_fetch_in_flight() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }
}
