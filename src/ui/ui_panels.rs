use eframe::egui::{Color32, ComboBox, RichText, ScrollArea, TextEdit, Ui};
use strum::IntoEnumIterator;

use crate::config::{self, SpeedPreset};
use crate::data::{GapCriteria, GapDirection};
use crate::data::api::{EARNINGS_BINS, GAP_SIZE_BINS, WEEKDAYS};
use crate::domain::Timeframe;
use crate::replay::{ControlFlags, ReplayState};
use crate::sim::{DeskSummary, TradeDesk};
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::{
    colored_subsection_heading, format_pnl, format_price, section_heading, spaced_separator,
};

/// Trait for UI panels that can be rendered
pub trait Panel {
    type Event;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event>;
}

// ---------------------------------------------------------------------------
// Chart loading
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ChartLoadEvent {
    TickerSelected(String),
    DateSelected(String),
    RestrictHours(bool),
    Load,
}

/// Ticker/date selectors plus the load trigger, shared by every panel.
pub struct ChartLoadPanel<'a> {
    tickers: &'a [String],
    selected_ticker: Option<String>,
    dates: &'a [String],
    selected_date: Option<String>,
    restrict_hours: bool,
    budget_remaining: u32,
    loading: bool,
}

impl<'a> ChartLoadPanel<'a> {
    pub fn new(
        tickers: &'a [String],
        selected_ticker: Option<String>,
        dates: &'a [String],
        selected_date: Option<String>,
        restrict_hours: bool,
        budget_remaining: u32,
        loading: bool,
    ) -> Self {
        Self {
            tickers,
            selected_ticker,
            dates,
            selected_date,
            restrict_hours,
            budget_remaining,
            loading,
        }
    }
}

impl Panel for ChartLoadPanel<'_> {
    type Event = ChartLoadEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.chart_load_heading);

        ui.label(colored_subsection_heading(UI_TEXT.ticker_heading));
        ComboBox::from_id_salt("ticker_selector")
            .selected_text(self.selected_ticker.clone().unwrap_or_else(|| "-".to_string()))
            .show_ui(ui, |ui| {
                for ticker in self.tickers {
                    let is_selected = self.selected_ticker.as_ref() == Some(ticker);
                    if ui.selectable_label(is_selected, ticker).clicked() {
                        self.selected_ticker = Some(ticker.clone());
                        events.push(ChartLoadEvent::TickerSelected(ticker.clone()));
                    }
                }
            });

        ui.label(colored_subsection_heading(UI_TEXT.date_heading));
        ScrollArea::vertical()
            .max_height(140.)
            .id_salt("date_selector")
            .show(ui, |ui| {
                for date in self.dates {
                    let is_selected = self.selected_date.as_ref() == Some(date);
                    if ui.selectable_label(is_selected, date).clicked() {
                        self.selected_date = Some(date.clone());
                        events.push(ChartLoadEvent::DateSelected(date.clone()));
                    }
                }
            });

        let mut restrict = self.restrict_hours;
        if ui.checkbox(&mut restrict, UI_TEXT.restrict_hours_label).changed() {
            events.push(ChartLoadEvent::RestrictHours(restrict));
        }

        ui.add_space(5.0);
        let can_load = !self.loading
            && self.budget_remaining > 0
            && self.selected_ticker.is_some()
            && self.selected_date.is_some();
        if ui
            .add_enabled(can_load, eframe::egui::Button::new(UI_TEXT.load_chart_button))
            .clicked()
        {
            events.push(ChartLoadEvent::Load);
        }
        if self.loading {
            ui.label_subdued(UI_TEXT.loading_chart);
        }
        ui.metric(
            UI_TEXT.budget_label,
            &format!("{}/{}", self.budget_remaining, config::API.budget.max_actions),
            Color32::from_rgb(100, 200, 255),
        );
        ui.add_space(10.0);
        events
    }
}

// ---------------------------------------------------------------------------
// Replay controls
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ReplayEvent {
    Start,
    Pause,
    StartOver,
    StepBack,
    StepForward,
    TimeframeSelected(Timeframe),
    SpeedSelected(SpeedPreset),
}

/// Transport strip for one panel's replay clock. Button enablement comes
/// straight from the derived control flags so every widget agrees with the
/// chart.
pub struct ReplayControlsPanel<'a> {
    state: ReplayState,
    controls: ControlFlags,
    timeframe: Timeframe,
    speed: SpeedPreset,
    start_time_text: &'a mut String,
}

impl<'a> ReplayControlsPanel<'a> {
    pub fn new(
        state: ReplayState,
        controls: ControlFlags,
        timeframe: Timeframe,
        speed: SpeedPreset,
        start_time_text: &'a mut String,
    ) -> Self {
        Self {
            state,
            controls,
            timeframe,
            speed,
            start_time_text,
        }
    }
}

impl Panel for ReplayControlsPanel<'_> {
    type Event = ReplayEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.replay_heading);

        ui.horizontal(|ui| {
            ui.label(colored_subsection_heading(UI_TEXT.timeframe_label));
            ComboBox::from_id_salt("timeframe_selector")
                .selected_text(self.timeframe.to_string())
                .show_ui(ui, |ui| {
                    for timeframe in Timeframe::iter() {
                        if ui
                            .selectable_value(&mut self.timeframe, timeframe, timeframe.to_string())
                            .clicked()
                        {
                            events.push(ReplayEvent::TimeframeSelected(timeframe));
                        }
                    }
                });

            ui.label(colored_subsection_heading(UI_TEXT.speed_label));
            ComboBox::from_id_salt("speed_selector")
                .selected_text(self.speed.label())
                .show_ui(ui, |ui| {
                    for speed in SpeedPreset::ALL {
                        if ui
                            .selectable_value(&mut self.speed, speed, speed.label())
                            .clicked()
                        {
                            events.push(ReplayEvent::SpeedSelected(speed));
                        }
                    }
                });
        });

        ui.horizontal(|ui| {
            ui.label(colored_subsection_heading(UI_TEXT.start_time_label));
            ui.add(
                TextEdit::singleline(self.start_time_text)
                    .hint_text(UI_TEXT.start_time_hint)
                    .desired_width(60.0),
            );
        });

        ui.horizontal(|ui| {
            let start_label = if self.state == ReplayState::Paused {
                UI_TEXT.resume_button
            } else {
                UI_TEXT.start_button
            };
            if ui
                .add_enabled(self.controls.can_start, eframe::egui::Button::new(start_label))
                .clicked()
            {
                events.push(ReplayEvent::Start);
            }
            if ui
                .add_enabled(self.controls.can_pause, eframe::egui::Button::new(UI_TEXT.pause_button))
                .clicked()
            {
                events.push(ReplayEvent::Pause);
            }
            if ui.button(UI_TEXT.start_over_button).clicked() {
                events.push(ReplayEvent::StartOver);
            }
        });

        ui.horizontal(|ui| {
            let can_step_back = self.controls.can_step && !self.controls.at_start;
            if ui
                .add_enabled(can_step_back, eframe::egui::Button::new(UI_TEXT.step_back_button))
                .clicked()
            {
                events.push(ReplayEvent::StepBack);
            }
            let can_step_forward = self.controls.can_step && !self.controls.at_end;
            if ui
                .add_enabled(
                    can_step_forward,
                    eframe::egui::Button::new(UI_TEXT.step_forward_button),
                )
                .clicked()
            {
                events.push(ReplayEvent::StepForward);
            }
            if self.controls.at_end {
                ui.label_warning(UI_TEXT.replay_finished);
            }
        });
        ui.add_space(10.0);
        events
    }
}

// ---------------------------------------------------------------------------
// Paper trading
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum TradeEvent {
    Buy,
    Sell,
}

pub struct TradeDeskPanel<'a> {
    desk: &'a TradeDesk,
    summary: DeskSummary,
    can_trade: bool,
}

impl<'a> TradeDeskPanel<'a> {
    pub fn new(desk: &'a TradeDesk, summary: DeskSummary, can_trade: bool) -> Self {
        Self {
            desk,
            summary,
            can_trade,
        }
    }

    fn pnl_color(pnl: f64) -> Color32 {
        if pnl < 0.0 {
            UI_CONFIG.colors.pnl_negative
        } else {
            UI_CONFIG.colors.pnl_positive
        }
    }
}

impl Panel for TradeDeskPanel<'_> {
    type Event = TradeEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.trade_heading);

        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.can_trade, eframe::egui::Button::new(UI_TEXT.buy_button))
                .clicked()
            {
                events.push(TradeEvent::Buy);
            }
            // Sell doubles as "close": it settles any open position first
            if ui
                .add_enabled(self.can_trade, eframe::egui::Button::new(UI_TEXT.sell_button))
                .clicked()
            {
                events.push(TradeEvent::Sell);
            }
        });

        match self.summary {
            DeskSummary::Open {
                side,
                entry_price,
                unrealized_pnl,
            } => {
                ui.label_subheader(UI_TEXT.open_position_label);
                ui.metric("Side", &side.to_string(), UI_CONFIG.colors.label);
                ui.metric("Entry", &format_price(entry_price), UI_CONFIG.colors.label);
                ui.metric(
                    UI_TEXT.unrealized_label,
                    &format_pnl(unrealized_pnl),
                    Self::pnl_color(unrealized_pnl),
                );
            }
            DeskSummary::Flat { realized_pnl } => {
                ui.label_subheader(UI_TEXT.flat_label);
                ui.metric(
                    UI_TEXT.realized_label,
                    &format_pnl(realized_pnl),
                    Self::pnl_color(realized_pnl),
                );
            }
        }

        spaced_separator(ui);
        ui.label(colored_subsection_heading(UI_TEXT.trade_history_heading));
        if self.desk.history().is_empty() {
            ui.label_subdued(UI_TEXT.no_trades_label);
        } else {
            ScrollArea::vertical()
                .max_height(160.)
                .id_salt("trade_history")
                .show(ui, |ui| {
                    for trade in self
                        .desk
                        .history()
                        .iter()
                        .rev()
                        .take(UI_CONFIG.max_visible_trades)
                    {
                        ui.label(
                            RichText::new(format!(
                                "{} {} -> {}  {}",
                                trade.side,
                                format_price(trade.entry_price),
                                format_price(trade.exit_price),
                                format_pnl(trade.pnl),
                            ))
                            .small()
                            .color(Self::pnl_color(trade.pnl)),
                        );
                    }
                });
        }
        ui.add_space(10.0);
        events
    }
}

// ---------------------------------------------------------------------------
// Gap / event / earnings selectors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum GapEvent {
    SizeSelected(String),
    DaySelected(String),
    DirectionSelected(GapDirection),
    FindDates,
    GetInsights,
}

pub struct GapCriteriaPanel {
    criteria: GapCriteria,
    budget_ok: bool,
}

impl GapCriteriaPanel {
    pub fn new(criteria: GapCriteria, budget_ok: bool) -> Self {
        Self { criteria, budget_ok }
    }
}

impl Panel for GapCriteriaPanel {
    type Event = GapEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.gap_heading);

        ui.label(colored_subsection_heading(UI_TEXT.gap_size_label));
        ComboBox::from_id_salt("gap_size")
            .selected_text(&self.criteria.gap_size)
            .show_ui(ui, |ui| {
                for bin in GAP_SIZE_BINS {
                    if ui
                        .selectable_label(self.criteria.gap_size == *bin, *bin)
                        .clicked()
                    {
                        events.push(GapEvent::SizeSelected(bin.to_string()));
                    }
                }
            });

        ui.label(colored_subsection_heading(UI_TEXT.gap_day_label));
        ComboBox::from_id_salt("gap_day")
            .selected_text(&self.criteria.day)
            .show_ui(ui, |ui| {
                for day in WEEKDAYS {
                    if ui.selectable_label(self.criteria.day == *day, *day).clicked() {
                        events.push(GapEvent::DaySelected(day.to_string()));
                    }
                }
            });

        ui.label(colored_subsection_heading(UI_TEXT.gap_direction_label));
        ComboBox::from_id_salt("gap_direction")
            .selected_text(self.criteria.direction.to_string())
            .show_ui(ui, |ui| {
                for direction in [GapDirection::Up, GapDirection::Down] {
                    if ui
                        .selectable_value(&mut self.criteria.direction, direction, direction.to_string())
                        .clicked()
                    {
                        events.push(GapEvent::DirectionSelected(direction));
                    }
                }
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            let ready = self.budget_ok
                && !self.criteria.gap_size.is_empty()
                && !self.criteria.day.is_empty();
            if ui
                .add_enabled(ready, eframe::egui::Button::new(UI_TEXT.find_dates_button))
                .clicked()
            {
                events.push(GapEvent::FindDates);
            }
            if ui
                .add_enabled(ready, eframe::egui::Button::new(UI_TEXT.get_insights_button))
                .clicked()
            {
                events.push(GapEvent::GetInsights);
            }
        });
        ui.add_space(10.0);
        events
    }
}

#[derive(Debug)]
pub enum EventsEvent {
    YearSelected(i32),
    FindDates,
}

pub struct EventCriteriaPanel<'a> {
    event_type: &'a mut String,
    years: &'a [i32],
    selected_year: Option<i32>,
    budget_ok: bool,
}

impl<'a> EventCriteriaPanel<'a> {
    pub fn new(
        event_type: &'a mut String,
        years: &'a [i32],
        selected_year: Option<i32>,
        budget_ok: bool,
    ) -> Self {
        Self {
            event_type,
            years,
            selected_year,
            budget_ok,
        }
    }
}

impl Panel for EventCriteriaPanel<'_> {
    type Event = EventsEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.events_heading);

        ui.label(colored_subsection_heading(UI_TEXT.event_type_label));
        ui.add(TextEdit::singleline(self.event_type).hint_text("CPI, FOMC, NFP"));

        ui.label(colored_subsection_heading(UI_TEXT.event_year_label));
        ComboBox::from_id_salt("event_year")
            .selected_text(
                self.selected_year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            )
            .show_ui(ui, |ui| {
                for &year in self.years {
                    if ui
                        .selectable_label(self.selected_year == Some(year), year.to_string())
                        .clicked()
                    {
                        events.push(EventsEvent::YearSelected(year));
                    }
                }
            });

        ui.add_space(5.0);
        let ready = self.budget_ok && !self.event_type.is_empty() && self.selected_year.is_some();
        if ui
            .add_enabled(ready, eframe::egui::Button::new(UI_TEXT.find_dates_button))
            .clicked()
        {
            events.push(EventsEvent::FindDates);
        }
        ui.add_space(10.0);
        events
    }
}

#[derive(Debug)]
pub enum EarningsEvent {
    BinSelected(Option<String>),
    FindDates,
}

pub struct EarningsCriteriaPanel {
    ticker: Option<String>,
    bin: Option<String>,
    budget_ok: bool,
}

impl EarningsCriteriaPanel {
    pub fn new(ticker: Option<String>, bin: Option<String>, budget_ok: bool) -> Self {
        Self {
            ticker,
            bin,
            budget_ok,
        }
    }
}

impl Panel for EarningsCriteriaPanel {
    type Event = EarningsEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        section_heading(ui, UI_TEXT.earnings_heading);

        ui.label(colored_subsection_heading(UI_TEXT.earnings_bin_label));
        ComboBox::from_id_salt("earnings_bin")
            .selected_text(self.bin.clone().unwrap_or_else(|| "All".to_string()))
            .show_ui(ui, |ui| {
                if ui.selectable_label(self.bin.is_none(), "All").clicked() {
                    events.push(EarningsEvent::BinSelected(None));
                }
                for bin in EARNINGS_BINS {
                    if ui
                        .selectable_label(self.bin.as_deref() == Some(*bin), *bin)
                        .clicked()
                    {
                        events.push(EarningsEvent::BinSelected(Some(bin.to_string())));
                    }
                }
            });

        ui.add_space(5.0);
        let ready = self.budget_ok && self.ticker.is_some();
        if ui
            .add_enabled(ready, eframe::egui::Button::new(UI_TEXT.find_dates_button))
            .clicked()
        {
            events.push(EarningsEvent::FindDates);
        }
        ui.add_space(10.0);
        events
    }
}
