//! Frame layout: top tab bar, criteria side panel, chart central panel and a
//! status strip along the bottom.

use eframe::egui::{self, Color32, Context};
use strum::IntoEnumIterator;

use crate::session::PanelKind;
use crate::ui::app::ReplayDeskApp;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_panels::{
    ChartLoadPanel, EarningsCriteriaPanel, EventCriteriaPanel, GapCriteriaPanel, Panel,
    ReplayControlsPanel, TradeDeskPanel,
};
use crate::ui::utils::{section_heading, spaced_separator};

impl ReplayDeskApp {
    pub(super) fn render_top_bar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("panel_tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for kind in PanelKind::iter() {
                    let selected = self.active_panel == kind;
                    if ui.selectable_label(selected, kind.to_string()).clicked() {
                        self.active_panel = kind;
                    }
                }
            });
        });
    }

    pub(super) fn render_side_panel(&mut self, ctx: &Context) {
        let panel = self.active_panel;
        egui::SidePanel::left("criteria_panel")
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.render_criteria_section(ui, panel);
                    spaced_separator(ui);
                    self.render_chart_load_section(ui, panel);
                    if panel == PanelKind::Gaps {
                        spaced_separator(ui);
                        self.render_insights_section(ui);
                    }
                });
            });
    }

    fn render_criteria_section(&mut self, ui: &mut egui::Ui, panel: PanelKind) {
        let budget_ok = self.budget.remaining() > 0;
        match panel {
            PanelKind::Replay => {
                section_heading(ui, UI_TEXT.replay_heading);
                if self.workbench.session(panel).series().is_none() {
                    ui.label_subdued(UI_TEXT.no_chart_loaded);
                }
            }
            PanelKind::Gaps => {
                let criteria = self.panel_ui.entry(panel).or_default().gap_criteria.clone();
                let events = GapCriteriaPanel::new(criteria, budget_ok).render(ui);
                for event in events {
                    self.handle_gap_event(event);
                }
            }
            PanelKind::Events => {
                let years = std::mem::take(&mut self.years);
                let events = {
                    let state = self.panel_ui.entry(panel).or_default();
                    EventCriteriaPanel::new(
                        &mut state.event_type,
                        &years,
                        state.event_year,
                        budget_ok,
                    )
                    .render(ui)
                };
                self.years = years;
                for event in events {
                    self.handle_events_event(event);
                }
            }
            PanelKind::Earnings => {
                let state = self.panel_ui.entry(panel).or_default();
                let events =
                    EarningsCriteriaPanel::new(state.ticker.clone(), state.earnings_bin.clone(), budget_ok)
                        .render(ui);
                for event in events {
                    self.handle_earnings_event(event);
                }
            }
        }
    }

    fn render_chart_load_section(&mut self, ui: &mut egui::Ui, panel: PanelKind) {
        let loading = self
            .chart_promise
            .as_ref()
            .is_some_and(|(p, _)| *p == panel);
        let budget_remaining = self.budget.remaining();
        let events = {
            let state = self.panel_ui.entry(panel).or_default();
            if let Some(message) = &state.dates_message {
                ui.label_warning(message.clone());
            }
            ChartLoadPanel::new(
                &self.tickers,
                state.ticker.clone(),
                &state.available_dates,
                state.date.clone(),
                state.restrict_hours,
                budget_remaining,
                loading,
            )
            .render(ui)
        };
        for event in events {
            self.handle_chart_event(panel, event);
        }
    }

    fn render_insights_section(&mut self, ui: &mut egui::Ui) {
        let Some(insights) = &self.panel_ui.entry(PanelKind::Gaps).or_default().insights else {
            return;
        };
        section_heading(ui, UI_TEXT.insights_heading);
        if let Some(message) = &insights.message {
            ui.label_warning(message.clone());
        }
        for row in &insights.rows {
            ui.label_subheader(row.description.clone());
            ui.horizontal(|ui| {
                let median = row.median.as_deref().unwrap_or("-");
                let average = row.average.as_deref().unwrap_or("-");
                ui.metric("median", median, UI_CONFIG.colors.heading);
                ui.metric("avg", average, UI_CONFIG.colors.label);
            });
        }
    }

    pub(super) fn render_central_panel(&mut self, ctx: &Context) {
        let panel = self.active_panel;
        if let Some(notice) = self.workbench.session_mut(panel).take_notice() {
            self.panel_ui.entry(panel).or_default().notice = Some(notice);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let session = self.workbench.session(panel);
            let has_series = session.series().is_some();
            let frame = session.frame();
            let state = session.replay_state();
            let timeframe = session.timeframe();
            let speed = session.speed();
            let can_trade = self.can_trade(panel);

            if !has_series {
                ui.centered_and_justified(|ui| {
                    ui.label_subdued(if self.chart_promise.is_some() {
                        UI_TEXT.loading_chart
                    } else {
                        UI_TEXT.no_chart_loaded
                    });
                });
                return;
            }

            let replay_events = {
                let ui_state = self.panel_ui.entry(panel).or_default();
                ReplayControlsPanel::new(
                    state,
                    frame.controls,
                    timeframe,
                    speed,
                    &mut ui_state.start_time_text,
                )
                .render(ui)
            };

            if let Some(label) = &frame.clock_label {
                ui.metric("Session clock", label, UI_CONFIG.colors.heading);
            }
            if let Some(notice) = &self.panel_ui.entry(panel).or_default().notice {
                ui.label_warning(notice.clone());
            }

            let plot_height = ui.available_height()
                - if panel == PanelKind::Replay { 220.0 } else { 0.0 };
            ui.allocate_ui(
                egui::vec2(ui.available_width(), plot_height.max(120.0)),
                |ui| {
                    self.plot_view.show_frame(ui, "session_chart", &frame);
                },
            );

            let trade_events = if panel == PanelKind::Replay {
                self.render_trade_desk(ui, panel, can_trade)
            } else {
                Vec::new()
            };

            for event in replay_events {
                self.handle_replay_event(panel, event);
            }
            for event in trade_events {
                self.handle_trade_event(panel, event);
            }
        });
    }

    fn render_trade_desk(
        &mut self,
        ui: &mut egui::Ui,
        panel: PanelKind,
        can_trade: bool,
    ) -> Vec<crate::ui::ui_panels::TradeEvent> {
        let session = self.workbench.session(panel);
        let (Some(desk), Some(summary)) = (session.desk(), session.desk_summary()) else {
            return Vec::new();
        };
        spaced_separator(ui);
        TradeDeskPanel::new(desk, summary, can_trade).render(ui)
    }

    pub(super) fn render_status_panel(&mut self, ctx: &Context) {
        egui::TopBottomPanel::bottom("status_strip").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.metric(
                    UI_TEXT.budget_label,
                    &self.budget.remaining().to_string(),
                    Color32::LIGHT_GRAY,
                );
                if let Some(error) = &self.last_error {
                    ui.label_error(error.clone());
                }
            });
        });
    }
}
