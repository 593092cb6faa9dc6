use eframe::egui;
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Corner, Legend, Plot};

use crate::domain::CandleType;
use crate::replay::RenderFrame;
use crate::ui::config::UI_CONFIG;

/// Candlestick rendering of a panel's replay frame.
///
/// Candles sit at integer x positions in window order; the in-progress candle
/// (if any) is always the last element and gets its own color so a partially
/// absorbed window is visually distinct from a closed one.
#[derive(Default)]
pub struct PlotView;

impl PlotView {
    pub fn show_frame(&mut self, ui: &mut egui::Ui, plot_id: &str, frame: &RenderFrame) {
        let boxes: Vec<BoxElem> = frame
            .candles
            .iter()
            .enumerate()
            .map(|(idx, visible)| {
                let candle = &visible.candle;
                let color = if visible.in_progress {
                    UI_CONFIG.colors.candle_in_progress
                } else {
                    match candle.get_type() {
                        CandleType::Bullish => UI_CONFIG.colors.candle_bull,
                        CandleType::Bearish => UI_CONFIG.colors.candle_bear,
                    }
                };
                let body_low = candle.open.min(candle.close);
                let body_high = candle.open.max(candle.close);
                BoxElem::new(
                    idx as f64,
                    BoxSpread::new(candle.low, body_low, candle.close, body_high, candle.high),
                )
                .whisker_width(0.0)
                .box_width(UI_CONFIG.candle_width_fraction)
                .fill(color)
                .stroke(egui::Stroke::new(1.0, color))
            })
            .collect();

        // Axis labels come from the candle start times, not the x position.
        let labels: Vec<String> = frame
            .candles
            .iter()
            .map(|visible| clock_label_ms(visible.start_timestamp_ms))
            .collect();

        Plot::new(plot_id.to_string())
            .legend(Legend::default().position(Corner::RightTop))
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if idx < 0.0 || (idx - mark.value).abs() > 1e-6 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .label_formatter(|_, _| String::new())
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                if !boxes.is_empty() {
                    plot_ui.box_plot(BoxPlot::new("candles", boxes));
                }
            });
    }
}

fn clock_label_ms(ts_ms: i64) -> String {
    use chrono::{DateTime, Timelike};
    match DateTime::from_timestamp_millis(ts_ms) {
        Some(dt) => format!("{:02}:{:02}", dt.hour(), dt.minute()),
        None => String::new(),
    }
}
