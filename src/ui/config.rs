use eframe::egui::Color32;

pub use crate::ui::ui_text::{UI_TEXT, UiText};

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub subsection_heading: Color32,
    pub central_panel: Color32,
    pub side_panel: Color32,
    pub candle_bull: Color32,
    pub candle_bear: Color32,
    pub candle_in_progress: Color32,
    pub pnl_positive: Color32,
    pub pnl_negative: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Default, Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    pub candle_width_fraction: f64,
    pub max_visible_trades: usize,
}

/// Global UI configuration instance
pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::GRAY,    // This sets every label globally to this color
        heading: Color32::GOLD,  // Sets every heading
        subsection_heading: Color32::ORANGE, // Sets every subsection heading
        central_panel: Color32::from_rgb(18, 20, 26),
        side_panel: Color32::from_rgb(25, 25, 25),
        candle_bull: Color32::from_rgb(60, 190, 120),
        candle_bear: Color32::from_rgb(220, 80, 80),
        candle_in_progress: Color32::from_rgb(120, 170, 255),
        pnl_positive: Color32::from_rgb(130, 200, 140),
        pnl_negative: Color32::from_rgb(255, 100, 100),
    },
    // Fraction of the candle slot the body occupies, the rest is gap
    candle_width_fraction: 0.7,
    max_visible_trades: 20,
};
