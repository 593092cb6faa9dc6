#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod config;
pub mod data;
pub mod domain;
pub mod replay;
pub mod session;
pub mod sim;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use data::{HttpGateway, MarketDataApi, OfflineGateway};
pub use domain::{AggregatedCandle, Candle, MinuteSeries, Timeframe};
pub use replay::{ReplayClock, ReplayState};
pub use session::{PanelKind, Workbench};
pub use sim::TradeDesk;
pub use ui::{ReplayDeskApp, SharedGateway};
pub use utils::app_time;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the market data backend
    #[arg(long, default_value_t = crate::config::API.base_url.to_string())]
    pub api_base: String,

    /// Serve deterministic synthetic data instead of calling the backend
    #[arg(long, default_value_t = false)]
    pub offline: bool,
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(cc: &eframe::CreationContext, gateway: SharedGateway) -> Box<dyn eframe::App> {
    let app = ui::ReplayDeskApp::new(cc, gateway);
    Box::new(app)
}
