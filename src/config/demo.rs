//! Offline / demo configuration knobs.
//!
//! The offline gateway synthesizes deterministic minute data so the app can
//! run without a backend (and in the browser demo build without networking).

/// One synthetic instrument available in offline mode.
pub struct DemoInstrument {
    pub ticker: &'static str,
    /// Opening price the synthetic walk starts from.
    pub base_price: f64,
}

/// The Master Demo Configuration
pub struct DemoConfig {
    pub instruments: &'static [DemoInstrument],
    /// Trading dates offered by the offline gateway.
    pub dates: &'static [&'static str],
    /// Minutes per synthetic session (09:30 to 16:00).
    pub minutes_per_session: usize,
}

pub const DEMO: DemoConfig = DemoConfig {
    instruments: &[
        DemoInstrument { ticker: "AAPL", base_price: 182.50 },
        DemoInstrument { ticker: "MSFT", base_price: 404.25 },
        DemoInstrument { ticker: "NVDA", base_price: 785.00 },
        DemoInstrument { ticker: "SPY", base_price: 508.75 },
    ],

    dates: &["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01"],

    minutes_per_session: 390,
};
