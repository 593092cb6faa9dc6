//! Replay engine and paper-trading configuration.

use std::time::Duration;

/// Named playback speeds for the replay control strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedPreset {
    Slow,
    Normal,
    Fast,
    Turbo,
}

impl SpeedPreset {
    pub const ALL: [SpeedPreset; 4] = [
        SpeedPreset::Slow,
        SpeedPreset::Normal,
        SpeedPreset::Fast,
        SpeedPreset::Turbo,
    ];

    /// Wall-clock time one replayed minute takes at this speed.
    pub fn interval(&self) -> Duration {
        match self {
            SpeedPreset::Slow => Duration::from_millis(2000),
            SpeedPreset::Normal => Duration::from_millis(1000),
            SpeedPreset::Fast => Duration::from_millis(250),
            SpeedPreset::Turbo => Duration::from_millis(50),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SpeedPreset::Slow => "0.5x",
            SpeedPreset::Normal => "1x",
            SpeedPreset::Fast => "4x",
            SpeedPreset::Turbo => "20x",
        }
    }
}

/// Simulator settings for the replay panel's trade desk.
pub struct SimSettings {
    /// Shares per simulated position. Fixed; there is no sizing UI.
    pub trade_size: f64,
}

/// The Master Replay Configuration
pub struct ReplayConfig {
    pub default_speed: SpeedPreset,
    pub sim: SimSettings,
}

pub const REPLAY: ReplayConfig = ReplayConfig {
    default_speed: SpeedPreset::Normal,

    sim: SimSettings { trade_size: 100.0 },
};
