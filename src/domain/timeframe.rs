use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// Chart timeframes the backend accepts, in minutes per candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Timeframe {
    M1,
    M2,
    M3,
    M5,
    M10,
    M15,
    M30,
    H1,
    H4,
}

impl Timeframe {
    pub fn minutes(self) -> usize {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M2 => 2,
            Timeframe::M3 => 3,
            Timeframe::M5 => 5,
            Timeframe::M10 => 10,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
            Timeframe::H4 => 240,
        }
    }
}

impl Default for Timeframe {
    fn default() -> Self {
        Timeframe::M5
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let minutes = self.minutes();
        if minutes % 60 == 0 {
            write!(f, "{}h", minutes / 60)
        } else {
            write!(f, "{}m", minutes)
        }
    }
}
