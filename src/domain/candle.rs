// Define the CandleType enum
#[derive(Debug, PartialEq)]
pub enum CandleType {
    Bullish,
    Bearish,
}

// A plain OHLCV bar as handed to the chart layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    // A constructor for convenience
    pub fn new(open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Candle {
            open,
            high,
            low,
            close,
            volume,
        }
    }

    // A method to determine the type of candle
    pub fn get_type(&self) -> CandleType {
        if self.close >= self.open {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }

    // Returns the low and high of the candle body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.get_type() {
            CandleType::Bullish => (self.open, self.close),
            CandleType::Bearish => (self.close, self.open),
        }
    }
}

/// Running high/low/close/volume of an aggregation window as of one absorbed
/// minute. The open never changes within a window so it is not repeated here.
#[derive(Debug, Clone, PartialEq)]
pub struct MinuteSnapshot {
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// A timeframe candle annotated with its minute-by-minute build-up.
///
/// `minute_updates[i]` holds the running state after absorbing window minute
/// `i + 1` (the first minute has no entry; its own values live in
/// `first_minute` so a partially played window can be rendered without ever
/// showing the final close early). Built once per (timeframe, series) pair and
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedCandle {
    pub start_timestamp_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub first_minute: MinuteSnapshot,
    pub minute_updates: Vec<MinuteSnapshot>,
}

impl AggregatedCandle {
    /// Number of minutes this window absorbed (short for a trailing window).
    pub fn window_len(&self) -> usize {
        self.minute_updates.len() + 1
    }

    /// The fully closed candle.
    pub fn as_candle(&self) -> Candle {
        Candle::new(self.open, self.high, self.low, self.close, self.volume)
    }

    /// The candle as it looked after `minutes_played` minutes of this window
    /// had been absorbed (1 ..= window_len).
    pub fn snapshot_after(&self, minutes_played: usize) -> Candle {
        debug_assert!(
            minutes_played >= 1 && minutes_played <= self.window_len(),
            "snapshot_after({minutes_played}) outside window of {} minutes",
            self.window_len()
        );
        let snap = if minutes_played <= 1 {
            &self.first_minute
        } else {
            &self.minute_updates[minutes_played - 2]
        };
        Candle::new(self.open, snap.high, snap.low, snap.close, snap.volume)
    }
}
