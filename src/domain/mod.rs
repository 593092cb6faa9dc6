// Core domain types shared by the replay engine, simulator, and UI
pub mod candle;
pub mod minute_series;
pub mod timeframe;

pub use candle::{AggregatedCandle, Candle, CandleType, MinuteSnapshot};
pub use minute_series::MinuteSeries;
pub use timeframe::Timeframe;
