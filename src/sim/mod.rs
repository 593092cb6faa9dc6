use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of a simulated position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "Long"),
            Side::Sell => write!(f, "Short"),
        }
    }
}

/// The single open position slot. At most one exists at a time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub side: Side,
    pub entry_price: f64,
    pub size: f64,
    pub entry_timestamp_ms: i64,
}

impl Position {
    /// Mark-to-market P/L against `price`, rounded to cents.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        round_cents(signed_pnl(self.side, self.entry_price, price, self.size))
    }
}

/// One settled trade. History entries are never edited after creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosedTrade {
    pub side: Side,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: f64,
    pub exit_timestamp_ms: i64,
    pub pnl: f64,
}

/// Result of a buy/sell action, for the UI notice line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TradeOutcome {
    Opened(Side),
    Closed { pnl: f64 },
    AlreadyOpen,
}

/// Paper-trading ledger for the one panel that carries the capability.
///
/// The desk knows nothing about replay state; callers gate actions on the
/// clock and hand in the settled price for the minute just played.
pub struct TradeDesk {
    position: Option<Position>,
    history: Vec<ClosedTrade>,
    size: f64,
}

impl TradeDesk {
    pub fn new(size: f64) -> Self {
        Self {
            position: None,
            history: Vec::new(),
            size,
        }
    }

    pub fn position(&self) -> Option<&Position> {
        self.position.as_ref()
    }

    pub fn history(&self) -> &[ClosedTrade] {
        &self.history
    }

    /// Opens a long. Refused while any position is open.
    pub fn buy(&mut self, price: f64, timestamp_ms: i64) -> TradeOutcome {
        if self.position.is_some() {
            return TradeOutcome::AlreadyOpen;
        }
        self.position = Some(Position {
            side: Side::Buy,
            entry_price: price,
            size: self.size,
            entry_timestamp_ms: timestamp_ms,
        });
        TradeOutcome::Opened(Side::Buy)
    }

    /// Close-or-short: settles any open position at `price`, otherwise opens
    /// a new short.
    pub fn sell(&mut self, price: f64, timestamp_ms: i64) -> TradeOutcome {
        if self.position.is_some() {
            let pnl = self.settle(price, timestamp_ms);
            return TradeOutcome::Closed { pnl };
        }
        self.position = Some(Position {
            side: Side::Sell,
            entry_price: price,
            size: self.size,
            entry_timestamp_ms: timestamp_ms,
        });
        TradeOutcome::Opened(Side::Sell)
    }

    /// Settles a leftover position when playback stops. Returns the trade's
    /// pnl, or None when already flat.
    pub fn force_close(&mut self, price: f64, timestamp_ms: i64) -> Option<f64> {
        self.position.is_some().then(|| self.settle(price, timestamp_ms))
    }

    /// Unrealized P/L of an open position against `price`, or the cumulative
    /// realized total when flat.
    pub fn summary(&self, price: f64) -> DeskSummary {
        match &self.position {
            Some(position) => DeskSummary::Open {
                side: position.side,
                entry_price: position.entry_price,
                unrealized_pnl: position.unrealized_pnl(price),
            },
            None => DeskSummary::Flat {
                realized_pnl: self.realized_pnl(),
            },
        }
    }

    pub fn realized_pnl(&self) -> f64 {
        round_cents(self.history.iter().map(|trade| trade.pnl).sum())
    }

    fn settle(&mut self, price: f64, timestamp_ms: i64) -> f64 {
        debug_assert!(self.position.is_some(), "settle requires an open position");
        let Some(position) = self.position.take() else {
            return 0.0;
        };
        let pnl = round_cents(signed_pnl(position.side, position.entry_price, price, position.size));
        self.history.push(ClosedTrade {
            side: position.side,
            entry_price: position.entry_price,
            exit_price: price,
            size: position.size,
            exit_timestamp_ms: timestamp_ms,
            pnl,
        });
        pnl
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeskSummary {
    Open {
        side: Side,
        entry_price: f64,
        unrealized_pnl: f64,
    },
    Flat {
        realized_pnl: f64,
    },
}

fn signed_pnl(side: Side, entry: f64, exit: f64, size: f64) -> f64 {
    match side {
        Side::Buy => (exit - entry) * size,
        Side::Sell => (entry - exit) * size,
    }
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buy_then_sell_settles_at_close_price() {
        let mut desk = TradeDesk::new(100.0);
        assert_eq!(desk.buy(101.25, 1_000), TradeOutcome::Opened(Side::Buy));
        assert_eq!(desk.buy(102.00, 2_000), TradeOutcome::AlreadyOpen);

        let outcome = desk.sell(101.333, 3_000);
        assert_eq!(outcome, TradeOutcome::Closed { pnl: 8.3 });
        assert!(desk.position().is_none());

        let trade = &desk.history()[0];
        assert_eq!(trade.side, Side::Buy);
        assert_eq!(trade.exit_price, 101.333);
        assert_eq!(trade.exit_timestamp_ms, 3_000);
        assert_eq!(trade.pnl, 8.3);
    }

    #[test]
    fn test_sell_when_flat_opens_a_short() {
        let mut desk = TradeDesk::new(100.0);
        assert_eq!(desk.sell(50.0, 1_000), TradeOutcome::Opened(Side::Sell));

        let outcome = desk.sell(48.5, 2_000);
        assert_eq!(outcome, TradeOutcome::Closed { pnl: 150.0 });
        assert_eq!(desk.history().len(), 1);
    }

    #[test]
    fn test_force_close_settles_exactly_once() {
        let mut desk = TradeDesk::new(100.0);
        desk.buy(10.0, 1_000);

        assert_eq!(desk.force_close(11.0, 2_000), Some(100.0));
        assert_eq!(desk.history().len(), 1);
        assert!(desk.position().is_none());

        assert_eq!(desk.force_close(12.0, 3_000), None);
        assert_eq!(desk.history().len(), 1);
    }

    #[test]
    fn test_summary_tracks_open_then_realized() {
        let mut desk = TradeDesk::new(10.0);
        desk.sell(200.0, 1_000);
        assert_eq!(
            desk.summary(195.0),
            DeskSummary::Open {
                side: Side::Sell,
                entry_price: 200.0,
                unrealized_pnl: 50.0
            }
        );

        desk.sell(195.0, 2_000);
        desk.buy(195.0, 3_000);
        desk.sell(196.5, 4_000);
        assert_eq!(desk.summary(0.0), DeskSummary::Flat { realized_pnl: 65.0 });
    }
}
