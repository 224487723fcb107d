//! Per-symbol order book
//!
//! One readers-writer region guards both sides, so reads observe a
//! consistent book (no torn state between bids and asks). Reads may
//! run concurrently; mutations and matching runs are exclusive.

use parking_lot::{RwLock, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use types::currency::Symbol;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::Side;

use super::ladder::{AskLadder, BidLadder};
use super::price_level::BookEntry;

/// Both sides of the book; the unit the lock protects
#[derive(Debug, Default)]
pub(crate) struct Sides {
    pub(crate) bids: BidLadder,
    pub(crate) asks: AskLadder,
}

/// Thread-safe order book for one trading symbol
#[derive(Debug)]
pub struct OrderBook {
    symbol: Symbol,
    sides: RwLock<Sides>,
}

/// Read-only view of the full book, aggregated per price level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    pub symbol: Symbol,
    /// (price, aggregated quantity) best first (highest price)
    pub bids: Vec<(Price, Quantity)>,
    /// (price, aggregated quantity) best first (lowest price)
    pub asks: Vec<(Price, Quantity)>,
}

impl OrderBook {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            sides: RwLock::new(Sides::default()),
        }
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Insert a resting entry at the tail of its price level
    pub fn add(&self, side: Side, entry: BookEntry) {
        let mut sides = self.sides.write();
        match side {
            Side::BUY => sides.bids.insert(entry),
            Side::SELL => sides.asks.insert(entry),
        }
    }

    /// Remove a resting entry; drops its price level when emptied
    ///
    /// Returns false when no such entry rests at that price.
    pub fn remove(&self, side: Side, order_id: OrderId, price: Price) -> bool {
        let mut sides = self.sides.write();
        let removed = match side {
            Side::BUY => sides.bids.remove(order_id, price),
            Side::SELL => sides.asks.remove(order_id, price),
        };
        removed.is_some()
    }

    /// Best bid (highest price) with its level quantity
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.sides.read().bids.best()
    }

    /// Best ask (lowest price) with its level quantity
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.sides.read().asks.best()
    }

    /// Opposite-side entries an incoming order could fill against
    ///
    /// For a BUY, asks with price ≤ bound; for a SELL, bids with
    /// price ≥ bound. No bound means a market scan of the whole side.
    /// Entries come back in match priority order (best price first,
    /// FIFO within price), cloned out of the lock region.
    pub fn scan_matches(&self, taker_side: Side, price_bound: Option<Price>) -> Vec<BookEntry> {
        let sides = self.sides.read();
        match taker_side {
            Side::BUY => sides.asks.crossing_entries(price_bound),
            Side::SELL => sides.bids.crossing_entries(price_bound),
        }
    }

    /// Consistent full-book snapshot, aggregated per level
    pub fn snapshot(&self) -> BookSnapshot {
        let sides = self.sides.read();
        BookSnapshot {
            symbol: self.symbol,
            bids: sides.bids.aggregated(),
            asks: sides.asks.aggregated(),
        }
    }

    pub fn is_empty(&self) -> bool {
        let sides = self.sides.read();
        sides.bids.is_empty() && sides.asks.is_empty()
    }

    /// Exclusive access for a matching run; held for the duration of
    /// trade extraction
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Sides> {
        self.sides.write()
    }
}
