//! Bid and ask ladders
//!
//! Each side of the book is a BTreeMap from price to FIFO level. Bids
//! iterate descending (best bid = highest price), asks ascending (best
//! ask = lowest price). BTreeMap keeps iteration deterministic.

use std::collections::BTreeMap;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};

use super::price_level::{BookEntry, PriceLevel};

/// Buy-side ladder, best price = highest
#[derive(Debug, Clone, Default)]
pub struct BidLadder {
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidLadder {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Insert an entry at the tail of its price level
    pub fn insert(&mut self, entry: BookEntry) {
        self.levels
            .entry(entry.price)
            .or_insert_with(PriceLevel::new)
            .push_back(entry);
    }

    /// Remove an entry; drops the price level when it empties
    pub fn remove(&mut self, order_id: OrderId, price: Price) -> Option<BookEntry> {
        let level = self.levels.get_mut(&price)?;
        let entry = level.remove(order_id)?;
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Some(entry)
    }

    /// Best bid price (highest)
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    /// Best bid price with the level's aggregate quantity
    pub fn best(&self) -> Option<(Price, Quantity)> {
        self.levels
            .iter()
            .next_back()
            .map(|(price, level)| (*price, level.total_quantity()))
    }

    /// Mutable access to the best level, for matching
    pub(crate) fn best_level_mut(&mut self) -> Option<(Price, &mut PriceLevel)> {
        self.levels
            .iter_mut()
            .next_back()
            .map(|(price, level)| (*price, level))
    }

    /// Drop the level at the given price if it is empty
    pub(crate) fn prune_empty(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(|l| l.is_empty()) {
            self.levels.remove(&price);
        }
    }

    /// All bids with price ≥ bound, best first, FIFO within price
    ///
    /// A bound of None scans the whole side (market sell).
    pub fn crossing_entries(&self, bound: Option<Price>) -> Vec<BookEntry> {
        self.levels
            .iter()
            .rev()
            .take_while(|(price, _)| bound.map_or(true, |b| **price >= b))
            .flat_map(|(_, level)| level.iter().cloned())
            .collect()
    }

    /// Per-level (price, aggregated quantity), best first
    pub fn aggregated(&self) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .rev()
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}

/// Sell-side ladder, best price = lowest
#[derive(Debug, Clone, Default)]
pub struct AskLadder {
    levels: BTreeMap<Price, PriceLevel>,
}

impl AskLadder {
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Insert an entry at the tail of its price level
    pub fn insert(&mut self, entry: BookEntry) {
        self.levels
            .entry(entry.price)
            .or_insert_with(PriceLevel::new)
            .push_back(entry);
    }

    /// Remove an entry; drops the price level when it empties
    pub fn remove(&mut self, order_id: OrderId, price: Price) -> Option<BookEntry> {
        let level = self.levels.get_mut(&price)?;
        let entry = level.remove(order_id)?;
        if level.is_empty() {
            self.levels.remove(&price);
        }
        Some(entry)
    }

    /// Best ask price (lowest)
    pub fn best_price(&self) -> Option<Price> {
        self.levels.keys().next().copied()
    }

    /// Best ask price with the level's aggregate quantity
    pub fn best(&self) -> Option<(Price, Quantity)> {
        self.levels
            .iter()
            .next()
            .map(|(price, level)| (*price, level.total_quantity()))
    }

    /// Mutable access to the best level, for matching
    pub(crate) fn best_level_mut(&mut self) -> Option<(Price, &mut PriceLevel)> {
        self.levels
            .iter_mut()
            .next()
            .map(|(price, level)| (*price, level))
    }

    /// Drop the level at the given price if it is empty
    pub(crate) fn prune_empty(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(|l| l.is_empty()) {
            self.levels.remove(&price);
        }
    }

    /// All asks with price ≤ bound, best first, FIFO within price
    ///
    /// A bound of None scans the whole side (market buy).
    pub fn crossing_entries(&self, bound: Option<Price>) -> Vec<BookEntry> {
        self.levels
            .iter()
            .take_while(|(price, _)| bound.map_or(true, |b| **price <= b))
            .flat_map(|(_, level)| level.iter().cloned())
            .collect()
    }

    /// Per-level (price, aggregated quantity), best first
    pub fn aggregated(&self) -> Vec<(Price, Quantity)> {
        self.levels
            .iter()
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }
}
