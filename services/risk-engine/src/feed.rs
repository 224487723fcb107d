//! Price feed interface
//!
//! Quotes a point-in-time mid-price for a symbol in its quote
//! currency. No staleness contract; a missing price is a normal
//! outcome callers must handle.

use dashmap::DashMap;
use types::currency::{Currency, Symbol};
use types::numeric::Price;

/// Source of reference prices for risk calculations
pub trait PriceFeed: Send + Sync {
    /// Current price for a symbol, if known
    fn get_price(&self, symbol: &Symbol) -> Option<Price>;
}

/// Fixed-price feed
///
/// Seeded with default simulation prices; prices can be updated at
/// runtime. A real deployment would plug a market-data source into
/// the trait instead.
#[derive(Debug)]
pub struct FixedPriceFeed {
    prices: DashMap<Symbol, Price>,
}

impl FixedPriceFeed {
    /// Feed with the default simulation prices
    /// (BTC/USDT = 50000, ETH/USDT = 3000)
    pub fn new() -> Self {
        let prices = DashMap::new();
        prices.insert(
            Symbol::new(Currency::BTC, Currency::USDT),
            Price::from_u64(50_000),
        );
        prices.insert(
            Symbol::new(Currency::ETH, Currency::USDT),
            Price::from_u64(3_000),
        );
        Self { prices }
    }

    /// Empty feed (every lookup misses)
    pub fn empty() -> Self {
        Self {
            prices: DashMap::new(),
        }
    }

    /// Set or replace the price for a symbol
    pub fn update_price(&self, symbol: Symbol, price: Price) {
        self.prices.insert(symbol, price);
    }

    /// Symbols the feed currently quotes
    pub fn available_symbols(&self) -> Vec<Symbol> {
        self.prices.iter().map(|e| *e.key()).collect()
    }
}

impl Default for FixedPriceFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceFeed for FixedPriceFeed {
    fn get_price(&self, symbol: &Symbol) -> Option<Price> {
        self.prices.get(symbol).map(|p| *p)
    }
}
