//! Order book registry
//!
//! One order book per trading symbol, created on demand. Owned by the
//! composition root and shared by reference; there is no module-level
//! state.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;
use types::currency::Symbol;

use super::order_book::OrderBook;

/// Symbol → order book registry
#[derive(Debug, Default)]
pub struct OrderBookManager {
    books: DashMap<Symbol, Arc<OrderBook>>,
}

impl OrderBookManager {
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
        }
    }

    /// Get or create the order book for a symbol
    pub fn book(&self, symbol: Symbol) -> Arc<OrderBook> {
        self.books
            .entry(symbol)
            .or_insert_with(|| {
                info!(%symbol, "Created new order book");
                Arc::new(OrderBook::new(symbol))
            })
            .clone()
    }

    /// Symbols with an active book
    pub fn active_symbols(&self) -> Vec<Symbol> {
        self.books.iter().map(|e| *e.key()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::currency::Currency;

    #[test]
    fn test_book_created_on_demand() {
        let manager = OrderBookManager::new();
        let symbol = Symbol::new(Currency::BTC, Currency::USDT);

        let book1 = manager.book(symbol);
        let book2 = manager.book(symbol);

        // Same book instance for the same symbol
        assert!(Arc::ptr_eq(&book1, &book2));
        assert_eq!(manager.active_symbols(), vec![symbol]);
    }

    #[test]
    fn test_distinct_symbols_distinct_books() {
        let manager = OrderBookManager::new();
        let btc = manager.book(Symbol::new(Currency::BTC, Currency::USDT));
        let eth = manager.book(Symbol::new(Currency::ETH, Currency::USDT));

        assert!(!Arc::ptr_eq(&btc, &eth));
        assert_eq!(manager.active_symbols().len(), 2);
    }
}
