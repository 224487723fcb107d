//! Append-only trade log
//!
//! Trades are immutable once written. Reads serve the recent-trade
//! history surface (newest first) and fill reconciliation.

use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use types::currency::Symbol;
use types::ids::{OrderId, TradeId};
use types::numeric::{Price, Quantity};
use types::trade::Trade;

/// Append-only execution log
#[derive(Debug)]
pub struct TradeStore {
    trades: RwLock<Vec<Trade>>,
    next_id: AtomicU64,
}

impl TradeStore {
    pub fn new() -> Self {
        Self {
            trades: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Append an execution, assigning its id
    pub fn insert(
        &self,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        symbol: Symbol,
        price: Price,
        quantity: Quantity,
        executed_at: i64,
    ) -> Trade {
        let trade = Trade {
            id: TradeId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            buy_order_id,
            sell_order_id,
            symbol,
            price,
            quantity,
            executed_at,
        };
        self.trades.write().push(trade.clone());
        trade
    }

    /// Load by id
    pub fn get(&self, id: TradeId) -> Option<Trade> {
        self.trades.read().iter().find(|t| t.id == id).cloned()
    }

    /// Most recent trades for a symbol, newest first
    pub fn recent(&self, symbol: Symbol, limit: usize) -> Vec<Trade> {
        self.trades
            .read()
            .iter()
            .rev()
            .filter(|t| t.symbol == symbol)
            .take(limit)
            .cloned()
            .collect()
    }

    /// All trades mentioning the given order, oldest first
    pub fn by_order(&self, order_id: OrderId) -> Vec<Trade> {
        self.trades
            .read()
            .iter()
            .filter(|t| t.involves(order_id))
            .cloned()
            .collect()
    }

    /// Sum of traded quantity over all trades mentioning the order
    pub fn total_quantity_for(&self, order_id: OrderId) -> Decimal {
        self.trades
            .read()
            .iter()
            .filter(|t| t.involves(order_id))
            .map(|t| t.quantity.as_decimal())
            .sum()
    }
}
