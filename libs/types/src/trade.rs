//! Trade execution records

use crate::currency::Symbol;
use crate::ids::{OrderId, TradeId};
use crate::numeric::{Price, Quantity};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An execution between a buy and a sell order
///
/// Immutable once written to the trade store. Base and quote
/// currencies derive from the symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub symbol: Symbol,
    /// Execution price (the resting order's price)
    pub price: Price,
    pub quantity: Quantity,
    pub executed_at: i64, // Unix nanos
}

impl Trade {
    /// Quote value of the trade (price × quantity)
    pub fn quote_value(&self) -> Decimal {
        self.quantity.value_at(self.price)
    }

    /// Check whether the trade involves the given order
    pub fn involves(&self, order_id: OrderId) -> bool {
        self.buy_order_id == order_id || self.sell_order_id == order_id
    }
}
