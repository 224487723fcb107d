//! Order lifecycle types

use crate::currency::Symbol;
use crate::errors::ExchangeError;
use crate::ids::{OrderId, UserId};
use crate::numeric::{Price, Quantity};
use serde::{Deserialize, Serialize};

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

/// Order kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderKind {
    /// Rests at its limit price when not immediately matched
    LIMIT,
    /// Matches at best available prices, never rests
    MARKET,
}

/// Order status
///
/// FILLED and CANCELLED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    /// Accepted, no fills yet
    OPEN,
    /// Some quantity filled, some remaining
    PARTIAL,
    /// Completely filled (terminal)
    FILLED,
    /// Cancelled by the user or by market-residual cleanup (terminal)
    CANCELLED,
}

impl OrderStatus {
    /// Check if status is terminal (no further transitions possible)
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::FILLED | OrderStatus::CANCELLED)
    }
}

/// A trading order, the canonical persistent record
///
/// Invariants:
/// - kind = LIMIT ⇔ price is present
/// - 0 ≤ filled_quantity ≤ quantity
/// - status = FILLED ⇔ filled_quantity = quantity
/// - status = PARTIAL ⇔ 0 < filled_quantity < quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub kind: OrderKind,
    pub side: Side,
    pub symbol: Symbol,
    /// Limit price; None for MARKET orders
    pub price: Option<Price>,
    /// Original order quantity
    pub quantity: Quantity,
    /// Quantity filled so far
    pub filled_quantity: Quantity,
    pub status: OrderStatus,
    /// Caller-supplied key for at-most-once acceptance
    pub idempotency_key: Option<String>,
    pub created_at: i64, // Unix nanos
    pub updated_at: i64, // Unix nanos
}

impl Order {
    /// Quantity still to be filled
    pub fn remaining_quantity(&self) -> Quantity {
        self.quantity - self.filled_quantity
    }

    /// Check if the order is completely filled
    pub fn is_filled(&self) -> bool {
        self.filled_quantity == self.quantity
    }

    /// Check if the order can still be cancelled
    pub fn can_cancel(&self) -> bool {
        matches!(self.status, OrderStatus::OPEN | OrderStatus::PARTIAL)
    }

    /// Record a fill and recompute status
    ///
    /// # Panics
    /// Panics if the fill would exceed the order quantity; fills come
    /// from the matching engine, which never overfills.
    pub fn fill(&mut self, fill_quantity: Quantity, timestamp: i64) {
        let new_filled = self.filled_quantity + fill_quantity;
        assert!(
            new_filled <= self.quantity,
            "Fill would exceed order quantity"
        );

        self.filled_quantity = new_filled;
        self.status = if self.is_filled() {
            OrderStatus::FILLED
        } else {
            OrderStatus::PARTIAL
        };
        self.updated_at = timestamp;
    }

    /// Transition to CANCELLED
    ///
    /// Fails with UNCANCELLABLE unless the order is OPEN or PARTIAL.
    pub fn cancel(&mut self, timestamp: i64) -> Result<(), ExchangeError> {
        if !self.can_cancel() {
            return Err(ExchangeError::Uncancellable {
                status: self.status,
            });
        }
        self.status = OrderStatus::CANCELLED;
        self.updated_at = timestamp;
        Ok(())
    }
}
