//! Domain events
//!
//! Everything that happens in the core is announced as one of four
//! event variants, wrapped in an envelope carrying a unique event id
//! and a monotonic timestamp. The sink dispatches on the tag.

use crate::currency::{Currency, Symbol};
use crate::ids::{EventId, OrderId, TradeId, UserId};
use crate::numeric::{Price, Quantity};
use crate::order::{OrderKind, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why a balance moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalanceChangeReason {
    Deposit,
    Withdraw,
    /// Funds pre-debited at order entry, held against the open order
    Reservation,
    /// Reservation returned on cancel or market-residual cleanup
    Release,
    /// Trade applied to a counterparty's ledger
    Settlement,
}

/// Domain event variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ExchangeEvent {
    OrderPlaced {
        order_id: OrderId,
        user_id: UserId,
        symbol: Symbol,
        kind: OrderKind,
        side: Side,
        price: Option<Price>,
        quantity: Quantity,
    },
    OrderMatched {
        order_id: OrderId,
        matched_quantity: Quantity,
        matched_price: Price,
        fully_filled: bool,
    },
    TradeExecuted {
        trade_id: TradeId,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        symbol: Symbol,
        price: Price,
        quantity: Quantity,
    },
    BalanceUpdated {
        user_id: UserId,
        currency: Currency,
        new_balance: Decimal,
        /// Positive for credits, negative for debits
        delta: Decimal,
        reason: BalanceChangeReason,
    },
}

impl ExchangeEvent {
    /// Sink topic this event belongs to
    pub fn topic(&self) -> &'static str {
        match self {
            ExchangeEvent::OrderPlaced { .. } => topics::ORDER_PLACED,
            ExchangeEvent::OrderMatched { .. } => topics::ORDER_MATCHED,
            ExchangeEvent::TradeExecuted { .. } => topics::TRADE_EXECUTED,
            ExchangeEvent::BalanceUpdated { .. } => topics::BALANCE_UPDATED,
        }
    }

    /// Partition key: order id, trade id, or "{user}:{currency}"
    pub fn key(&self) -> String {
        match self {
            ExchangeEvent::OrderPlaced { order_id, .. } => order_id.to_string(),
            ExchangeEvent::OrderMatched { order_id, .. } => order_id.to_string(),
            ExchangeEvent::TradeExecuted { trade_id, .. } => trade_id.to_string(),
            ExchangeEvent::BalanceUpdated {
                user_id, currency, ..
            } => format!("{}:{}", user_id, currency),
        }
    }
}

/// Event sink topics
pub mod topics {
    pub const ORDER_PLACED: &str = "order-placed";
    pub const ORDER_MATCHED: &str = "order-matched";
    pub const TRADE_EXECUTED: &str = "trade-executed";
    pub const BALANCE_UPDATED: &str = "balance-updated";
}

/// An event plus its identity and emission timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event_id: EventId,
    pub timestamp: i64, // Unix nanos
    #[serde(flatten)]
    pub event: ExchangeEvent,
}

impl EventEnvelope {
    /// Wrap an event with a fresh id at the given timestamp
    pub fn new(event: ExchangeEvent, timestamp: i64) -> Self {
        Self {
            event_id: EventId::new(),
            timestamp,
            event,
        }
    }
}
