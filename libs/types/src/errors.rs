//! Error taxonomy
//!
//! Every fallible operation in the core returns one of these variants.
//! Validation and business errors propagate to the caller untouched;
//! storage retries are hidden below ConcurrencyConflict.

use crate::currency::Currency;
use crate::order::OrderStatus;
use rust_decimal::Decimal;
use thiserror::Error;

/// Exchange-wide error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    /// Malformed request (missing price on LIMIT, unsupported symbol, ...)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Idempotency key collision
    #[error("Duplicate idempotency key: {key}")]
    Duplicate { key: String },

    /// Order, wallet, or user absent
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Required balance below the needed amount
    #[error("Insufficient balance. Required: {required} {currency}, Available: {available} {currency}")]
    InsufficientBalance {
        currency: Currency,
        required: Decimal,
        available: Decimal,
    },

    /// Quote-valued exposure above the configured cap
    #[error("Exposure limit exceeded. Current: {current} USDT, Limit: {limit} USDT")]
    ExposureExceeded { current: Decimal, limit: Decimal },

    /// Required reference price missing from the feed
    #[error("Cannot determine price for symbol: {symbol}")]
    PriceUnavailable { symbol: String },

    /// Order not in a cancellable state
    #[error("Order cannot be cancelled in status: {status:?}")]
    Uncancellable { status: OrderStatus },

    /// Optimistic-concurrency retry budget exhausted
    #[error("Concurrent update conflict after {attempts} attempts")]
    ConcurrencyConflict { attempts: u32 },

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}
