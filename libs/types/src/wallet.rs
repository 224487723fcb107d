//! Per-currency balance records
//!
//! A wallet is the (user, currency) balance row. The version field is
//! the optimistic concurrency token: the wallet store bumps it on every
//! persisted mutation and rejects stale writers.

use crate::currency::Currency;
use crate::errors::ExchangeError;
use crate::ids::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Balance record for one (user, currency) pair
///
/// Invariants:
/// - balance ≥ 0 at all times
/// - at most one wallet per (user, currency)
/// - version strictly increases on every persisted mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: UserId,
    pub currency: Currency,
    pub balance: Decimal,
    /// Optimistic concurrency token, owned by the wallet store
    pub version: u64,
    pub created_at: i64, // Unix nanos
    pub updated_at: i64, // Unix nanos
}

impl Wallet {
    /// Create an empty wallet (lazy creation on first credit)
    pub fn empty(user_id: UserId, currency: Currency, timestamp: i64) -> Self {
        Self {
            user_id,
            currency,
            balance: Decimal::ZERO,
            version: 0,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Add to the balance
    ///
    /// Fails with VALIDATION when the amount is not strictly positive.
    pub fn credit(&mut self, amount: Decimal) -> Result<(), ExchangeError> {
        if amount <= Decimal::ZERO {
            return Err(ExchangeError::Validation(
                "Credit amount must be positive".to_string(),
            ));
        }
        self.balance += amount;
        Ok(())
    }

    /// Subtract from the balance
    ///
    /// Fails with VALIDATION when the amount is not strictly positive,
    /// or INSUFFICIENT_BALANCE when the balance would go negative.
    pub fn debit(&mut self, amount: Decimal) -> Result<(), ExchangeError> {
        if amount <= Decimal::ZERO {
            return Err(ExchangeError::Validation(
                "Debit amount must be positive".to_string(),
            ));
        }
        if self.balance < amount {
            return Err(ExchangeError::InsufficientBalance {
                currency: self.currency,
                required: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }
}
