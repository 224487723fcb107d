//! Quote-valued exposure
//!
//! Exposure is the sum of a user's non-quote balances valued in the
//! quote unit of account, plus the pending demand of a BUY order.
//! Symbols the feed cannot price contribute zero, a documented
//! limitation rather than an error.

use rust_decimal::Decimal;
use types::currency::{Symbol, QUOTE_UNIT};
use types::order::{Order, Side};
use types::wallet::Wallet;

use crate::feed::PriceFeed;

/// Value of all non-quote wallet balances in the quote unit
pub fn wallet_exposure(wallets: &[Wallet], feed: &dyn PriceFeed) -> Decimal {
    wallets
        .iter()
        .filter(|w| w.currency != QUOTE_UNIT && w.balance > Decimal::ZERO)
        .map(|w| {
            let price = Symbol::try_new(w.currency, QUOTE_UNIT)
                .and_then(|symbol| feed.get_price(&symbol))
                .map(|p| p.as_decimal())
                .unwrap_or(Decimal::ZERO);
            w.balance * price
        })
        .sum()
}

/// Additional exposure the order itself would add
///
/// A BUY acquires base currency and adds quantity × price(symbol);
/// a SELL reduces exposure and adds nothing.
pub fn order_exposure(order: &Order, feed: &dyn PriceFeed) -> Decimal {
    match order.side {
        Side::BUY => {
            let price = feed
                .get_price(&order.symbol)
                .map(|p| p.as_decimal())
                .unwrap_or(Decimal::ZERO);
            order.quantity.as_decimal() * price
        }
        Side::SELL => Decimal::ZERO,
    }
}
