//! Required-funds computation and balance sufficiency

use rust_decimal::Decimal;
use types::currency::Currency;
use types::errors::ExchangeError;
use types::order::{Order, OrderKind, Side};
use types::wallet::Wallet;

use crate::feed::PriceFeed;

/// Currency and amount an order must have available before entry
///
/// - BUY LIMIT: quote currency, limit_price × quantity
/// - BUY MARKET: quote currency, reference_price × quantity × buffer
///   (worst-case cost estimate; PRICE_UNAVAILABLE when the feed has
///   no reference price)
/// - SELL: base currency, quantity
pub fn required_funds(
    order: &Order,
    feed: &dyn PriceFeed,
    slippage_buffer: Decimal,
) -> Result<(Currency, Decimal), ExchangeError> {
    match order.side {
        Side::BUY => {
            let amount = match (order.kind, order.price) {
                (OrderKind::LIMIT, Some(limit)) => order.quantity.value_at(limit),
                (OrderKind::MARKET, _) => {
                    let reference =
                        feed.get_price(&order.symbol)
                            .ok_or(ExchangeError::PriceUnavailable {
                                symbol: order.symbol.to_string(),
                            })?;
                    order.quantity.value_at(reference) * slippage_buffer
                }
                (OrderKind::LIMIT, None) => {
                    return Err(ExchangeError::Validation(
                        "LIMIT order without a price".to_string(),
                    ))
                }
            };
            Ok((order.symbol.quote(), amount))
        }
        Side::SELL => Ok((order.symbol.base(), order.quantity.as_decimal())),
    }
}

/// Fail with INSUFFICIENT_BALANCE unless the wallet covers the amount
///
/// A missing wallet counts as zero available.
pub fn check_balance(
    wallet: Option<&Wallet>,
    currency: Currency,
    required: Decimal,
) -> Result<(), ExchangeError> {
    let available = wallet.map(|w| w.balance).unwrap_or(Decimal::ZERO);
    if available < required {
        return Err(ExchangeError::InsufficientBalance {
            currency,
            required,
            available,
        });
    }
    Ok(())
}
