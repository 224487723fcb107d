//! Crossing detection
//!
//! An incoming order crosses a resting entry when the resting price
//! satisfies the taker's limit: asks at or below a buyer's limit,
//! bids at or above a seller's limit. Market orders carry no bound
//! and cross any resting price.

use types::numeric::Price;
use types::order::Side;

/// Check whether a taker with the given price bound can fill against
/// a resting entry at `resting_price`
pub fn crosses(taker_side: Side, bound: Option<Price>, resting_price: Price) -> bool {
    match bound {
        None => true,
        Some(limit) => match taker_side {
            Side::BUY => resting_price <= limit,
            Side::SELL => resting_price >= limit,
        },
    }
}
