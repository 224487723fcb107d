//! Trade settlement
//!
//! Applies one fill to both counterparties: persists the trade,
//! advances both orders' fill state, credits the buyer's base and the
//! seller's quote (the reservations were already debited at entry),
//! and emits the per-fill events.

use tracing::info;
use types::errors::ExchangeError;
use types::events::{BalanceChangeReason, ExchangeEvent};
use types::order::Order;
use types::trade::Trade;

use matching_engine::Fill;

use crate::clock::now_nanos;
use crate::coordinator::TradingCoordinator;

impl TradingCoordinator {
    /// Settle a single fill, in book extraction order
    pub(crate) fn settle_fill(
        &self,
        taker: &mut Order,
        fill: &Fill,
    ) -> Result<Trade, ExchangeError> {
        let timestamp = now_nanos();
        let symbol = taker.symbol;

        let trade = self.trades.insert(
            fill.buy_order_id,
            fill.sell_order_id,
            symbol,
            fill.price,
            fill.quantity,
            timestamp,
        );

        // Both records advance under the store's row lock; a resting
        // residual of this taker may be filling concurrently from
        // another submission
        let maker_id = fill.maker_order_id(taker.id);
        *taker = self
            .orders
            .modify(taker.id, |order| order.fill(fill.quantity, timestamp))
            .ok_or_else(|| {
                ExchangeError::Internal(format!("Taker order not found: {}", taker.id))
            })?;
        let maker = self
            .orders
            .modify(maker_id, |order| order.fill(fill.quantity, timestamp))
            .ok_or_else(|| {
                ExchangeError::Internal(format!("Maker order not found: {}", maker_id))
            })?;

        let (buy_order, sell_order): (&Order, &Order) = if taker.id == fill.buy_order_id {
            (taker, &maker)
        } else {
            (&maker, taker)
        };

        // Buyer receives base, seller receives quote; the pre-reserved
        // counter-amounts were debited at order entry
        let quote_amount = fill.quantity.value_at(fill.price);
        let buyer_wallet = self.credit_to_completion(
            buy_order.user_id,
            symbol.base(),
            fill.quantity.as_decimal(),
            timestamp,
        )?;
        let seller_wallet = self.credit_to_completion(
            sell_order.user_id,
            symbol.quote(),
            quote_amount,
            timestamp,
        )?;

        self.emit(
            ExchangeEvent::OrderMatched {
                order_id: buy_order.id,
                matched_quantity: fill.quantity,
                matched_price: fill.price,
                fully_filled: buy_order.is_filled(),
            },
            timestamp,
        );
        self.emit(
            ExchangeEvent::OrderMatched {
                order_id: sell_order.id,
                matched_quantity: fill.quantity,
                matched_price: fill.price,
                fully_filled: sell_order.is_filled(),
            },
            timestamp,
        );
        self.emit(
            ExchangeEvent::TradeExecuted {
                trade_id: trade.id,
                buy_order_id: trade.buy_order_id,
                sell_order_id: trade.sell_order_id,
                symbol,
                price: trade.price,
                quantity: trade.quantity,
            },
            timestamp,
        );
        self.emit(
            ExchangeEvent::BalanceUpdated {
                user_id: buy_order.user_id,
                currency: symbol.base(),
                new_balance: buyer_wallet.balance,
                delta: fill.quantity.as_decimal(),
                reason: BalanceChangeReason::Settlement,
            },
            timestamp,
        );
        self.emit(
            ExchangeEvent::BalanceUpdated {
                user_id: sell_order.user_id,
                currency: symbol.quote(),
                new_balance: seller_wallet.balance,
                delta: quote_amount,
                reason: BalanceChangeReason::Settlement,
            },
            timestamp,
        );

        info!(
            trade = %trade.id,
            %symbol,
            price = %trade.price,
            quantity = %trade.quantity,
            buy = %trade.buy_order_id,
            sell = %trade.sell_order_id,
            "Executed trade"
        );
        Ok(trade)
    }
}
