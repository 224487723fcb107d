//! Price-time priority matching
//!
//! Consumes the best opposing price level head-first while the
//! incoming order's bound crosses, producing an ordered fill list.
//! The engine mutates only the order book; ledger and order-record
//! updates are the coordinator's job, driven by the returned fills.

use tracing::debug;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderKind, Side};

use crate::book::price_level::BookEntry;
use crate::book::OrderBook;

use super::crossing;

/// One execution extracted from the book
///
/// Execution price is the resting order's price.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub buy_order_id: OrderId,
    pub sell_order_id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
}

impl Fill {
    /// The counterparty of the given (taker) order
    pub fn maker_order_id(&self, taker: OrderId) -> OrderId {
        if self.buy_order_id == taker {
            self.sell_order_id
        } else {
            self.buy_order_id
        }
    }
}

/// Stateless matcher over per-symbol order books
#[derive(Debug, Default)]
pub struct MatchingEngine;

impl MatchingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Match a freshly persisted order against its book
    ///
    /// Holds the book's writer region for the whole extraction. A
    /// LIMIT residual rests on its own side at the limit price; a
    /// MARKET residual never rests. Self-matching is not prevented:
    /// an order may fill against the same user's resting entry.
    pub fn match_order(&self, book: &OrderBook, order: &Order) -> Vec<Fill> {
        let mut sides = book.write();
        let mut fills = Vec::new();
        let mut remaining = order.remaining_quantity();
        // MARKET orders carry no bound and sweep the book
        let bound = order.price;

        while !remaining.is_zero() {
            let step = {
                let best = match order.side {
                    Side::BUY => sides.asks.best_level_mut(),
                    Side::SELL => sides.bids.best_level_mut(),
                };
                let Some((best_price, level)) = best else { break };
                if !crossing::crosses(order.side, bound, best_price) {
                    break;
                }

                let head_remaining = match level.front() {
                    Some(head) => head.remaining_quantity,
                    None => break,
                };
                let fill_qty = remaining.min(head_remaining);
                let (maker_id, consumed) = level.fill_front(fill_qty);
                (best_price, maker_id, fill_qty, consumed)
            };
            let (price, maker_id, fill_qty, consumed) = step;

            if consumed {
                match order.side {
                    Side::BUY => sides.asks.prune_empty(price),
                    Side::SELL => sides.bids.prune_empty(price),
                }
            }

            let (buy_order_id, sell_order_id) = match order.side {
                Side::BUY => (order.id, maker_id),
                Side::SELL => (maker_id, order.id),
            };
            debug!(
                taker = %order.id,
                maker = %maker_id,
                %price,
                quantity = %fill_qty,
                "Matched"
            );
            fills.push(Fill {
                buy_order_id,
                sell_order_id,
                price,
                quantity: fill_qty,
            });

            remaining = remaining - fill_qty;
        }

        // LIMIT residual rests at its limit price, keeping the
        // original arrival time for FIFO position
        if !remaining.is_zero() && order.kind == OrderKind::LIMIT {
            if let Some(limit) = order.price {
                let entry = BookEntry {
                    order_id: order.id,
                    price: limit,
                    remaining_quantity: remaining,
                    arrival_time: order.created_at,
                };
                match order.side {
                    Side::BUY => sides.bids.insert(entry),
                    Side::SELL => sides.asks.insert(entry),
                }
                debug!(order = %order.id, price = %limit, quantity = %remaining, "Resting");
            }
        }

        fills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::currency::{Currency, Symbol};
    use types::ids::UserId;
    use types::order::OrderStatus;

    fn btc_usdt() -> Symbol {
        Symbol::new(Currency::BTC, Currency::USDT)
    }

    fn limit_order(id: u64, user: u64, side: Side, price: u64, qty: &str, created: i64) -> Order {
        Order {
            id: OrderId(id),
            user_id: UserId(user),
            kind: OrderKind::LIMIT,
            side,
            symbol: btc_usdt(),
            price: Some(Price::from_u64(price)),
            quantity: qty.parse().unwrap(),
            filled_quantity: Quantity::zero(),
            status: OrderStatus::OPEN,
            idempotency_key: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn market_order(id: u64, user: u64, side: Side, qty: &str, created: i64) -> Order {
        Order {
            kind: OrderKind::MARKET,
            price: None,
            ..limit_order(id, user, side, 1, qty, created)
        }
    }

    /// Seed the book by matching resting limit orders into it
    fn seed(engine: &MatchingEngine, book: &OrderBook, orders: &[Order]) {
        for order in orders {
            let fills = engine.match_order(book, order);
            assert!(fills.is_empty(), "seed order {} must rest", order.id);
        }
    }

    #[test]
    fn test_no_cross_rests() {
        let engine = MatchingEngine::new();
        let book = OrderBook::new(btc_usdt());

        seed(&engine, &book, &[limit_order(1, 1, Side::SELL, 51000, "1.0", 1)]);
        let fills = engine.match_order(&book, &limit_order(2, 2, Side::BUY, 50000, "1.0", 2));

        assert!(fills.is_empty());
        assert_eq!(book.best_bid().unwrap().0, Price::from_u64(50000));
        assert_eq!(book.best_ask().unwrap().0, Price::from_u64(51000));
    }

    #[test]
    fn test_full_match_at_resting_price() {
        let engine = MatchingEngine::new();
        let book = OrderBook::new(btc_usdt());

        seed(&engine, &book, &[limit_order(1, 1, Side::SELL, 50000, "1.0", 1)]);
        // Taker is willing to pay more; execution price is the maker's
        let fills = engine.match_order(&book, &limit_order(2, 2, Side::BUY, 50500, "1.0", 2));

        assert_eq!(
            fills,
            vec![Fill {
                buy_order_id: OrderId(2),
                sell_order_id: OrderId(1),
                price: Price::from_u64(50000),
                quantity: "1.0".parse().unwrap(),
            }]
        );
        assert!(book.is_empty());
    }

    #[test]
    fn test_price_priority() {
        let engine = MatchingEngine::new();
        let book = OrderBook::new(btc_usdt());

        seed(
            &engine,
            &book,
            &[
                limit_order(1, 1, Side::SELL, 50100, "1.0", 1),
                limit_order(2, 1, Side::SELL, 50000, "1.0", 2),
            ],
        );
        let fills = engine.match_order(&book, &limit_order(3, 2, Side::BUY, 50200, "1.0", 3));

        // Cheaper ask matches first even though it arrived later
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].sell_order_id, OrderId(2));
        assert_eq!(fills[0].price, Price::from_u64(50000));
    }

    #[test]
    fn test_time_priority() {
        let engine = MatchingEngine::new();
        let book = OrderBook::new(btc_usdt());

        seed(
            &engine,
            &book,
            &[
                limit_order(1, 1, Side::SELL, 50000, "1.0", 1),
                limit_order(2, 1, Side::SELL, 50000, "1.0", 2),
            ],
        );
        let fills = engine.match_order(&book, &limit_order(3, 2, Side::BUY, 50000, "1.0", 3));

        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].sell_order_id, OrderId(1));
    }

    #[test]
    fn test_partial_fill_of_incoming_rests_remainder() {
        let engine = MatchingEngine::new();
        let book = OrderBook::new(btc_usdt());

        seed(&engine, &book, &[limit_order(1, 1, Side::SELL, 50000, "0.3", 1)]);
        let fills = engine.match_order(&book, &limit_order(2, 2, Side::BUY, 50000, "1.0", 2));

        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].quantity, "0.3".parse().unwrap());
        // Remaining 0.7 rests as a bid at the limit price
        let (bid_price, bid_qty) = book.best_bid().unwrap();
        assert_eq!(bid_price, Price::from_u64(50000));
        assert_eq!(bid_qty, "0.7".parse().unwrap());
        assert!(book.best_ask().is_none());
    }

    #[test]
    fn test_partial_fill_of_resting_keeps_priority() {
        let engine = MatchingEngine::new();
        let book = OrderBook::new(btc_usdt());

        seed(
            &engine,
            &book,
            &[
                limit_order(1, 1, Side::SELL, 50000, "1.0", 1),
                limit_order(2, 1, Side::SELL, 50000, "1.0", 2),
            ],
        );
        let fills = engine.match_order(&book, &limit_order(3, 2, Side::BUY, 50000, "0.4", 3));

        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].sell_order_id, OrderId(1));
        assert_eq!(fills[0].quantity, "0.4".parse().unwrap());
        assert_eq!(book.best_ask().unwrap().1, "1.6".parse().unwrap());

        // Next buy still hits order 1's remainder first
        let fills = engine.match_order(&book, &limit_order(4, 2, Side::BUY, 50000, "0.6", 4));
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].sell_order_id, OrderId(1));
    }

    #[test]
    fn test_sweep_multiple_levels() {
        let engine = MatchingEngine::new();
        let book = OrderBook::new(btc_usdt());

        seed(
            &engine,
            &book,
            &[
                limit_order(1, 1, Side::SELL, 50000, "0.5", 1),
                limit_order(2, 1, Side::SELL, 50100, "0.5", 2),
                limit_order(3, 1, Side::SELL, 50200, "0.5", 3),
            ],
        );
        let fills = engine.match_order(&book, &limit_order(4, 2, Side::BUY, 50100, "2.0", 4));

        // Fills the two crossing levels in price order, rests the rest
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].price, Price::from_u64(50000));
        assert_eq!(fills[1].price, Price::from_u64(50100));
        assert_eq!(book.best_bid().unwrap().1, "1.0".parse().unwrap());
        assert_eq!(book.best_ask().unwrap().0, Price::from_u64(50200));
    }

    #[test]
    fn test_market_buy_sweeps_and_never_rests() {
        let engine = MatchingEngine::new();
        let book = OrderBook::new(btc_usdt());

        seed(
            &engine,
            &book,
            &[
                limit_order(1, 1, Side::SELL, 50000, "0.5", 1),
                limit_order(2, 1, Side::SELL, 52000, "0.5", 2),
            ],
        );
        let fills = engine.match_order(&book, &market_order(3, 2, Side::BUY, "2.0", 3));

        // Fills everything available at any price, residual does not rest
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[1].price, Price::from_u64(52000));
        assert!(book.is_empty());
    }

    #[test]
    fn test_market_sell_against_empty_book() {
        let engine = MatchingEngine::new();
        let book = OrderBook::new(btc_usdt());

        let fills = engine.match_order(&book, &market_order(1, 1, Side::SELL, "1.0", 1));
        assert!(fills.is_empty());
        assert!(book.is_empty());
    }

    #[test]
    fn test_self_match_allowed() {
        let engine = MatchingEngine::new();
        let book = OrderBook::new(btc_usdt());

        // Same user on both sides still matches
        seed(&engine, &book, &[limit_order(1, 7, Side::SELL, 50000, "1.0", 1)]);
        let fills = engine.match_order(&book, &limit_order(2, 7, Side::BUY, 50000, "1.0", 2));

        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].buy_order_id, OrderId(2));
        assert_eq!(fills[0].sell_order_id, OrderId(1));
    }

    #[test]
    fn test_fill_maker_order_id() {
        let fill = Fill {
            buy_order_id: OrderId(1),
            sell_order_id: OrderId(2),
            price: Price::from_u64(50000),
            quantity: "1.0".parse().unwrap(),
        };
        assert_eq!(fill.maker_order_id(OrderId(1)), OrderId(2));
        assert_eq!(fill.maker_order_id(OrderId(2)), OrderId(1));
    }
}
