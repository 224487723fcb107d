//! Trading coordinator
//!
//! Owns the composition of stores, books, matcher, risk engine, and
//! event sink, and drives every ingress operation end to end.

use std::sync::Arc;

use ledger::{DepositLog, OrderStore, TradeStore, WalletStore};
use matching_engine::{BookSnapshot, MatchingEngine, OrderBookManager};
use risk_engine::{PriceFeed, RiskEngine};
use rust_decimal::Decimal;
use tracing::{info, warn};
use types::currency::{Currency, Symbol};
use types::errors::ExchangeError;
use types::events::{BalanceChangeReason, EventEnvelope, ExchangeEvent};
use types::ids::{OrderId, UserId};
use types::numeric::{Price, Quantity};
use types::order::{Order, OrderKind, OrderStatus, Side};
use types::trade::Trade;
use types::wallet::Wallet;

use crate::clock::now_nanos;
use crate::config::ExchangeConfig;
use crate::sink::EventSink;

/// Order submission parameters
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub kind: OrderKind,
    pub side: Side,
    pub base: Currency,
    pub quote: Currency,
    /// Required for LIMIT, forbidden for MARKET
    pub price: Option<Price>,
    pub quantity: Quantity,
    pub idempotency_key: Option<String>,
}

/// Central orchestration of submit, cancel, deposit, and withdraw
pub struct TradingCoordinator {
    pub(crate) config: ExchangeConfig,
    pub(crate) wallets: Arc<WalletStore>,
    pub(crate) orders: Arc<OrderStore>,
    pub(crate) trades: Arc<TradeStore>,
    pub(crate) deposits: DepositLog,
    pub(crate) books: Arc<OrderBookManager>,
    pub(crate) engine: MatchingEngine,
    pub(crate) risk: RiskEngine,
    pub(crate) sink: Arc<dyn EventSink>,
}

impl TradingCoordinator {
    /// Composition root: builds the stores and wires every component
    pub fn new(
        config: ExchangeConfig,
        feed: Arc<dyn PriceFeed>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let wallets = Arc::new(WalletStore::new());
        let risk = RiskEngine::new(Arc::clone(&wallets), feed, config.risk.clone());
        Self {
            config,
            wallets,
            orders: Arc::new(OrderStore::new()),
            trades: Arc::new(TradeStore::new()),
            deposits: DepositLog::new(),
            books: Arc::new(OrderBookManager::new()),
            engine: MatchingEngine::new(),
            risk,
            sink,
        }
    }

    // ---- Wallet operations ----

    /// Credit a user's wallet
    ///
    /// An idempotency key makes retried deposits credit at most once.
    pub fn deposit(
        &self,
        user_id: UserId,
        currency: Currency,
        amount: Decimal,
        idempotency_key: Option<&str>,
    ) -> Result<Wallet, ExchangeError> {
        if !self.config.supports_currency(currency) {
            return Err(ExchangeError::Validation(format!(
                "Unsupported currency: {}",
                currency
            )));
        }
        if amount <= Decimal::ZERO {
            return Err(ExchangeError::Validation(
                "Deposit amount must be positive".to_string(),
            ));
        }
        if let Some(key) = idempotency_key {
            self.deposits.record(key)?;
        }

        let timestamp = now_nanos();
        let wallet = self.wallets.credit(user_id, currency, amount, timestamp)?;
        info!(user = %user_id, %currency, %amount, "Deposit");

        self.emit(
            ExchangeEvent::BalanceUpdated {
                user_id,
                currency,
                new_balance: wallet.balance,
                delta: amount,
                reason: BalanceChangeReason::Deposit,
            },
            timestamp,
        );
        Ok(wallet)
    }

    /// Debit a user's wallet
    pub fn withdraw(
        &self,
        user_id: UserId,
        currency: Currency,
        amount: Decimal,
    ) -> Result<Wallet, ExchangeError> {
        let timestamp = now_nanos();
        let wallet = self.wallets.debit(user_id, currency, amount, timestamp)?;
        info!(user = %user_id, %currency, %amount, "Withdrawal");

        self.emit(
            ExchangeEvent::BalanceUpdated {
                user_id,
                currency,
                new_balance: wallet.balance,
                delta: -amount,
                reason: BalanceChangeReason::Withdraw,
            },
            timestamp,
        );
        Ok(wallet)
    }

    // ---- Order operations ----

    /// Place an order: reserve → persist → match → settle → emit
    pub fn submit_order(
        &self,
        user_id: UserId,
        request: OrderRequest,
    ) -> Result<Order, ExchangeError> {
        // Idempotency: a seen key is rejected, not replayed
        if let Some(key) = request.idempotency_key.as_deref() {
            if self.orders.find_by_idempotency_key(key).is_some() {
                info!(%key, "Duplicate order request rejected");
                return Err(ExchangeError::Duplicate {
                    key: key.to_string(),
                });
            }
        }

        let symbol = self.validate_shape(&request)?;
        let timestamp = now_nanos();
        let order = Order {
            id: OrderId(0), // assigned on insert
            user_id,
            kind: request.kind,
            side: request.side,
            symbol,
            price: request.price,
            quantity: request.quantity,
            filled_quantity: Quantity::zero(),
            status: OrderStatus::OPEN,
            idempotency_key: request.idempotency_key.clone(),
            created_at: timestamp,
            updated_at: timestamp,
        };

        self.risk.validate_order(&order)?;

        // Reserve the required funds against the open order
        let (reserve_currency, reserve_amount) = self.risk.required_funds(&order)?;
        let wallet = self
            .wallets
            .debit(user_id, reserve_currency, reserve_amount, timestamp)?;
        self.emit(
            ExchangeEvent::BalanceUpdated {
                user_id,
                currency: reserve_currency,
                new_balance: wallet.balance,
                delta: -reserve_amount,
                reason: BalanceChangeReason::Reservation,
            },
            timestamp,
        );

        let mut order = match self.orders.insert(order) {
            Ok(order) => order,
            Err(err) => {
                // Lost an idempotency race after reserving; put the
                // funds back before surfacing the rejection
                let refunded = self.credit_to_completion(
                    user_id,
                    reserve_currency,
                    reserve_amount,
                    timestamp,
                )?;
                self.emit(
                    ExchangeEvent::BalanceUpdated {
                        user_id,
                        currency: reserve_currency,
                        new_balance: refunded.balance,
                        delta: reserve_amount,
                        reason: BalanceChangeReason::Release,
                    },
                    timestamp,
                );
                return Err(err);
            }
        };
        info!(
            order = %order.id,
            user = %user_id,
            side = ?order.side,
            kind = ?order.kind,
            %symbol,
            quantity = %order.quantity,
            "Placed order"
        );

        self.emit(
            ExchangeEvent::OrderPlaced {
                order_id: order.id,
                user_id,
                symbol,
                kind: order.kind,
                side: order.side,
                price: order.price,
                quantity: order.quantity,
            },
            timestamp,
        );

        // Match against the book; the engine holds the write region
        // for the whole extraction
        let book = self.books.book(symbol);
        let fills = self.engine.match_order(&book, &order);

        for fill in &fills {
            self.settle_fill(&mut order, fill)?;
        }

        if order.kind == OrderKind::MARKET {
            self.finish_market_order(&mut order, reserve_amount, &fills)?;
        }

        // Return the refreshed record
        self.orders.get(order.id).ok_or(ExchangeError::NotFound {
            entity: "order",
            id: order.id.to_string(),
        })
    }

    /// Cancel an open or partially filled order
    pub fn cancel_order(&self, user_id: UserId, order_id: OrderId) -> Result<Order, ExchangeError> {
        let mut order =
            self.orders
                .get_owned(order_id, user_id)
                .ok_or(ExchangeError::NotFound {
                    entity: "order",
                    id: order_id.to_string(),
                })?;
        if !order.can_cancel() {
            return Err(ExchangeError::Uncancellable {
                status: order.status,
            });
        }

        let timestamp = now_nanos();

        // Release the remaining reservation exactly once
        let (currency, amount) = match (order.side, order.price) {
            (Side::BUY, Some(limit)) => {
                (order.symbol.quote(), order.remaining_quantity().value_at(limit))
            }
            _ => (order.symbol.base(), order.remaining_quantity().as_decimal()),
        };
        let wallet = self.wallets.credit(user_id, currency, amount, timestamp)?;
        self.emit(
            ExchangeEvent::BalanceUpdated {
                user_id,
                currency,
                new_balance: wallet.balance,
                delta: amount,
                reason: BalanceChangeReason::Release,
            },
            timestamp,
        );

        // Remove the resting entry, then retire the record
        if let Some(price) = order.price {
            self.books
                .book(order.symbol)
                .remove(order.side, order.id, price);
        }
        order.cancel(timestamp)?;
        self.orders.save(&order);

        info!(order = %order.id, user = %user_id, "Cancelled order");
        Ok(order)
    }

    // ---- Read surface ----

    pub fn get_order(&self, user_id: UserId, order_id: OrderId) -> Result<Order, ExchangeError> {
        self.orders
            .get_owned(order_id, user_id)
            .ok_or(ExchangeError::NotFound {
                entity: "order",
                id: order_id.to_string(),
            })
    }

    pub fn list_orders(&self, user_id: UserId) -> Vec<Order> {
        self.orders.list_by_user(user_id)
    }

    pub fn get_balance(&self, user_id: UserId, currency: Currency) -> Result<Wallet, ExchangeError> {
        self.wallets
            .get(user_id, currency)
            .ok_or(ExchangeError::NotFound {
                entity: "wallet",
                id: format!("{}:{}", user_id, currency),
            })
    }

    pub fn list_balances(&self, user_id: UserId) -> Vec<Wallet> {
        self.wallets.list(user_id)
    }

    pub fn order_book(&self, symbol: Symbol) -> BookSnapshot {
        self.books.book(symbol).snapshot()
    }

    /// Recent trades for a symbol, newest first
    pub fn list_trades(&self, symbol: Symbol, limit: usize) -> Vec<Trade> {
        self.trades.recent(symbol, limit)
    }

    // ---- Internals ----

    /// Shape validation: kind/price consistency and symbol support
    fn validate_shape(&self, request: &OrderRequest) -> Result<Symbol, ExchangeError> {
        match request.kind {
            OrderKind::LIMIT if request.price.is_none() => {
                return Err(ExchangeError::Validation(
                    "LIMIT orders must have a price".to_string(),
                ))
            }
            OrderKind::MARKET if request.price.is_some() => {
                return Err(ExchangeError::Validation(
                    "MARKET orders cannot have a price".to_string(),
                ))
            }
            _ => {}
        }

        let symbol = Symbol::try_new(request.base, request.quote).ok_or_else(|| {
            ExchangeError::Validation(format!(
                "Base and quote must differ: {}/{}",
                request.base, request.quote
            ))
        })?;
        if !self.config.supports_symbol(&symbol) {
            return Err(ExchangeError::Validation(format!(
                "Unsupported symbol: {}",
                symbol
            )));
        }
        Ok(symbol)
    }

    /// MARKET residual cleanup: cancel the unfilled remainder and
    /// release the unspent reservation
    ///
    /// For a BUY the reservation was a buffered worst-case estimate,
    /// so the unspent part (buffer, price improvement, and any
    /// unfilled remainder) is returned; for a SELL the remaining base
    /// quantity is returned. Market orders never rest, so they leave
    /// this method in a terminal state.
    fn finish_market_order(
        &self,
        order: &mut Order,
        reserved: Decimal,
        fills: &[matching_engine::Fill],
    ) -> Result<(), ExchangeError> {
        let timestamp = now_nanos();

        let (currency, unspent) = match order.side {
            Side::BUY => {
                let spent: Decimal = fills
                    .iter()
                    .map(|f| f.quantity.value_at(f.price))
                    .sum();
                (order.symbol.quote(), reserved - spent)
            }
            Side::SELL => (order.symbol.base(), order.remaining_quantity().as_decimal()),
        };

        if unspent < Decimal::ZERO {
            // Sweep executed above the buffered estimate; the
            // reservation did not cover the full spend
            warn!(
                order = %order.id,
                shortfall = %(-unspent),
                "Market order spent more than its reservation"
            );
        }
        if unspent > Decimal::ZERO {
            let wallet = self.credit_to_completion(order.user_id, currency, unspent, timestamp)?;
            self.emit(
                ExchangeEvent::BalanceUpdated {
                    user_id: order.user_id,
                    currency,
                    new_balance: wallet.balance,
                    delta: unspent,
                    reason: BalanceChangeReason::Release,
                },
                timestamp,
            );
        }

        if !order.is_filled() {
            warn!(
                order = %order.id,
                remaining = %order.remaining_quantity(),
                "Market order remainder unfillable, cancelling"
            );
            order.cancel(timestamp)?;
            self.orders.save(order);
        }
        Ok(())
    }

    /// Credit that must land: retries past CAS conflicts
    ///
    /// Settlement and release credits run inside an operation that has
    /// already moved state, so a bounded-retry abort would leave it
    /// half applied. Credits are always valid, so retrying to
    /// completion is safe.
    pub(crate) fn credit_to_completion(
        &self,
        user_id: UserId,
        currency: Currency,
        amount: Decimal,
        timestamp: i64,
    ) -> Result<Wallet, ExchangeError> {
        loop {
            match self.wallets.credit(user_id, currency, amount, timestamp) {
                Err(ExchangeError::ConcurrencyConflict { .. }) => continue,
                other => return other,
            }
        }
    }

    /// Publish an event; failures are logged and swallowed
    pub(crate) fn emit(&self, event: ExchangeEvent, timestamp: i64) {
        let topic = event.topic();
        let key = event.key();
        let envelope = EventEnvelope::new(event, timestamp);
        if let Err(err) = self.sink.publish(topic, &key, &envelope) {
            warn!(%topic, %key, error = %err, "Failed to publish event");
        }
    }
}
