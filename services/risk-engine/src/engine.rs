//! Risk engine orchestrator
//!
//! Runs the pre-trade checks in order: balance sufficiency for the
//! required currency, then the exposure cap for orders that can rest
//! in the book. MARKET orders skip the exposure check.

use ledger::WalletStore;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;
use types::currency::Currency;
use types::errors::ExchangeError;
use types::order::{Order, OrderKind};

use crate::exposure;
use crate::feed::PriceFeed;
use crate::validator;

/// Risk engine configuration
#[derive(Debug, Clone)]
pub struct RiskConfig {
    /// Exposure cap in the quote unit of account
    pub max_exposure_quote: Decimal,
    /// Master switch; disabled skips all checks
    pub enabled: bool,
    /// Worst-case cost multiplier for MARKET BUY estimates
    pub market_slippage_buffer: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_exposure_quote: Decimal::from(100_000),
            enabled: true,
            market_slippage_buffer: Decimal::new(110, 2), // 1.10
        }
    }
}

/// Pre-trade risk validator
///
/// Read-only over wallets and the price feed; never mutates balances.
pub struct RiskEngine {
    wallets: Arc<WalletStore>,
    feed: Arc<dyn PriceFeed>,
    config: RiskConfig,
}

impl RiskEngine {
    pub fn new(wallets: Arc<WalletStore>, feed: Arc<dyn PriceFeed>, config: RiskConfig) -> Self {
        Self {
            wallets,
            feed,
            config,
        }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Currency and amount the order must reserve at entry
    pub fn required_funds(&self, order: &Order) -> Result<(Currency, Decimal), ExchangeError> {
        validator::required_funds(order, self.feed.as_ref(), self.config.market_slippage_buffer)
    }

    /// Validate an order against all risk rules
    pub fn validate_order(&self, order: &Order) -> Result<(), ExchangeError> {
        if !self.config.enabled {
            debug!(order = %order.id, "Risk engine disabled, skipping validation");
            return Ok(());
        }

        self.check_balance(order)?;

        // Only orders that can rest in the book count toward exposure
        if order.kind == OrderKind::LIMIT {
            self.check_exposure(order)?;
        }
        Ok(())
    }

    fn check_balance(&self, order: &Order) -> Result<(), ExchangeError> {
        let (currency, required) = self.required_funds(order)?;
        let wallet = self.wallets.get(order.user_id, currency);
        validator::check_balance(wallet.as_ref(), currency, required)?;

        debug!(
            order = %order.id,
            %currency,
            %required,
            "Balance check passed"
        );
        Ok(())
    }

    fn check_exposure(&self, order: &Order) -> Result<(), ExchangeError> {
        let wallets = self.wallets.list(order.user_id);
        let current = exposure::wallet_exposure(&wallets, self.feed.as_ref())
            + exposure::order_exposure(order, self.feed.as_ref());

        if current > self.config.max_exposure_quote {
            return Err(ExchangeError::ExposureExceeded {
                current,
                limit: self.config.max_exposure_quote,
            });
        }

        debug!(order = %order.id, exposure = %current, "Exposure check passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FixedPriceFeed;
    use types::currency::Symbol;
    use types::ids::{OrderId, UserId};
    use types::numeric::{Price, Quantity};
    use types::order::{OrderStatus, Side};

    const TS: i64 = 1_708_123_456_789_000_000;

    fn engine_with(config: RiskConfig) -> (RiskEngine, Arc<WalletStore>) {
        let wallets = Arc::new(WalletStore::new());
        let feed = Arc::new(FixedPriceFeed::new());
        (
            RiskEngine::new(Arc::clone(&wallets), feed, config),
            wallets,
        )
    }

    fn limit_buy(user: u64, price: u64, qty: &str) -> Order {
        Order {
            id: OrderId(1),
            user_id: UserId(user),
            kind: OrderKind::LIMIT,
            side: Side::BUY,
            symbol: Symbol::new(Currency::BTC, Currency::USDT),
            price: Some(Price::from_u64(price)),
            quantity: qty.parse().unwrap(),
            filled_quantity: Quantity::zero(),
            status: OrderStatus::OPEN,
            idempotency_key: None,
            created_at: TS,
            updated_at: TS,
        }
    }

    #[test]
    fn test_passes_with_sufficient_balance() {
        let (engine, wallets) = engine_with(RiskConfig::default());
        wallets
            .credit(UserId(1), Currency::USDT, Decimal::from(10_000), TS)
            .unwrap();

        engine.validate_order(&limit_buy(1, 50_000, "0.1")).unwrap();
    }

    #[test]
    fn test_insufficient_balance() {
        let (engine, wallets) = engine_with(RiskConfig::default());
        wallets
            .credit(UserId(1), Currency::USDT, Decimal::from(100), TS)
            .unwrap();

        let err = engine
            .validate_order(&limit_buy(1, 50_000, "0.1"))
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InsufficientBalance { .. }));
    }

    #[test]
    fn test_exposure_cap() {
        let config = RiskConfig {
            max_exposure_quote: Decimal::from(1_000),
            ..RiskConfig::default()
        };
        let (engine, wallets) = engine_with(config);
        // Plenty of quote balance, but 10 BTC of holdings blow the cap
        wallets
            .credit(UserId(1), Currency::USDT, Decimal::from(10_000), TS)
            .unwrap();
        wallets
            .credit(UserId(1), Currency::BTC, Decimal::from(10), TS)
            .unwrap();

        let err = engine
            .validate_order(&limit_buy(1, 50_000, "0.1"))
            .unwrap_err();
        match err {
            ExchangeError::ExposureExceeded { current, limit } => {
                // 10 × 50000 holdings + 0.1 × 50000 order
                assert_eq!(current, Decimal::from(505_000));
                assert_eq!(limit, Decimal::from(1_000));
            }
            other => panic!("Expected ExposureExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_market_order_skips_exposure() {
        let config = RiskConfig {
            max_exposure_quote: Decimal::from(1_000),
            ..RiskConfig::default()
        };
        let (engine, wallets) = engine_with(config);
        wallets
            .credit(UserId(1), Currency::USDT, Decimal::from(10_000), TS)
            .unwrap();
        wallets
            .credit(UserId(1), Currency::BTC, Decimal::from(10), TS)
            .unwrap();

        let mut order = limit_buy(1, 50_000, "0.1");
        order.kind = OrderKind::MARKET;
        order.price = None;

        // Same holdings pass because MARKET skips the exposure check
        engine.validate_order(&order).unwrap();
    }

    #[test]
    fn test_disabled_engine_skips_everything() {
        let config = RiskConfig {
            enabled: false,
            ..RiskConfig::default()
        };
        let (engine, _wallets) = engine_with(config);

        // No wallets at all, still passes
        engine.validate_order(&limit_buy(1, 50_000, "0.1")).unwrap();
    }
}
