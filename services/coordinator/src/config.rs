//! Exchange configuration
//!
//! Plain structs with defaults; loading from files or the environment
//! is an outer-layer concern.

use risk_engine::RiskConfig;
use types::currency::{Currency, Symbol};

/// Top-level configuration surface
#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub supported_currencies: Vec<Currency>,
    pub supported_symbols: Vec<Symbol>,
    pub risk: RiskConfig,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            supported_currencies: Currency::all().to_vec(),
            supported_symbols: vec![
                Symbol::new(Currency::BTC, Currency::USDT),
                Symbol::new(Currency::ETH, Currency::USDT),
            ],
            risk: RiskConfig::default(),
        }
    }
}

impl ExchangeConfig {
    pub fn supports_currency(&self, currency: Currency) -> bool {
        self.supported_currencies.contains(&currency)
    }

    pub fn supports_symbol(&self, symbol: &Symbol) -> bool {
        self.supported_symbols.contains(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_defaults() {
        let config = ExchangeConfig::default();
        assert!(config.supports_currency(Currency::BTC));
        assert!(config.supports_symbol(&Symbol::new(Currency::BTC, Currency::USDT)));
        assert!(!config.supports_symbol(&Symbol::new(Currency::ETH, Currency::BTC)));
        assert_eq!(config.risk.max_exposure_quote, Decimal::from(100_000));
        assert!(config.risk.enabled);
    }
}
