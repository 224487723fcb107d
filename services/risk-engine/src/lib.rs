//! Risk engine service
//!
//! Pre-trade validation: required-funds computation, balance
//! sufficiency, and quote-valued exposure limits. The validator is
//! read-only; it never mutates balances.

pub mod engine;
pub mod exposure;
pub mod feed;
pub mod validator;

pub use engine::{RiskConfig, RiskEngine};
pub use feed::{FixedPriceFeed, PriceFeed};
