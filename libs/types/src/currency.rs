//! Supported currencies and trading symbols

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported currencies with fixed decimal precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Tether stablecoin, 6 decimals. Quote unit of account.
    USDT,
    /// Bitcoin, 8 decimals
    BTC,
    /// Ethereum, 18 decimals
    ETH,
}

/// The currency in which exposure is valued
pub const QUOTE_UNIT: Currency = Currency::USDT;

impl Currency {
    /// Fractional digits carried by this currency
    pub fn decimals(&self) -> u32 {
        match self {
            Currency::USDT => 6,
            Currency::BTC => 8,
            Currency::ETH => 18,
        }
    }

    /// Ticker string, e.g. "BTC"
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USDT => "USDT",
            Currency::BTC => "BTC",
            Currency::ETH => "ETH",
        }
    }

    /// All supported currencies
    pub fn all() -> [Currency; 3] {
        [Currency::USDT, Currency::BTC, Currency::ETH]
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USDT" => Ok(Currency::USDT),
            "BTC" => Ok(Currency::BTC),
            "ETH" => Ok(Currency::ETH),
            other => Err(format!("Unknown currency: {}", other)),
        }
    }
}

/// Trading pair (base, quote) with base ≠ quote
///
/// Canonical printable form is "BASE/QUOTE" (e.g. "BTC/USDT").
/// Each symbol owns exactly one order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol {
    base: Currency,
    quote: Currency,
}

impl Symbol {
    /// Create a new Symbol, rejecting base == quote
    pub fn try_new(base: Currency, quote: Currency) -> Option<Self> {
        if base == quote {
            None
        } else {
            Some(Self { base, quote })
        }
    }

    /// Create a new Symbol
    ///
    /// # Panics
    /// Panics if base == quote
    pub fn new(base: Currency, quote: Currency) -> Self {
        Self::try_new(base, quote).expect("Symbol base and quote must differ")
    }

    /// The asset being bought or sold
    pub fn base(&self) -> Currency {
        self.base
    }

    /// The asset the base is priced in
    pub fn quote(&self) -> Currency {
        self.quote
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for Symbol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .split_once('/')
            .ok_or_else(|| format!("Symbol must be in BASE/QUOTE format: {}", s))?;
        let base = base.parse()?;
        let quote = quote.parse()?;
        Symbol::try_new(base, quote).ok_or_else(|| format!("Symbol base and quote must differ: {}", s))
    }
}

// Serialized in the canonical "BASE/QUOTE" form
impl Serialize for Symbol {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
