//! Fixed-point decimal types for prices and quantities
//!
//! Uses rust_decimal for exact arithmetic; no binary floating point
//! appears anywhere in a monetary path. Serialized as strings to
//! prevent JSON number precision loss.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Execution or limit price. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(Decimal);

impl Price {
    /// Try to create a Price, returning None unless value > 0
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Create a new Price from a Decimal
    ///
    /// # Panics
    /// Panics if the price is zero or negative
    pub fn new(value: Decimal) -> Self {
        Self::try_new(value).expect("Price must be positive")
    }

    /// Create from integer (convenience for tests and defaults)
    pub fn from_u64(value: u64) -> Self {
        Self::new(Decimal::from(value))
    }

    /// Get the inner decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Price {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s)?;
        Ok(Self::new(decimal))
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let decimal = Decimal::from_str(&s).map_err(serde::de::Error::custom)?;
        Self::try_new(decimal).ok_or_else(|| serde::de::Error::custom("Price must be positive"))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order or fill quantity. Never negative; zero only for fill counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Try to create a Quantity, returning None unless value > 0
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Create a new Quantity from a Decimal
    ///
    /// # Panics
    /// Panics if the quantity is zero or negative
    pub fn new(value: Decimal) -> Self {
        Self::try_new(value).expect("Quantity must be positive")
    }

    /// Zero quantity (initial fill counter of a fresh order)
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create from integer (convenience for tests)
    pub fn from_u64(value: u64) -> Self {
        Self::new(Decimal::from(value))
    }

    /// Get the inner decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Check if the quantity is zero
    pub fn is_zero(&self) -> bool {
        self.0 == Decimal::ZERO
    }

    /// The smaller of two quantities
    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Quote value of this quantity at the given price
    pub fn value_at(&self, price: Price) -> Decimal {
        self.0 * price.as_decimal()
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Quantity {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        assert!(self.0 >= rhs.0, "Quantity subtraction would go negative");
        Self(self.0 - rhs.0)
    }
}

impl FromStr for Quantity {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s)?;
        Ok(Self::new(decimal))
    }
}

impl Serialize for Quantity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let decimal = Decimal::from_str(&s).map_err(serde::de::Error::custom)?;
        // Zero is allowed here: filled_quantity round-trips through serde
        if decimal >= Decimal::ZERO {
            Ok(Self(decimal))
        } else {
            Err(serde::de::Error::custom("Quantity cannot be negative"))
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_creation() {
        let price = Price::from_u64(50000);
        assert_eq!(price.as_decimal(), Decimal::from(50000));
    }

    #[test]
    fn test_price_rejects_non_positive() {
        assert!(Price::try_new(Decimal::ZERO).is_none());
        assert!(Price::try_new(Decimal::from(-100)).is_none());
    }

    #[test]
    fn test_price_ordering() {
        assert!(Price::from_u64(50000) < Price::from_u64(51000));
    }

    #[test]
    fn test_price_serialization() {
        let price: Price = "50000.25".parse().unwrap();
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"50000.25\"");

        let deserialized: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(price, deserialized);
    }

    #[test]
    fn test_quantity_arithmetic() {
        let q1: Quantity = "2.5".parse().unwrap();
        let q2: Quantity = "1.5".parse().unwrap();

        assert_eq!((q1 + q2).as_decimal(), Decimal::from(4));
        assert_eq!((q1 - q2).as_decimal(), Decimal::from(1));
    }

    #[test]
    #[should_panic(expected = "Quantity subtraction would go negative")]
    fn test_quantity_underflow_panics() {
        let q1: Quantity = "1.0".parse().unwrap();
        let q2: Quantity = "2.0".parse().unwrap();
        let _ = q1 - q2;
    }

    #[test]
    fn test_quantity_min() {
        let q1: Quantity = "0.3".parse().unwrap();
        let q2: Quantity = "1.0".parse().unwrap();
        assert_eq!(q1.min(q2), q1);
        assert_eq!(q2.min(q1), q1);
    }

    #[test]
    fn test_quantity_value_at() {
        let qty: Quantity = "0.1".parse().unwrap();
        let price = Price::from_u64(50000);
        assert_eq!(qty.value_at(price), Decimal::from(5000));
    }

    #[test]
    fn test_quantity_zero_roundtrip() {
        let json = serde_json::to_string(&Quantity::zero()).unwrap();
        let deserialized: Quantity = serde_json::from_str(&json).unwrap();
        assert!(deserialized.is_zero());
    }

    #[test]
    fn test_exact_decimal_arithmetic() {
        // 0.1 + 0.2 is exact in fixed point, unlike binary floats
        let a: Quantity = "0.1".parse().unwrap();
        let b: Quantity = "0.2".parse().unwrap();
        assert_eq!((a + b).as_decimal(), Decimal::from_str("0.3").unwrap());
    }
}
