//! Type-safe price representation using decimal arithmetic.
//!
//! Menu prices are whole or fractional rupee amounts. The backend sends them
//! as JSON numbers, so [`Price`] serialises as a number rather than the
//! string form `rust_decimal` uses by default.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),

    /// The text is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A non-negative amount in rupees.
///
/// ## Examples
///
/// ```
/// use cloud_kitchen_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::from_rupees(120);
/// assert_eq!(price.times(3), Price::from_rupees(360));
/// assert!(Price::new(Decimal::NEGATIVE_ONE).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount.normalize()))
    }

    /// Create a price from a whole number of rupees.
    #[must_use]
    pub fn from_rupees(rupees: u32) -> Self {
        Self(Decimal::from(rupees))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if the price is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Line price for `quantity` units, capped at [`Decimal::MAX`].
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(
            self.0
                .checked_mul(Decimal::from(quantity))
                .unwrap_or(Decimal::MAX),
        )
    }
}

impl Add for Price {
    type Output = Self;

    /// Saturates at [`Decimal::MAX`].
    fn add(self, rhs: Self) -> Self {
        Self(self.0.checked_add(rhs.0).unwrap_or(Decimal::MAX))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}", self.0.normalize())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl core::str::FromStr for Price {
    type Err = PriceError;

    /// Parses `120`, `99.50` or `₹120`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('₹').unwrap_or(trimmed).trim();
        let amount: Decimal = digits
            .parse()
            .map_err(|_| PriceError::Invalid(s.to_string()))?;
        Self::new(amount)
    }
}

impl Serialize for Price {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        assert_eq!(
            Price::new(Decimal::new(-150, 2)),
            Err(PriceError::Negative(Decimal::new(-150, 2)))
        );
    }

    #[test]
    fn test_zero_is_valid() {
        assert!(Price::new(Decimal::ZERO).unwrap().is_zero());
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_rupees(100).times(1), Price::from_rupees(50).times(2)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_rupees(200));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Price::new(Decimal::MAX).unwrap();
        assert_eq!(max.times(2), max);
        assert_eq!(max + Price::from_rupees(40), max);
    }

    #[test]
    fn test_parse() {
        assert_eq!("120".parse::<Price>().unwrap(), Price::from_rupees(120));
        assert_eq!(" ₹99.50 ".parse::<Price>().unwrap().amount(), Decimal::new(995, 1));
        assert!(matches!("-5".parse::<Price>(), Err(PriceError::Negative(_))));
        assert!(matches!("cheap".parse::<Price>(), Err(PriceError::Invalid(_))));
    }

    #[test]
    fn test_serializes_as_number() {
        let price = Price::new(Decimal::new(12_950, 2)).unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "129.5");
    }

    #[test]
    fn test_deserializes_integer_and_fraction() {
        let whole: Price = serde_json::from_str("250").unwrap();
        assert_eq!(whole, Price::from_rupees(250));

        let fraction: Price = serde_json::from_str("99.5").unwrap();
        assert_eq!(fraction.amount(), Decimal::new(995, 1));
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("-1").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_rupees(40).to_string(), "₹40");
    }
}
