//! Fixed-point decimal types for prices and quantities
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point errors).
//! Midpoint rounding is HALF_UP (away from zero) wherever a rounding step
//! exists, matching exchange display conventions.
//!
//! Invariants enforced at construction:
//! - `Price` is strictly positive
//! - `Quantity` is non-negative

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

use crate::errors::NumericError;

/// A strictly positive price.
///
/// Ordering is total and follows the underlying decimal, so prices can key
/// sorted maps directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price, returning `None` unless the value is strictly positive.
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value > Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Create a price from a whole number of quote units.
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Parse a price from a decimal string.
    ///
    /// Rejects unparseable strings and non-positive values.
    pub fn from_str(s: &str) -> Result<Self, NumericError> {
        let value: Decimal = s
            .parse()
            .map_err(|_| NumericError::InvalidPrice(s.to_string()))?;
        Self::try_new(value).ok_or_else(|| NumericError::InvalidPrice(s.to_string()))
    }

    /// The underlying decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Round to `decimals` fractional digits, half-up.
    pub fn round_dp(&self, decimals: u32) -> Decimal {
        self.0
            .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// A non-negative quantity (order size / traded size).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(Decimal);

impl Quantity {
    /// Create a quantity, returning `None` if the value is negative.
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value >= Decimal::ZERO {
            Some(Self(value))
        } else {
            None
        }
    }

    /// The zero quantity.
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Parse a quantity from a decimal string.
    ///
    /// Rejects unparseable strings and negative values.
    pub fn from_str(s: &str) -> Result<Self, NumericError> {
        let value: Decimal = s
            .parse()
            .map_err(|_| NumericError::InvalidQuantity(s.to_string()))?;
        Self::try_new(value).ok_or_else(|| NumericError::InvalidQuantity(s.to_string()))
    }

    /// The underlying decimal value.
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Whether this quantity is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}
