//! # Quantity Module
//!
//! Fixed-point ingredient quantities.
//!
//! Stock is counted in whatever unit the inventory row declares (ml, g,
//! shots). Recipes need fractions ("0.5 shots of vanilla"), but stock math
//! must be exact: deleting an order has to put back precisely what creating
//! it took. Quantities are therefore stored as integer **milli-units**, the
//! same way [`Money`](crate::money::Money) stores cents.
//!
//! ```text
//! JSON 200      ⇄  Quantity(200_000)
//! JSON 0.5      ⇄  Quantity(500)
//! JSON 12.345   ⇄  Quantity(12_345)
//! JSON 0.0004   →  Quantity(0)   (rounded to 3 decimals)
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Milli-units per whole unit.
pub const MILLI_PER_UNIT: i64 = 1000;

/// Largest magnitude accepted from a decimal input (keeps the f64 → i64
/// conversion exact).
const MAX_DECIMAL: f64 = 9_000_000_000_000.0;

/// An ingredient quantity (or a signed ledger delta) in milli-units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from milli-units.
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Creates a quantity from whole units.
    ///
    /// ```rust
    /// use hotcoffee_core::Quantity;
    ///
    /// assert_eq!(Quantity::from_units(2).milli(), 2000);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * MILLI_PER_UNIT)
    }

    /// Converts a decimal number, rounding to three decimal places.
    ///
    /// Returns `None` for NaN, infinities and values too large to
    /// represent exactly.
    ///
    /// ```rust
    /// use hotcoffee_core::Quantity;
    ///
    /// assert_eq!(Quantity::from_decimal(0.5), Some(Quantity::from_milli(500)));
    /// assert_eq!(Quantity::from_decimal(f64::NAN), None);
    /// ```
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() || value.abs() > MAX_DECIMAL {
            return None;
        }
        Some(Quantity((value * MILLI_PER_UNIT as f64).round() as i64))
    }

    /// Returns the raw milli-unit value.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal number (for JSON and display).
    #[inline]
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / MILLI_PER_UNIT as f64
    }

    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Quantity)
    }

    #[inline]
    pub fn checked_mul(self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Quantity)
    }
}

/// Prints the shortest exact decimal: `200`, `0.5`, `-1.25`.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / MILLI_PER_UNIT as u64;
        let frac = abs % MILLI_PER_UNIT as u64;

        if frac == 0 {
            return write!(f, "{}{}", sign, whole);
        }

        let digits = format!("{:03}", frac);
        write!(f, "{}{}.{}", sign, whole, digits.trim_end_matches('0'))
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % MILLI_PER_UNIT == 0 {
            serializer.serialize_i64(self.0 / MILLI_PER_UNIT)
        } else {
            serializer.serialize_f64(self.as_decimal())
        }
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Quantity::from_decimal(value)
            .ok_or_else(|| D::Error::custom(format!("quantity {value} is not representable")))
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}

impl Neg for Quantity {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Quantity(-self.0)
    }
}

/// Per-unit requirement × line quantity.
impl Mul<i64> for Quantity {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Quantity(self.0 * qty)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Self {
        iter.fold(Quantity::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
