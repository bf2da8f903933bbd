//! # Money Module
//!
//! Provides the `Money` type for handling monetary values exactly.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  0.1 + 0.2 = 0.30000000000000004                                        │
//! │                                                                         │
//! │  An order total computed in floats can drift by a fraction of a unit    │
//! │  and two identical orders could persist different totals.               │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    ¥120 × 10   = 1200      (JPY has no minor unit)                      │
//! │    $1.99 × 3   = 199 × 3 = 597 cents                                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use janorder_core::money::Money;
//!
//! let unit_price = Money::from_minor(120);
//! let total = unit_price.checked_mul_quantity(10).unwrap();
//! assert_eq!(total.minor(), 1200);
//! assert_eq!(total.to_string(), "1,200");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (yen, cents, ...).
///
/// The currency itself is a display concern owned by the terminal
/// configuration; the engine only ever multiplies and compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use janorder_core::money::Money;
    ///
    /// let price = Money::from_minor(1099); // $10.99 or ¥1,099
    /// assert_eq!(price.minor(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, returning `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use janorder_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(299);
    /// assert_eq!(unit_price.checked_mul_quantity(3).unwrap().minor(), 897);
    /// assert!(Money::from_minor(i64::MAX).checked_mul_quantity(2).is_none());
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Formats the amount with thousands separators and `decimals` places.
    ///
    /// ## Example
    /// ```rust
    /// use janorder_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(1234567).format_grouped(0), "1,234,567");
    /// assert_eq!(Money::from_minor(1234567).format_grouped(2), "12,345.67");
    /// assert_eq!(Money::from_minor(-550).format_grouped(2), "-5.50");
    /// ```
    pub fn format_grouped(&self, decimals: u8) -> String {
        let divisor = 10_u64.pow(decimals as u32);
        let magnitude = self.0.unsigned_abs();
        let whole = magnitude / divisor;
        let frac = magnitude % divisor;

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        if decimals == 0 {
            format!("{sign}{grouped}")
        } else {
            format!("{sign}{grouped}.{frac:0width$}", width = decimals as usize)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Minor units with thousands separators.
///
/// ## Note
/// Currency symbols and decimal places are applied by the terminal's
/// currency configuration, not here.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_grouped(0))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
