//! # Price Module
//!
//! Provides the `Price` type for book prices.
//!
//! ## Why Integer Cents?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  parseFloat("9999.994") > 9999.99  but  9999.994 rounds to 9999.99     │
//! │  0.1 + 0.2 = 0.30000000000000004                                        │
//! │                                                                         │
//! │  OUR SOLUTION: Parse the decimal TEXT exactly                           │
//! │    "12.5"     → 1250 cents                                              │
//! │    "9999.994" → above the limit (exact comparison), rejected            │
//! │    "0.125"    → 12 cents (bankers rounding)                             │
//! │                                                                         │
//! │  Floats appear only at the wire boundary (`precio` is a JSON number).  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use biblio_core::price::{Price, PriceError};
//!
//! let price = Price::parse("12.5").unwrap();
//! assert_eq!(price.cents(), 1250);
//! assert_eq!(price.to_string(), "$12.50");
//!
//! assert_eq!(Price::parse("abc"), Err(PriceError::NotNumeric));
//! assert_eq!(Price::parse("-1"), Err(PriceError::Negative));
//! assert_eq!(Price::parse("10000"), Err(PriceError::TooLarge));
//! ```

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::MAX_PRICE;

// =============================================================================
// Price Type
// =============================================================================

/// A book price in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: a parsed amount can be negative before validation
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Wire format**: a JSON number in currency units (`12.5`), matching
///   the backend's `precio` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(i64);

/// Why price text was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("not a decimal number")]
    NotNumeric,

    #[error("below zero")]
    Negative,

    #[error("above the maximum price")]
    TooLarge,
}

impl Price {
    /// Creates a price from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Price(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-currency portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero price (free book).
    #[inline]
    pub const fn zero() -> Self {
        Price(0)
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Parses decimal text into a price within `0.00..=9999.99`.
    ///
    /// ## Grammar
    /// Surrounding whitespace, an optional `+`/`-`, then digits with an
    /// optional `.` fraction. At least one digit is required: `"5"`,
    /// `"5."`, `".5"` and `"0.125"` parse; `""`, `"."`, `"1e3"` and
    /// `"12abc"` do not.
    ///
    /// ## Range Checks
    /// Done on the exact value before rounding, so `"9999.991"` is
    /// `TooLarge` and `"-0.001"` is `Negative`. The accepted value is then
    /// rounded to cents with bankers rounding.
    pub fn parse(text: &str) -> Result<Price, PriceError> {
        let amount = ExactAmount::parse(text).ok_or(PriceError::NotNumeric)?;

        if amount.is_negative() {
            return Err(PriceError::Negative);
        }

        if amount.exceeds(MAX_PRICE) {
            return Err(PriceError::TooLarge);
        }

        Ok(amount.round_to_cents())
    }

    /// Converts a wire amount (currency units) to cents.
    ///
    /// Returns `None` for NaN, infinities and values outside `i64` cents.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }

        let cents = (value * 100.0).round();
        if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
            return None;
        }

        Some(Price(cents as i64))
    }

    /// Returns the wire amount in currency units.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Formats without the currency symbol (`"12.50"`), as typed in forms.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Exact Decimal Parsing
// =============================================================================

/// A parsed decimal split at the cents position.
struct ExactAmount {
    negative: bool,
    /// Magnitude truncated to cents (saturating).
    cents: i64,
    /// Digits past the hundredths place.
    rest: Vec<u8>,
}

impl ExactAmount {
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        let (negative, body) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };

        let (whole, frac) = body.split_once('.').unwrap_or((body, ""));

        if whole.is_empty() && frac.is_empty() {
            return None;
        }

        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let mut cents: i64 = 0;
        for b in whole.bytes() {
            cents = cents.saturating_mul(10).saturating_add(i64::from(b - b'0'));
        }
        cents = cents.saturating_mul(100);

        let frac = frac.as_bytes();
        let digit = |i: usize| frac.get(i).map_or(0, |b| i64::from(b - b'0'));
        cents = cents.saturating_add(digit(0) * 10 + digit(1));

        let rest = frac.get(2..).unwrap_or(&[]).iter().map(|b| b - b'0').collect();

        Some(ExactAmount {
            negative,
            cents,
            rest,
        })
    }

    fn has_remainder(&self) -> bool {
        self.rest.iter().any(|&d| d != 0)
    }

    fn is_negative(&self) -> bool {
        self.negative && (self.cents > 0 || self.has_remainder())
    }

    fn exceeds(&self, max: Price) -> bool {
        !self.negative
            && (self.cents > max.cents() || (self.cents == max.cents() && self.has_remainder()))
    }

    /// Bankers rounding (round half to even) at the cents position.
    fn round_to_cents(&self) -> Price {
        let first = self.rest.first().copied().unwrap_or(0);
        let tail_nonzero = self.rest.iter().skip(1).any(|&d| d != 0);
        let round_up = first > 5 || (first == 5 && (tail_nonzero || self.cents % 2 == 1));

        let cents = self.cents + i64::from(round_up);
        if self.negative {
            Price(-cents)
        } else {
            Price(cents)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Price::from_f64(value)
            .ok_or_else(|| de::Error::custom(format!("price out of range: {}", value)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
