//! # Exact Monetary Amounts
//!
//! [`Money`] stores an amount as whole `units` plus `nanos` (billionths of a
//! unit) and a currency code. All arithmetic is integer arithmetic; no value
//! ever passes through a float.
//!
//! A value is *valid* when `|nanos| < 10^9` and `units` and `nanos` do not
//! carry opposite signs. Every operation here returns a valid value for valid
//! inputs, and refuses invalid ones with [`MoneyError::InvalidValue`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const NANOS_MIN: i32 = -999_999_999;
pub const NANOS_MAX: i32 = 999_999_999;
pub const NANOS_MOD: i32 = 1_000_000_000;

/// Errors produced by money arithmetic and parsing.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MoneyError {
    /// An operand breaks the sign or range invariant.
    #[error("Invalid money value")]
    InvalidValue,

    /// The operands are in different currencies.
    #[error("Mismatching currency codes: {left} vs {right}")]
    MismatchingCurrency { left: String, right: String },

    /// The whole-unit sum does not fit in an `i64`.
    #[error("Money amount overflow")]
    Overflow,

    /// A decimal string could not be parsed.
    #[error("Malformed amount: {0:?}")]
    Malformed(String),
}

/// An immutable fixed-point amount of money.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub currency_code: String,
    #[serde(default)]
    pub units: i64,
    #[serde(default)]
    pub nanos: i32,
}

impl Money {
    pub fn new(currency_code: impl Into<String>, units: i64, nanos: i32) -> Self {
        Self {
            currency_code: currency_code.into(),
            units,
            nanos,
        }
    }

    /// A zero amount in the given currency.
    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new(currency_code, 0, 0)
    }

    /// Parses a decimal string such as `"8.99"` or `"-0.5"` exactly.
    ///
    /// At most nine fractional digits are accepted.
    pub fn parse(currency_code: impl Into<String>, text: &str) -> Result<Self, MoneyError> {
        let total = parse_nanos(text).ok_or_else(|| MoneyError::Malformed(text.to_string()))?;
        Self::from_total_nanos(currency_code, total)
    }

    /// Builds a value from a signed count of nanos. Truncating division keeps
    /// `units` and `nanos` on the same side of zero.
    pub fn from_total_nanos(
        currency_code: impl Into<String>,
        total: i128,
    ) -> Result<Self, MoneyError> {
        let modulus = i128::from(NANOS_MOD);
        let units = i64::try_from(total / modulus).map_err(|_| MoneyError::Overflow)?;
        // |total % modulus| < 10^9, always fits
        let nanos = (total % modulus) as i32;
        Ok(Self::new(currency_code, units, nanos))
    }

    /// The amount as a signed count of nanos.
    pub fn total_nanos(&self) -> i128 {
        i128::from(self.units) * i128::from(NANOS_MOD) + i128::from(self.nanos)
    }

    pub fn is_valid(&self) -> bool {
        self.sign_matches() && (NANOS_MIN..=NANOS_MAX).contains(&self.nanos)
    }

    fn sign_matches(&self) -> bool {
        self.nanos == 0 || self.units == 0 || (self.nanos < 0) == (self.units < 0)
    }

    pub fn is_zero(&self) -> bool {
        self.units == 0 && self.nanos == 0
    }

    pub fn is_positive(&self) -> bool {
        self.is_valid() && (self.units > 0 || (self.units == 0 && self.nanos > 0))
    }

    pub fn is_negative(&self) -> bool {
        self.is_valid() && (self.units < 0 || (self.units == 0 && self.nanos < 0))
    }

    /// Codes are equal and non-empty.
    pub fn same_currency(&self, other: &Money) -> bool {
        self.currency_code == other.currency_code && !self.currency_code.is_empty()
    }

    /// Flips the sign. Fails with `Overflow` for `i64::MIN` units, which have
    /// no positive counterpart.
    pub fn negate(&self) -> Result<Money, MoneyError> {
        let units = self.units.checked_neg().ok_or(MoneyError::Overflow)?;
        let nanos = self.nanos.checked_neg().ok_or(MoneyError::Overflow)?;
        Ok(Money::new(self.currency_code.clone(), units, nanos))
    }

    /// Adds two amounts of the same currency.
    ///
    /// Units and nanos are summed independently and then normalized: a
    /// same-signed pair carries overflowing nanos into units, a mixed-signed
    /// pair borrows one whole unit so both fields end up on the same side.
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        if !self.is_valid() || !other.is_valid() {
            return Err(MoneyError::InvalidValue);
        }
        if self.currency_code != other.currency_code {
            return Err(MoneyError::MismatchingCurrency {
                left: self.currency_code.clone(),
                right: other.currency_code.clone(),
            });
        }

        let mut units = self
            .units
            .checked_add(other.units)
            .ok_or(MoneyError::Overflow)?;
        // Two valid nanos sum to at most 1_999_999_998 in magnitude
        let mut nanos = self.nanos + other.nanos;

        if (units == 0 && nanos == 0) || (units >= 0 && nanos >= 0) || (units < 0 && nanos <= 0) {
            units = units
                .checked_add(i64::from(nanos / NANOS_MOD))
                .ok_or(MoneyError::Overflow)?;
            nanos %= NANOS_MOD;
        } else if units > 0 {
            units -= 1;
            nanos += NANOS_MOD;
        } else {
            units += 1;
            nanos -= NANOS_MOD;
        }

        Ok(Money::new(self.currency_code.clone(), units, nanos))
    }

    /// Multiplies by a line-item count through repeated addition.
    ///
    /// Each step goes through [`Money::add`], so the result is normalized the
    /// same way a hand-summed total would be. A count of zero yields zero.
    pub fn multiply_by_count(&self, count: u32) -> Result<Money, MoneyError> {
        if !self.is_valid() {
            return Err(MoneyError::InvalidValue);
        }
        if count == 0 {
            return Ok(Money::zero(self.currency_code.clone()));
        }
        let mut out = self.clone();
        for _ in 1..count {
            out = out.add(self)?;
        }
        Ok(out)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.units < 0 || self.nanos < 0 { "-" } else { "" };
        let fraction = format!("{:09}", self.nanos.unsigned_abs());
        let trimmed = fraction.trim_end_matches('0');
        let fraction = if trimmed.len() < 2 { &fraction[..2] } else { trimmed };
        write!(
            f,
            "{sign}{}.{fraction} {}",
            self.units.unsigned_abs(),
            self.currency_code
        )
    }
}

/// Parses an optionally signed decimal into nanos. `None` on anything that is
/// not `[-]digits[.digits]` with at most nine fractional digits.
pub(crate) fn parse_nanos(text: &str) -> Option<i128> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (whole, fraction) = body.split_once('.').unwrap_or((body, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > 9
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let whole: i128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let fraction: i128 = if fraction.is_empty() {
        0
    } else {
        format!("{fraction:0<9}").parse().ok()?
    };
    let total = whole.checked_mul(i128::from(NANOS_MOD))?.checked_add(fraction)?;
    Some(if negative { -total } else { total })
}
