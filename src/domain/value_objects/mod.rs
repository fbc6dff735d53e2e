//! Value Objects for the storefront

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use validator::ValidationError;

/// Money value object.
///
/// Amounts are whole minor units of the store's single currency, so all
/// arithmetic is exact. Negative amounts are rejected on construction and
/// on deserialization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn minor(amount: u32) -> Self { Self(amount as i64) }

    pub fn new(amount: i64) -> Result<Self, MoneyError> {
        if amount < 0 { return Err(MoneyError::Negative); }
        Ok(Self(amount))
    }

    pub fn amount(&self) -> i64 { self.0 }

    pub fn add(&self, other: Money) -> Result<Money, MoneyError> {
        self.0.checked_add(other.0).map(Money).ok_or(MoneyError::Overflow)
    }

    pub fn multiply(&self, qty: u32) -> Result<Money, MoneyError> {
        self.0.checked_mul(i64::from(qty)).map(Money).ok_or(MoneyError::Overflow)
    }

    /// `self × rate`, rounded half away from zero to a whole unit.
    pub fn apply_rate(&self, rate: Decimal) -> Result<Money, MoneyError> {
        Decimal::from(self.0)
            .checked_mul(rate)
            .map(|d| d.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|d| d.to_i64())
            .ok_or(MoneyError::Overflow)
            .and_then(Money::new)
    }
}

impl TryFrom<i64> for Money {
    type Error = MoneyError;
    fn try_from(value: i64) -> Result<Self, Self::Error> { Money::new(value) }
}

impl From<Money> for i64 {
    fn from(value: Money) -> Self { value.0 }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Saturating, for reporting totals only.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        Money(iter.fold(0i64, |acc, m| acc.saturating_add(m.0)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum MoneyError { Negative, Overflow }
impl std::error::Error for MoneyError {}
impl fmt::Display for MoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Self::Negative => write!(f, "amount must not be negative"), Self::Overflow => write!(f, "amount out of range") }
    }
}

/// Rejects empty and whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}
