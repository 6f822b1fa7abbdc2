use bigdecimal::BigDecimal;
use bigdecimal::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("value out of range for minor units")]
    OutOfRange,
}

/// Round a decimal to the nearest integer, half away from zero.
///
/// The decision digit is resolved in integer math: truncate at tenths, then
/// `(t + 5) / 10`, so no floating point is involved anywhere.
pub fn round_half_away(value: &BigDecimal) -> Result<i64, MoneyError> {
    let negative = value < &BigDecimal::from(0);
    let tenths = (value.abs() * BigDecimal::from(10)).with_scale(0);
    let tenths = tenths.to_i64().ok_or(MoneyError::OutOfRange)?;
    let units = tenths.checked_add(5).ok_or(MoneyError::OutOfRange)? / 10;
    Ok(if negative { -units } else { units })
}

/// Convert a decimal major-unit magnitude (e.g. dollars) to integer minor
/// units (cents), rounding half away from zero.
///
/// This is the single decimal-to-integer conversion step; all downstream
/// monetary arithmetic stays in integer cents to avoid penny drift.
pub fn to_minor_units(value: &BigDecimal) -> Result<i64, MoneyError> {
    round_half_away(&(value * BigDecimal::from(100)))
}

/// Integer-cents money value. The wrapper exists so cents never get confused
/// with major units at API boundaries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Money(i64);

impl Money {
    pub fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn as_cents(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Money {
    /// Renders as major units with two decimals, e.g. 1234 -> "12.34".
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
