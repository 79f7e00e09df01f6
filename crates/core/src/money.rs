//! Money as an integer number of cents.
//!
//! Amounts in this system are small (coffee-shop scale) and always a single
//! implicit currency, so a checked integer-cents value object is enough.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A non-negative monetary amount in cents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Construct from cents, rejecting negative amounts.
    pub fn from_cents(cents: i64) -> DomainResult<Self> {
        if cents < 0 {
            return Err(DomainError::validation(format!(
                "amount must be >= 0, got {cents}"
            )));
        }
        Ok(Self(cents))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition; errors on overflow rather than wrapping.
    pub fn add(&self, other: Money) -> DomainResult<Money> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::invariant("money overflow"))
    }

    /// Subtraction floored at zero (used for discounts on quotes).
    pub fn saturating_sub(&self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0).max(0))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_cents() {
        assert!(Money::from_cents(-1).is_err());
        assert!(Money::from_cents(0).is_ok());
    }

    #[test]
    fn add_accumulates() {
        let a = Money::from_cents(450).unwrap();
        let b = Money::from_cents(3500).unwrap();
        assert_eq!(a.add(b).unwrap(), Money::from_cents(3950).unwrap());
    }

    #[test]
    fn saturating_sub_floors_at_zero() {
        let a = Money::from_cents(100).unwrap();
        let b = Money::from_cents(250).unwrap();
        assert_eq!(a.saturating_sub(b), Money::ZERO);
    }

    #[test]
    fn displays_as_decimal() {
        assert_eq!(Money::from_cents(450).unwrap().to_string(), "4.50");
        assert_eq!(Money::from_cents(5).unwrap().to_string(), "0.05");
    }
}
