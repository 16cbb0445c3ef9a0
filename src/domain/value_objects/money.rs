use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::Add;

/// Non-negative amount in minor currency units (paisa, cents).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_major(units: u64) -> Self {
        Self(units.saturating_mul(100))
    }

    /// Storage columns are signed; negative values clamp to zero.
    pub fn from_minor_signed(minor: i64) -> Self {
        Self(u64::try_from(minor).unwrap_or(0))
    }

    pub fn minor(&self) -> u64 {
        self.0
    }

    pub fn minor_signed(&self) -> i64 {
        i64::try_from(self.0).unwrap_or(i64::MAX)
    }

    /// Renders `Rs 12,500.00` style strings for job cards and dashboards.
    pub fn format(&self, symbol: &str) -> String {
        let major = self.0 / 100;
        let minor = self.0 % 100;
        let digits = major.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if symbol.is_empty() {
            format!("{grouped}.{minor:02}")
        } else {
            format!("{symbol} {grouped}.{minor:02}")
        }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}
