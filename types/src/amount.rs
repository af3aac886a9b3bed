//! Ledger value amounts in raw minimal units (drops).
//!
//! Amounts are fixed-point integers (u128) to avoid floating-point errors.
//! One drop is the smallest transferable unit and the fixed transfer amount
//! of every anchoring write.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// An amount in raw drops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DropAmount(u128);

impl DropAmount {
    pub const ZERO: Self = Self(0);

    /// The fixed transfer amount of an anchoring write: one drop.
    pub const ONE: Self = Self(1);

    pub const fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Scale by a server load factor, rounding up to whole drops.
    ///
    /// Factors below 1 or non-finite are treated as 1: a server reporting a
    /// nonsensical load never scales the amount down to zero.
    pub fn scaled_by(self, factor: f64) -> Self {
        if !factor.is_finite() || factor < 1.0 {
            return self;
        }
        Self((self.0 as f64 * factor).ceil() as u128)
    }
}

impl Add for DropAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for DropAmount {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl fmt::Display for DropAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} drops", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_by_rounds_up() {
        assert_eq!(DropAmount::new(10).scaled_by(1.0), DropAmount::new(10));
        assert_eq!(DropAmount::new(10).scaled_by(1.01), DropAmount::new(11));
        assert_eq!(DropAmount::new(10).scaled_by(2.5), DropAmount::new(25));
    }

    #[test]
    fn scaled_by_hostile_factor_is_identity() {
        let amount = DropAmount::new(10);
        assert_eq!(amount.scaled_by(-3.0), amount);
        assert_eq!(amount.scaled_by(0.5), amount);
        assert_eq!(amount.scaled_by(f64::NAN), amount);
        assert_eq!(amount.scaled_by(f64::INFINITY), amount);
    }

    #[test]
    fn checked_sub_underflow() {
        assert_eq!(DropAmount::new(1).checked_sub(DropAmount::new(2)), None);
    }
}
