//! [`Percent`]-related definitions.

use std::{ops::RangeInclusive, str::FromStr};

use derive_more::Display;
use rust_decimal::Decimal;

/// Decimal percentage in the `[0, 100]` range.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("{_0}%")]
pub struct Percent(Decimal);

impl Percent {
    /// Creates a new [`Percent`] by checking the provided value is between
    /// `0` and `100` inclusive.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (Decimal::ZERO..=Decimal::ONE_HUNDRED)
            .contains(&val)
            .then_some(Self(val))
    }

    /// Creates a new [`Percent`] out of a whole number of percents.
    ///
    /// # Panics
    ///
    /// If `pct` is greater than `100`.
    #[must_use]
    pub const fn whole(pct: u32) -> Self {
        assert!(pct <= 100, "`Percent` cannot exceed 100");
        Self(Decimal::from_parts(pct, 0, 0, false, 0))
    }

    /// Returns this [`Percent`] as a fraction of one (`15%` is `0.15`).
    #[must_use]
    pub fn fraction(self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Returns this [`Percent`] of the provided `value`.
    #[must_use]
    pub fn of(self, value: Decimal) -> Decimal {
        value * self.fraction()
    }

    /// Returns the inclusive `[value - self, value + self]` band around the
    /// provided `value`, or [`None`] if its bounds overflow [`Decimal`].
    ///
    /// Bounds are computed as `value × (1 ∓ fraction)`, so they are exact
    /// for decimal inputs.
    #[must_use]
    pub fn band(self, value: Decimal) -> Option<RangeInclusive<Decimal>> {
        let low = value.checked_mul(Decimal::ONE - self.fraction())?;
        let high = value.checked_mul(Decimal::ONE + self.fraction())?;
        Some(low.min(high)..=low.max(high))
    }
}

impl From<Percent> for Decimal {
    fn from(pct: Percent) -> Self {
        pct.0
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim_end_matches('%'))
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}
