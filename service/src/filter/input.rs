//! Parsing of raw numeric inputs into [`Patch`]es.
//!
//! Malformed or out-of-range inputs never fail: they clear the field they
//! were entered into. The same ranges are enforced on a restored
//! [`FilterState`] by [`FilterState::clamp()`].

use std::{ops::RangeInclusive, str::FromStr as _};

use common::define_kind;
use rust_decimal::Decimal;

use crate::domain::characteristic::Value;

use super::{FilterState, Patch};

/// Largest accepted amount (area, price or characteristic value).
const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Accepted parking places counts.
const PARKING: RangeInclusive<u16> = 1..=1_000;

/// Accepted building ages in years.
const AGE_YEARS: RangeInclusive<u16> = 0..=500;

define_kind! {
    #[doc = "Numeric field of a [`FilterState`] entered as raw text.\n\n\
             [`FilterState`]: super::FilterState"]
    enum NumericField {
        #[doc = "[`GenericFilter::target_area`](super::GenericFilter)."]
        TargetArea = 1,

        #[doc = "[`GenericFilter::target_budget`](super::GenericFilter)."]
        TargetBudget = 2,

        #[doc = "[`BasicFilter::max_sale_price`](super::BasicFilter)."]
        MaxSalePrice = 3,

        #[doc = "[`BasicFilter::max_rent_price`](super::BasicFilter)."]
        MaxRentPrice = 4,

        #[doc = "[`BasicFilter::min_area`](super::BasicFilter)."]
        MinArea = 5,

        #[doc = "[`BasicFilter::min_parking`](super::BasicFilter)."]
        MinParking = 6,

        #[doc = "[`BasicFilter::max_age_years`](super::BasicFilter)."]
        MaxAgeYears = 7,
    }
}

impl NumericField {
    /// Parses the provided raw `input` into a [`Patch`] of this field.
    ///
    /// The [`Patch`] clears the field if the `input` is empty, malformed or
    /// out of range.
    #[must_use]
    pub fn patch(self, input: &str) -> Patch {
        match self {
            Self::TargetArea => Patch::TargetArea(amount(input)),
            Self::TargetBudget => Patch::TargetBudget(amount(input)),
            Self::MaxSalePrice => Patch::MaxSalePrice(amount(input)),
            Self::MaxRentPrice => Patch::MaxRentPrice(amount(input)),
            Self::MinArea => Patch::MinArea(amount(input)),
            Self::MinParking => Patch::MinParking(count(input, PARKING)),
            Self::MaxAgeYears => Patch::MaxAgeYears(count(input, AGE_YEARS)),
        }
    }
}

/// Parses a strictly positive amount.
#[must_use]
pub fn amount(input: &str) -> Option<Decimal> {
    decimal(input).filter(is_amount)
}

/// Parses a non-negative numeric floor of an advanced characteristic.
#[must_use]
pub fn floor(input: &str) -> Option<Decimal> {
    decimal(input).filter(is_floor)
}

/// Parses a whole count within the provided `range`.
#[must_use]
pub fn count(input: &str, range: RangeInclusive<u16>) -> Option<u16> {
    input
        .trim()
        .parse::<u16>()
        .ok()
        .filter(|n| range.contains(n))
}

/// Parses a decimal not exceeding [`MAX_AMOUNT`] by magnitude.
fn decimal(input: &str) -> Option<Decimal> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Decimal::from_str(input)
        .ok()
        .filter(|d| d.abs() <= MAX_AMOUNT)
        .map(|d| d.normalize())
}

/// Checks the provided value is an acceptable amount.
fn is_amount(d: &Decimal) -> bool {
    *d > Decimal::ZERO && *d <= MAX_AMOUNT
}

/// Checks the provided value is an acceptable numeric floor.
fn is_floor(d: &Decimal) -> bool {
    (!d.is_sign_negative() || d.is_zero()) && *d <= MAX_AMOUNT
}

impl FilterState {
    /// Clears every field holding a value its [`NumericField`] would never
    /// accept as input, returning the number of cleared fields.
    pub fn clamp(&mut self) -> usize {
        /// Clears the `field` if it's set and fails the `check`.
        fn clear<T>(
            field: &mut Option<T>,
            check: impl FnOnce(&T) -> bool,
        ) -> usize {
            if field.as_ref().is_some_and(|v| !check(v)) {
                *field = None;
                1
            } else {
                0
            }
        }

        let generic = &mut self.generic;
        let basic = &mut self.basic;
        let cleared = clear(&mut generic.target_area, is_amount)
            + clear(&mut generic.target_budget, is_amount)
            + clear(&mut basic.max_sale_price, is_amount)
            + clear(&mut basic.max_rent_price, is_amount)
            + clear(&mut basic.min_area, is_amount)
            + clear(&mut basic.min_parking, |n| PARKING.contains(n))
            + clear(&mut basic.max_age_years, |n| AGE_YEARS.contains(n));

        cleared
            + self.advanced.retain(|_, _, value| match value {
                Value::Presence => true,
                Value::Numeric(floor) => is_floor(&floor),
            })
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::{amount, count, floor, NumericField, MAX_AMOUNT};
    use crate::{
        filter::{FilterState, Patch},
        index::catalog::spec::code,
    };

    #[test]
    fn max_amount_is_one_trillion() {
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_i64));
    }

    #[test]
    fn parses_amounts() {
        assert_eq!(amount(" 120.50 "), Some("120.5".parse().unwrap()));
        assert_eq!(amount("0"), None);
        assert_eq!(amount("-5"), None);
        assert_eq!(amount("abc"), None);
        assert_eq!(amount(""), None);
        assert_eq!(amount("1000000000001"), None);
    }

    #[test]
    fn parses_floors() {
        assert_eq!(floor("0"), Some(Decimal::ZERO));
        assert_eq!(floor("2"), Some(Decimal::from(2)));
        assert_eq!(floor("-1"), None);
    }

    #[test]
    fn parses_counts() {
        assert_eq!(count("3", 1..=10), Some(3));
        assert_eq!(count("0", 1..=10), None);
        assert_eq!(count("2.5", 1..=10), None);
        assert_eq!(count("11", 1..=10), None);
    }

    #[test]
    fn invalid_input_clears_field() {
        assert_eq!(NumericField::TargetArea.patch("x1"), Patch::TargetArea(None));
        assert_eq!(NumericField::MinParking.patch("-2"), Patch::MinParking(None));
        assert_eq!(
            NumericField::MaxAgeYears.patch("0"),
            Patch::MaxAgeYears(Some(0)),
        );
        assert_eq!(
            NumericField::MaxRentPrice.patch("950"),
            Patch::MaxRentPrice(Some(Decimal::from(950))),
        );
        assert_eq!("min_area".parse(), Ok(NumericField::MinArea));
    }

    #[test]
    fn clamps_out_of_range_state() {
        let mut state = FilterState::default();
        state.generic.target_area = Some(Decimal::MAX);
        state.generic.target_budget = Some(Decimal::from(250_000));
        state.basic.min_area = Some(Decimal::from(-3));
        state.basic.min_parking = Some(0);
        state.basic.max_age_years = Some(10);
        _ = state.apply(Patch::Floor {
            category: code("PARKING"),
            characteristic: 42.into(),
            floor: Some(Decimal::MAX),
        });
        _ = state.apply(Patch::TogglePresence {
            category: code("AMENITIES"),
            characteristic: 5.into(),
        });

        assert_eq!(state.clamp(), 4);

        assert_eq!(state.generic.target_area, None);
        assert_eq!(state.generic.target_budget, Some(Decimal::from(250_000)));
        assert_eq!(state.basic.min_area, None);
        assert_eq!(state.basic.min_parking, None);
        assert_eq!(state.basic.max_age_years, Some(10));
        assert_eq!(state.advanced.active_count(&code("PARKING")), 0);
        assert_eq!(state.advanced.active_count(&code("AMENITIES")), 1);
        assert_eq!(state.clamp(), 0);
    }
}
