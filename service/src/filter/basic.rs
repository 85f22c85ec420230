//! [`BasicFilter`] layer definitions.

use common::define_kind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::listing::{FinishLevel, Transaction};

/// Threshold layer of a [`FilterState`].
///
/// [`FilterState`]: super::FilterState
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BasicFilter {
    /// [`Transaction`] deciding which price cap is visible.
    pub transaction: Option<Transaction>,

    /// Highest acceptable sale price.
    pub max_sale_price: Option<Decimal>,

    /// Highest acceptable rent price.
    pub max_rent_price: Option<Decimal>,

    /// Area a listing should be close to.
    pub min_area: Option<Decimal>,

    /// Parking places a listing should roughly have, more are fine.
    pub min_parking: Option<u16>,

    /// Oldest acceptable building age in years.
    pub max_age_years: Option<u16>,

    /// Exact [`FinishLevel`] to match.
    pub finish_level: Option<FinishLevel>,
}

impl BasicFilter {
    /// Returns `max_sale_price`, if it's set and visible for the current
    /// `transaction`.
    #[must_use]
    pub fn effective_max_sale_price(&self) -> Option<Decimal> {
        self.max_sale_price
            .filter(|_| Field::MaxSalePrice.is_visible(self.transaction))
    }

    /// Returns `max_rent_price`, if it's set and visible for the current
    /// `transaction`.
    #[must_use]
    pub fn effective_max_rent_price(&self) -> Option<Decimal> {
        self.max_rent_price
            .filter(|_| Field::MaxRentPrice.is_visible(self.transaction))
    }

    /// Returns [`Field`]s visible for the current `transaction`.
    pub fn visible_fields(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| f.is_visible(self.transaction))
    }

    /// Returns the number of active constraints in this [`BasicFilter`].
    #[must_use]
    pub fn active_count(&self) -> usize {
        [
            self.effective_max_sale_price().is_some(),
            self.effective_max_rent_price().is_some(),
            self.min_area.is_some(),
            self.min_parking.is_some(),
            self.max_age_years.is_some(),
            self.finish_level.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Indicates whether this [`BasicFilter`] constrains anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active_count() > 0
    }
}

define_kind! {
    #[doc = "Field of a [`BasicFilter`]."]
    enum Field {
        #[doc = "[`BasicFilter::max_sale_price`]."]
        MaxSalePrice = 1,

        #[doc = "[`BasicFilter::max_rent_price`]."]
        MaxRentPrice = 2,

        #[doc = "[`BasicFilter::min_area`]."]
        MinArea = 3,

        #[doc = "[`BasicFilter::min_parking`]."]
        MinParking = 4,

        #[doc = "[`BasicFilter::max_age_years`]."]
        MaxAgeYears = 5,

        #[doc = "[`BasicFilter::finish_level`]."]
        FinishLevel = 6,
    }
}

impl Field {
    /// Indicates whether this [`Field`] is visible for the provided
    /// [`Transaction`].
    ///
    /// Without a [`Transaction`] both price caps are visible.
    #[must_use]
    pub fn is_visible(self, transaction: Option<Transaction>) -> bool {
        match (self, transaction) {
            (Self::MaxSalePrice, Some(Transaction::Rent))
            | (Self::MaxRentPrice, Some(Transaction::Buy)) => false,
            (
                Self::MaxSalePrice
                | Self::MaxRentPrice
                | Self::MinArea
                | Self::MinParking
                | Self::MaxAgeYears
                | Self::FinishLevel,
                _,
            ) => true,
        }
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use crate::domain::listing::Transaction;

    use super::{BasicFilter, Field};

    #[test]
    fn price_caps_follow_transaction() {
        let mut filter = BasicFilter {
            max_sale_price: Some(Decimal::from(100_000)),
            max_rent_price: Some(Decimal::from(900)),
            ..BasicFilter::default()
        };
        assert_eq!(filter.active_count(), 2);

        filter.transaction = Some(Transaction::Buy);
        assert!(filter.effective_max_sale_price().is_some());
        assert!(filter.effective_max_rent_price().is_none());
        assert!(!filter.visible_fields().any(|f| f == Field::MaxRentPrice));
        assert_eq!(filter.active_count(), 1);

        filter.transaction = Some(Transaction::Rent);
        assert!(filter.effective_max_sale_price().is_none());
        assert!(filter.effective_max_rent_price().is_some());
        assert_eq!(filter.visible_fields().count(), 5);
    }

    #[test]
    fn empty_is_inactive() {
        assert!(!BasicFilter::default().is_active());
        assert_eq!(BasicFilter::default().visible_fields().count(), 6);
    }
}
