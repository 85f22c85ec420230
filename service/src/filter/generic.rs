//! [`GenericFilter`] layer definitions.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    catalog::{DistrictId, PropertyTypeId},
    listing::Transaction,
};

/// "Similar listings" layer of a [`FilterState`].
///
/// Numeric targets are matched with a tolerance band rather than as
/// thresholds.
///
/// [`FilterState`]: super::FilterState
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenericFilter {
    /// Exact property type to match.
    pub property_type_id: Option<PropertyTypeId>,

    /// Districts a listing must be located in, if not empty.
    pub district_ids: BTreeSet<DistrictId>,

    /// [`Transaction`] the `target_budget` refers to.
    pub transaction: Option<Transaction>,

    /// Area a listing should be similar to.
    pub target_area: Option<Decimal>,

    /// Price a listing should be similar to.
    pub target_budget: Option<Decimal>,
}

impl GenericFilter {
    /// Returns the number of active constraints in this [`GenericFilter`].
    ///
    /// [`Transaction`] alone is not a constraint: it only selects the price
    /// the `target_budget` is compared against.
    #[must_use]
    pub fn active_count(&self) -> usize {
        [
            self.property_type_id.is_some(),
            !self.district_ids.is_empty(),
            self.target_area.is_some(),
            self.target_budget.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    /// Indicates whether this [`GenericFilter`] constrains anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active_count() > 0
    }
}
