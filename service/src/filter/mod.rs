//! [`FilterState`] definitions.

pub mod advanced;
pub mod basic;
pub mod generic;
pub mod input;
pub mod persist;
pub mod share;
pub mod store;

use std::collections::BTreeSet;

use common::define_kind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        catalog::{DistrictId, PropertyTypeId},
        characteristic::{self, CategoryCode},
        listing::{FinishLevel, Transaction},
    },
    index::CatalogIndex,
};

pub use self::{
    advanced::AdvancedFilter, basic::BasicFilter, generic::GenericFilter,
    input::NumericField, store::Store,
};

/// Three independent filter layers, combined by logical AND.
///
/// An inactive layer doesn't constrain anything.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct FilterState {
    /// [`GenericFilter`] layer.
    pub generic: GenericFilter,

    /// [`BasicFilter`] layer.
    pub basic: BasicFilter,

    /// [`AdvancedFilter`] layer.
    pub advanced: AdvancedFilter,
}

impl FilterState {
    /// Returns the total number of active constraints across all layers.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.generic.active_count()
            + self.basic.active_count()
            + self.advanced.total_count()
    }

    /// Indicates whether any layer constrains anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.generic.is_active()
            || self.basic.is_active()
            || self.advanced.is_active()
    }

    /// Indicates whether the provided [`Layer`] constrains anything.
    #[must_use]
    pub fn is_layer_active(&self, layer: Layer) -> bool {
        match layer {
            Layer::Generic => self.generic.is_active(),
            Layer::Basic => self.basic.is_active(),
            Layer::Advanced => self.advanced.is_active(),
        }
    }

    /// Applies the provided [`Patch`], returning whether this [`FilterState`]
    /// has changed.
    pub fn apply(&mut self, patch: Patch) -> bool {
        let before = self.clone();
        match patch {
            Patch::PropertyType(id) => self.generic.property_type_id = id,
            Patch::ToggleDistrict(id) => {
                if !self.generic.district_ids.remove(&id) {
                    _ = self.generic.district_ids.insert(id);
                }
            }
            Patch::Districts(ids) => self.generic.district_ids = ids,
            Patch::GenericTransaction(t) => self.generic.transaction = t,
            Patch::TargetArea(v) => self.generic.target_area = v,
            Patch::TargetBudget(v) => self.generic.target_budget = v,
            Patch::BasicTransaction(t) => self.basic.transaction = t,
            Patch::MaxSalePrice(v) => self.basic.max_sale_price = v,
            Patch::MaxRentPrice(v) => self.basic.max_rent_price = v,
            Patch::MinArea(v) => self.basic.min_area = v,
            Patch::MinParking(v) => self.basic.min_parking = v,
            Patch::MaxAgeYears(v) => self.basic.max_age_years = v,
            Patch::FinishLevel(v) => self.basic.finish_level = v,
            Patch::TogglePresence {
                category,
                characteristic,
            } => {
                _ = self.advanced.toggle_presence(&category, characteristic);
            }
            Patch::Floor {
                category,
                characteristic,
                floor,
            } => self.advanced.set_floor(&category, characteristic, floor),
            Patch::ClearCategory(code) => {
                _ = self.advanced.clear_category(&code);
            }
            Patch::Generic(generic) => self.generic = generic,
            Patch::ClearLayer(Layer::Generic) => {
                self.generic = GenericFilter::default();
            }
            Patch::ClearLayer(Layer::Basic) => {
                self.basic = BasicFilter::default();
            }
            Patch::ClearLayer(Layer::Advanced) => self.advanced.clear(),
            Patch::Reset => *self = Self::default(),
        }
        *self != before
    }

    /// Drops references to districts, property types and characteristics
    /// unknown to the provided [`CatalogIndex`].
    ///
    /// Districts and property types are checked only if the
    /// [`CatalogIndex`] lists some. Advanced entries are kept only if their
    /// characteristic is known, belongs to the same category and accepts the
    /// entry's value kind.
    pub fn prune(&mut self, index: &CatalogIndex) -> Pruned {
        let mut pruned = Pruned::default();

        if index.has_districts() {
            let before = self.generic.district_ids.len();
            self.generic
                .district_ids
                .retain(|id| index.district(*id).is_some());
            pruned.districts = before - self.generic.district_ids.len();
        }

        if index.has_property_types() {
            if let Some(id) = self.generic.property_type_id {
                if index.property_type(id).is_none() {
                    self.generic.property_type_id = None;
                    pruned.property_type = true;
                }
            }
        }

        pruned.characteristics = self.advanced.retain(|code, id, value| {
            index.characteristic(id).is_some_and(|c| {
                &c.category_code == code && c.accepts(value)
            })
        });

        pruned
    }
}

define_kind! {
    #[doc = "Layer of a [`FilterState`]."]
    enum Layer {
        #[doc = "[`GenericFilter`] layer."]
        Generic = 1,

        #[doc = "[`BasicFilter`] layer."]
        Basic = 2,

        #[doc = "[`AdvancedFilter`] layer."]
        Advanced = 3,
    }
}

/// Single mutation of a [`FilterState`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Patch {
    /// Sets [`GenericFilter::property_type_id`].
    PropertyType(Option<PropertyTypeId>),

    /// Adds the district to [`GenericFilter::district_ids`], or removes it if
    /// it's there already.
    ToggleDistrict(DistrictId),

    /// Replaces [`GenericFilter::district_ids`].
    Districts(BTreeSet<DistrictId>),

    /// Sets [`GenericFilter::transaction`].
    GenericTransaction(Option<Transaction>),

    /// Sets [`GenericFilter::target_area`].
    TargetArea(Option<Decimal>),

    /// Sets [`GenericFilter::target_budget`].
    TargetBudget(Option<Decimal>),

    /// Sets [`BasicFilter::transaction`].
    BasicTransaction(Option<Transaction>),

    /// Sets [`BasicFilter::max_sale_price`].
    MaxSalePrice(Option<Decimal>),

    /// Sets [`BasicFilter::max_rent_price`].
    MaxRentPrice(Option<Decimal>),

    /// Sets [`BasicFilter::min_area`].
    MinArea(Option<Decimal>),

    /// Sets [`BasicFilter::min_parking`].
    MinParking(Option<u16>),

    /// Sets [`BasicFilter::max_age_years`].
    MaxAgeYears(Option<u16>),

    /// Sets [`BasicFilter::finish_level`].
    FinishLevel(Option<FinishLevel>),

    /// Toggles a presence-kind advanced characteristic.
    TogglePresence {
        /// Category of the characteristic.
        category: CategoryCode,

        /// ID of the characteristic.
        characteristic: characteristic::Id,
    },

    /// Sets or clears a numeric floor of an advanced characteristic.
    Floor {
        /// Category of the characteristic.
        category: CategoryCode,

        /// ID of the characteristic.
        characteristic: characteristic::Id,

        /// Floor to set, or [`None`] to clear.
        floor: Option<Decimal>,
    },

    /// Clears all the advanced entries of a category.
    ClearCategory(CategoryCode),

    /// Replaces the whole [`GenericFilter`] layer.
    Generic(GenericFilter),

    /// Clears the provided [`Layer`].
    ClearLayer(Layer),

    /// Clears all the layers.
    Reset,
}

/// Report of [`FilterState::prune()`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Pruned {
    /// Number of dropped district IDs.
    pub districts: usize,

    /// Indicator whether the property type was dropped.
    pub property_type: bool,

    /// Number of dropped advanced entries.
    pub characteristics: usize,
}

impl Pruned {
    /// Indicates whether nothing was pruned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.districts == 0 && !self.property_type && self.characteristics == 0
    }
}

#[cfg(test)]
mod spec {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use crate::{
        domain::characteristic::Value,
        index::{
            catalog::spec::{catalog, code},
            CatalogIndex,
        },
    };

    use super::{FilterState, Layer, Patch, Pruned};

    #[test]
    fn reports_changes() {
        let mut state = FilterState::default();

        assert!(state.apply(Patch::TargetArea(Some(Decimal::from(100)))));
        assert!(!state.apply(Patch::TargetArea(Some(Decimal::from(100)))));
        assert!(state.apply(Patch::ToggleDistrict(3.into())));
        assert!(state.apply(Patch::ToggleDistrict(3.into())));
        assert!(state.generic.district_ids.is_empty());
        assert!(!state.apply(Patch::ClearLayer(Layer::Advanced)));
        assert!(state.apply(Patch::Reset));
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn counts_active_constraints() {
        let mut state = FilterState::default();
        assert!(!state.is_active());

        _ = state.apply(Patch::PropertyType(Some(1.into())));
        _ = state.apply(Patch::MinParking(Some(2)));
        _ = state.apply(Patch::TogglePresence {
            category: code("AMENITIES"),
            characteristic: 5.into(),
        });

        assert_eq!(state.active_count(), 3);
        assert!(state.is_layer_active(Layer::Generic));
        assert!(state.is_layer_active(Layer::Basic));
        assert!(state.is_layer_active(Layer::Advanced));

        _ = state.apply(Patch::ClearLayer(Layer::Basic));
        assert!(!state.is_layer_active(Layer::Basic));
        assert_eq!(state.active_count(), 2);
    }

    #[test]
    fn prunes_stale_references() {
        let index = CatalogIndex::new(catalog());
        let mut state = FilterState::default();
        _ = state.apply(Patch::PropertyType(Some(9.into())));
        _ = state.apply(Patch::ToggleDistrict(1.into()));
        _ = state.apply(Patch::ToggleDistrict(77.into()));
        state.advanced.set(code("AMENITIES"), 5.into(), Value::Presence);
        state.advanced.set(code("AMENITIES"), 404.into(), Value::Presence);
        state.advanced.set(code("GONE"), 6.into(), Value::Presence);
        state
            .advanced
            .set(code("PARKING"), 42.into(), Value::Presence);

        let pruned = state.prune(&index);

        assert_eq!(
            pruned,
            Pruned {
                districts: 1,
                property_type: true,
                characteristics: 3,
            },
        );
        assert_eq!(state.generic.district_ids.len(), 1);
        assert_eq!(state.generic.property_type_id, None);
        assert_eq!(state.advanced.total_count(), 1);
        assert_eq!(state.advanced.active_count(&code("PARKING")), 0);
    }

    #[test]
    fn keeps_ids_when_catalog_lists_none() {
        let mut state = FilterState::default();
        _ = state.apply(Patch::ToggleDistrict(77.into()));

        let pruned = state.prune(&CatalogIndex::default());

        assert!(pruned.is_empty());
        assert_eq!(state.generic.district_ids.len(), 1);
    }
}
