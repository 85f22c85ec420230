//! [`AdvancedFilter`] layer definitions.

use std::collections::{btree_map, BTreeMap};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::characteristic::{self, CategoryCode, Value};

/// Active entries of a single category.
type Entries = BTreeMap<characteristic::Id, Value>;

/// Catalog-driven layer of a [`FilterState`].
///
/// Keeps active characteristic entries grouped by their [`CategoryCode`].
/// A category without active entries is never retained, so this layer is
/// active if and only if it has some category.
///
/// [`FilterState`]: super::FilterState
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(
    from = "BTreeMap<CategoryCode, Entries>",
    into = "BTreeMap<CategoryCode, Entries>"
)]
pub struct AdvancedFilter(BTreeMap<CategoryCode, Entries>);

impl AdvancedFilter {
    /// Toggles a presence-kind characteristic, returning whether it's active
    /// afterwards.
    pub fn toggle_presence(
        &mut self,
        category: &CategoryCode,
        id: characteristic::Id,
    ) -> bool {
        if self.get(category, id) == Some(Value::Presence) {
            _ = self.remove(category, id);
            false
        } else {
            self.set(category.clone(), id, Value::Presence);
            true
        }
    }

    /// Sets the numeric floor of a numeric-kind characteristic, or clears it
    /// if [`None`] is provided.
    pub fn set_floor(
        &mut self,
        category: &CategoryCode,
        id: characteristic::Id,
        floor: Option<Decimal>,
    ) {
        match floor {
            Some(floor) => {
                self.set(category.clone(), id, Value::Numeric(floor));
            }
            None => {
                _ = self.remove(category, id);
            }
        }
    }

    /// Sets the provided entry, replacing the existing one (if any).
    pub fn set(
        &mut self,
        category: CategoryCode,
        id: characteristic::Id,
        value: Value,
    ) {
        _ = self.0.entry(category).or_default().insert(id, value);
    }

    /// Removes the provided entry, dropping its category if it becomes
    /// empty.
    pub fn remove(
        &mut self,
        category: &CategoryCode,
        id: characteristic::Id,
    ) -> Option<Value> {
        let entries = self.0.get_mut(category)?;
        let removed = entries.remove(&id);
        if entries.is_empty() {
            _ = self.0.remove(category);
        }
        removed
    }

    /// Returns the active [`Value`] of the provided entry, if any.
    #[must_use]
    pub fn get(
        &self,
        category: &CategoryCode,
        id: characteristic::Id,
    ) -> Option<Value> {
        self.0.get(category)?.get(&id).copied()
    }

    /// Removes all the entries of the provided category.
    pub fn clear_category(&mut self, category: &CategoryCode) -> usize {
        self.0.remove(category).map_or(0, |e| e.len())
    }

    /// Removes all the entries.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Keeps only the entries satisfying the provided predicate, dropping
    /// emptied categories.
    ///
    /// Returns the number of removed entries.
    pub fn retain(
        &mut self,
        mut keep: impl FnMut(&CategoryCode, characteristic::Id, Value) -> bool,
    ) -> usize {
        let mut removed = 0;
        self.0.retain(|code, entries| {
            entries.retain(|id, value| {
                let kept = keep(code, *id, *value);
                if !kept {
                    removed += 1;
                }
                kept
            });
            !entries.is_empty()
        });
        removed
    }

    /// Returns the number of active entries in the provided category.
    #[must_use]
    pub fn active_count(&self, category: &CategoryCode) -> usize {
        self.0.get(category).map_or(0, BTreeMap::len)
    }

    /// Returns the number of active entries per category having some.
    pub fn counts(&self) -> impl Iterator<Item = (&CategoryCode, usize)> {
        self.0.iter().map(|(code, e)| (code, e.len()))
    }

    /// Returns the total number of active entries.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    /// Indicates whether this [`AdvancedFilter`] constrains anything.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.0.is_empty()
    }

    /// Iterates over all the active entries.
    pub fn entries(
        &self,
    ) -> impl Iterator<Item = (&CategoryCode, characteristic::Id, Value)> {
        self.0.iter().flat_map(|(code, entries)| {
            entries.iter().map(move |(id, value)| (code, *id, *value))
        })
    }
}

impl From<BTreeMap<CategoryCode, Entries>> for AdvancedFilter {
    fn from(mut categories: BTreeMap<CategoryCode, Entries>) -> Self {
        categories.retain(|_, entries| !entries.is_empty());
        Self(categories)
    }
}

impl From<AdvancedFilter> for BTreeMap<CategoryCode, Entries> {
    fn from(filter: AdvancedFilter) -> Self {
        filter.0
    }
}

impl<'a> IntoIterator for &'a AdvancedFilter {
    type Item = (&'a CategoryCode, &'a Entries);
    type IntoIter = btree_map::Iter<'a, CategoryCode, Entries>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::{
        domain::characteristic::Value, index::catalog::spec::code,
    };

    use super::AdvancedFilter;

    #[test]
    fn toggling_last_entry_prunes_category() {
        let amenities = code("AMENITIES");
        let mut filter = AdvancedFilter::default();

        assert!(filter.toggle_presence(&amenities, 5.into()));
        assert!(filter.toggle_presence(&amenities, 6.into()));
        assert_eq!(filter.active_count(&amenities), 2);

        assert!(!filter.toggle_presence(&amenities, 5.into()));
        assert_eq!(filter.active_count(&amenities), 1);
        assert!(filter.is_active());

        assert!(!filter.toggle_presence(&amenities, 6.into()));
        assert_eq!(filter.active_count(&amenities), 0);
        assert_eq!(filter.counts().count(), 0);
        assert!(!filter.is_active());
    }

    #[test]
    fn clearing_floor_prunes_category() {
        let parking = code("PARKING");
        let mut filter = AdvancedFilter::default();

        filter.set_floor(&parking, 42.into(), Some(Decimal::from(2)));
        assert_eq!(
            filter.get(&parking, 42.into()),
            Some(Value::Numeric(Decimal::from(2))),
        );

        filter.set_floor(&parking, 42.into(), Some(Decimal::from(3)));
        assert_eq!(filter.total_count(), 1);

        filter.set_floor(&parking, 42.into(), None);
        assert!(!filter.is_active());
        assert!(filter.remove(&parking, 42.into()).is_none());
    }

    #[test]
    fn retain_drops_emptied_categories() {
        let mut filter = AdvancedFilter::default();
        filter.set(code("AMENITIES"), 5.into(), Value::Presence);
        filter.set(code("PARKING"), 42.into(), Value::Numeric(1.into()));

        let parking = code("PARKING");
        let removed = filter.retain(|c, _, _| *c != parking);

        assert_eq!(removed, 1);
        assert_eq!(filter.counts().collect::<Vec<_>>().len(), 1);
        assert_eq!(filter.active_count(&parking), 0);
    }

    #[test]
    fn deserialization_drops_empty_categories() {
        let filter: AdvancedFilter = serde_json::from_value(json!({
            "AMENITIES": { "5": true },
            "PARKING": {},
        }))
        .unwrap();

        assert_eq!(filter.total_count(), 1);
        assert_eq!(filter.counts().count(), 1);
    }
}
