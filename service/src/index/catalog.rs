//! [`CatalogIndex`] definitions.

use std::collections::{hash_map::Entry, HashMap, HashSet};

use tracing as log;

use crate::domain::{
    catalog::{District, DistrictId, PropertyType, PropertyTypeId},
    characteristic::{self, Category, CategoryCode},
    Catalog, Characteristic,
};

/// Immutable index over a loaded [`Catalog`].
///
/// An empty [`CatalogIndex`] means no advanced facets are available, which
/// doesn't prevent filtering by other criteria.
#[derive(Clone, Debug, Default)]
pub struct CatalogIndex {
    /// Known [`District`]s by their IDs.
    districts: HashMap<DistrictId, District>,

    /// Known [`PropertyType`]s by their IDs.
    property_types: HashMap<PropertyTypeId, PropertyType>,

    /// [`Characteristic`]s by their IDs.
    characteristics: HashMap<characteristic::Id, Characteristic>,

    /// [`Category`]s sorted by their display order.
    categories: Vec<Category>,
}

impl CatalogIndex {
    /// Builds a new [`CatalogIndex`] out of the provided [`Catalog`].
    ///
    /// Duplicated IDs are resolved in favor of the first occurrence.
    /// [`Characteristic`]s are re-homed into the [`Category`] they are
    /// listed under.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        let Catalog {
            districts,
            property_types,
            mut categories,
        } = catalog;

        let mut index = Self::default();

        for d in districts {
            if let Entry::Vacant(e) = index.districts.entry(d.id) {
                _ = e.insert(d);
            } else {
                log::warn!("duplicated `District({})` in catalog", d.id);
            }
        }
        for t in property_types {
            if let Entry::Vacant(e) = index.property_types.entry(t.id) {
                _ = e.insert(t);
            } else {
                log::warn!("duplicated `PropertyType({})` in catalog", t.id);
            }
        }

        let mut seen = HashSet::new();
        categories.retain(|c| {
            let fresh = seen.insert(c.code.clone());
            if !fresh {
                log::warn!("duplicated `Category({})` in catalog", c.code);
            }
            fresh
        });
        categories.sort_by(|a, b| {
            a.order.cmp(&b.order).then_with(|| a.code.cmp(&b.code))
        });
        for category in &mut categories {
            category.characteristics.retain_mut(|c| {
                if c.category_code != category.code {
                    log::warn!(
                        "`Characteristic({})` of `{}` category is listed \
                         under `{}`",
                        c.id,
                        c.category_code,
                        category.code,
                    );
                    c.category_code = category.code.clone();
                }
                match index.characteristics.entry(c.id) {
                    Entry::Vacant(e) => {
                        _ = e.insert(c.clone());
                        true
                    }
                    Entry::Occupied(_) => {
                        log::warn!(
                            "duplicated `Characteristic({})` in catalog",
                            c.id,
                        );
                        false
                    }
                }
            });
        }
        index.categories = categories;

        index
    }

    /// Indicates whether no advanced facets are available.
    #[must_use]
    pub fn has_no_facets(&self) -> bool {
        self.characteristics.is_empty()
    }

    /// Indicates whether any [`District`] is known.
    #[must_use]
    pub fn has_districts(&self) -> bool {
        !self.districts.is_empty()
    }

    /// Indicates whether any [`PropertyType`] is known.
    #[must_use]
    pub fn has_property_types(&self) -> bool {
        !self.property_types.is_empty()
    }

    /// Returns [`Category`]s sorted by their display order.
    #[must_use]
    pub fn categories_ordered(&self) -> &[Category] {
        &self.categories
    }

    /// Returns [`Category`] with the provided [`CategoryCode`], if any.
    #[must_use]
    pub fn category(&self, code: &CategoryCode) -> Option<&Category> {
        self.categories.iter().find(|c| &c.code == code)
    }

    /// Returns [`Characteristic`] with the provided ID, if any.
    #[must_use]
    pub fn characteristic(
        &self,
        id: characteristic::Id,
    ) -> Option<&Characteristic> {
        self.characteristics.get(&id)
    }

    /// Returns [`District`] with the provided ID, if any.
    #[must_use]
    pub fn district(&self, id: DistrictId) -> Option<&District> {
        self.districts.get(&id)
    }

    /// Returns [`PropertyType`] with the provided ID, if any.
    #[must_use]
    pub fn property_type(&self, id: PropertyTypeId) -> Option<&PropertyType> {
        self.property_types.get(&id)
    }
}

#[cfg(test)]
pub(crate) mod spec {
    use crate::domain::{
        catalog::{District, PropertyType},
        characteristic::{Category, CategoryCode, InputKind},
        Catalog, Characteristic,
    };

    use super::CatalogIndex;

    pub(crate) fn code(s: &str) -> CategoryCode {
        CategoryCode::new(s).unwrap()
    }

    pub(crate) fn characteristic(
        id: u32,
        category: &str,
        kind: InputKind,
    ) -> Characteristic {
        Characteristic {
            id: id.into(),
            name: format!("characteristic #{id}"),
            category_code: code(category),
            input_kind: kind,
            unit: None,
        }
    }

    /// [`Catalog`] with `AMENITIES` (presence `5`, `6`) and `PARKING`
    /// (numeric `42`) categories, two districts and two property types.
    pub(crate) fn catalog() -> Catalog {
        Catalog {
            districts: vec![
                District {
                    id: 1.into(),
                    name: "Centro".into(),
                },
                District {
                    id: 2.into(),
                    name: "Norte".into(),
                },
            ],
            property_types: vec![
                PropertyType {
                    id: 1.into(),
                    name: "Apartment".into(),
                },
                PropertyType {
                    id: 2.into(),
                    name: "House".into(),
                },
            ],
            categories: vec![
                Category {
                    code: code("PARKING"),
                    name: "Parking".into(),
                    order: 2,
                    characteristics: vec![characteristic(
                        42,
                        "PARKING",
                        InputKind::Numeric,
                    )],
                },
                Category {
                    code: code("AMENITIES"),
                    name: "Amenities".into(),
                    order: 1,
                    characteristics: vec![
                        characteristic(5, "AMENITIES", InputKind::Presence),
                        characteristic(6, "AMENITIES", InputKind::Presence),
                    ],
                },
            ],
        }
    }

    #[test]
    fn orders_categories() {
        let index = CatalogIndex::new(catalog());

        let codes = index
            .categories_ordered()
            .iter()
            .map(|c| c.code.to_string())
            .collect::<Vec<_>>();
        assert_eq!(codes, ["AMENITIES", "PARKING"]);
    }

    #[test]
    fn looks_up_by_id() {
        let index = CatalogIndex::new(catalog());

        assert_eq!(
            index.characteristic(42.into()).map(|c| c.input_kind),
            Some(InputKind::Numeric),
        );
        assert!(index.characteristic(43.into()).is_none());
        assert!(index.district(2.into()).is_some());
        assert!(index.district(3.into()).is_none());
        assert!(index.property_type(1.into()).is_some());
        assert!(index.category(&code("PARKING")).is_some());
        assert!(!index.has_no_facets());
    }

    #[test]
    fn rehomes_and_dedups_characteristics() {
        let mut catalog = catalog();
        catalog.categories[0]
            .characteristics
            .push(characteristic(5, "AMENITIES", InputKind::Presence));
        catalog.categories[0]
            .characteristics
            .push(characteristic(7, "AMENITIES", InputKind::Numeric));

        let index = CatalogIndex::new(catalog);

        assert_eq!(
            index.characteristic(7.into()).map(|c| c.category_code.clone()),
            Some(code("PARKING")),
        );
        assert_eq!(
            index.characteristic(5.into()).map(|c| c.category_code.clone()),
            Some(code("AMENITIES")),
        );
    }

    #[test]
    fn keeps_first_of_duplicated_categories() {
        let mut catalog = catalog();
        catalog.categories.push(Category {
            code: code("PARKING"),
            name: "Parking (stale)".into(),
            order: 0,
            characteristics: vec![characteristic(
                43,
                "PARKING",
                InputKind::Numeric,
            )],
        });

        let index = CatalogIndex::new(catalog);

        let names = index
            .categories_ordered()
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["Amenities", "Parking"]);
        assert!(index.characteristic(42.into()).is_some());
        assert!(index.characteristic(43.into()).is_none());
    }

    #[test]
    fn empty_catalog_has_no_facets() {
        let index = CatalogIndex::default();

        assert!(index.has_no_facets());
        assert!(index.categories_ordered().is_empty());
    }
}
