//! [`Inventory`] definitions.

use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};

use tracing as log;

use crate::domain::{listing, Listing};

/// Immutable, catalog-ordered collection of loaded [`Listing`]s.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    /// [`Listing`]s in their original order.
    listings: Vec<Arc<Listing>>,

    /// Positions of [`Listing`]s by their IDs.
    positions: HashMap<listing::Id, usize>,
}

impl Inventory {
    /// Builds a new [`Inventory`] keeping the original order of the
    /// provided [`Listing`]s.
    ///
    /// Duplicated IDs are resolved in favor of the first occurrence.
    #[must_use]
    pub fn new(listings: impl IntoIterator<Item = Listing>) -> Self {
        let mut inventory = Self::default();
        for listing in listings {
            match inventory.positions.entry(listing.id) {
                Entry::Vacant(e) => {
                    _ = e.insert(inventory.listings.len());
                    inventory.listings.push(Arc::new(listing));
                }
                Entry::Occupied(_) => {
                    log::warn!("duplicated `Listing({})` in inventory", listing.id);
                }
            }
        }
        inventory
    }

    /// Returns all the [`Listing`]s in their original order.
    #[must_use]
    pub fn listings(&self) -> &[Arc<Listing>] {
        &self.listings
    }

    /// Returns [`Listing`] with the provided ID, if any.
    #[must_use]
    pub fn get(&self, id: listing::Id) -> Option<&Arc<Listing>> {
        self.positions.get(&id).and_then(|&i| self.listings.get(i))
    }

    /// Returns the number of [`Listing`]s in this [`Inventory`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Indicates whether this [`Inventory`] has no [`Listing`]s.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl FromIterator<Listing> for Inventory {
    fn from_iter<I: IntoIterator<Item = Listing>>(iter: I) -> Self {
        Self::new(iter)
    }
}
