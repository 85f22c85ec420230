//! Infrastructure layer.

#[cfg(feature = "files")]
pub mod files;
pub mod memory;
pub mod storage;

use std::{collections::HashMap, io};

use derive_more::{Display, Error as StdError, From};

use crate::{
    domain::{
        catalog::PropertyTypeId, characteristic::Category, Catalog, Listing,
    },
    filter::{FilterState, GenericFilter},
    predicate::Predicate,
};

#[cfg(feature = "files")]
pub use self::files::Files;
pub use self::memory::Memory;

/// Source of listings, catalogs and session documents.
pub use common::Handler as Source;

/// [`Source`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// I/O error.
    #[display("I/O error: {_0}")]
    Io(io::Error),

    /// Data of a [`Source`] is malformed.
    #[display("malformed data: {_0}")]
    Json(serde_json::Error),

    /// [`Source`] cannot serve the requested data.
    #[display("source is unavailable")]
    #[from(ignore)]
    Unavailable,
}

/// Applies the provided server-side [`GenericFilter`] (if any) to the
/// provided [`Listing`]s.
fn prefilter(
    listings: Vec<Listing>,
    generic: Option<&GenericFilter>,
) -> Vec<Listing> {
    let Some(generic) = generic.filter(|g| g.is_active()) else {
        return listings;
    };
    let predicate = Predicate::compile(&FilterState {
        generic: generic.clone(),
        ..FilterState::default()
    });
    listings
        .into_iter()
        .filter(|l| predicate.matches(l))
        .collect()
}

/// Narrows the provided [`Catalog`] down to the [`Category`]s of the
/// provided property type, if it has specific ones.
fn for_property_type(
    mut catalog: Catalog,
    specific: &HashMap<PropertyTypeId, Vec<Category>>,
    property_type: Option<PropertyTypeId>,
) -> Catalog {
    if let Some(categories) = property_type.and_then(|id| specific.get(&id)) {
        catalog.categories.clone_from(categories);
    }
    catalog
}
