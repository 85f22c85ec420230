//! In-memory [`Source`] implementation.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use common::operations::{By, Delete, Insert, Select};
use tracerr::Traced;

use super::{
    for_property_type, prefilter,
    storage::{Document, Key},
    Error, Source,
};
use crate::{
    domain::{
        catalog::PropertyTypeId, characteristic::Category, Catalog, Listing,
    },
    filter::GenericFilter,
};

/// In-memory [`Source`].
///
/// Missing catalog or listings make the corresponding selections fail with
/// [`Error::Unavailable`]. Clones share the same stored [`Document`]s.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// [`Catalog`] served by this [`Memory`].
    catalog: Option<Catalog>,

    /// [`Category`]s specific to some property types.
    categories: HashMap<PropertyTypeId, Vec<Category>>,

    /// [`Listing`]s served by this [`Memory`].
    listings: Option<Vec<Listing>>,

    /// Stored session [`Document`]s.
    documents: Arc<Mutex<HashMap<Key, Document>>>,
}

impl Memory {
    /// Serves the provided [`Catalog`].
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Serves the provided [`Category`]s for the provided property type
    /// instead of the [`Catalog`] ones.
    #[must_use]
    pub fn with_categories(
        mut self,
        property_type: PropertyTypeId,
        categories: Vec<Category>,
    ) -> Self {
        _ = self.categories.insert(property_type, categories);
        self
    }

    /// Serves the provided [`Listing`]s.
    #[must_use]
    pub fn with_listings(
        mut self,
        listings: impl IntoIterator<Item = Listing>,
    ) -> Self {
        self.listings = Some(listings.into_iter().collect());
        self
    }

    /// Returns the stored [`Document`] by its [`Key`], if any.
    #[must_use]
    pub fn document(&self, key: &Key) -> Option<Document> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl Source<Select<By<Catalog, Option<PropertyTypeId>>>> for Memory {
    type Ok = Catalog;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Catalog, Option<PropertyTypeId>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let catalog = self
            .catalog
            .clone()
            .ok_or_else(|| tracerr::new!(Error::Unavailable))?;
        Ok(for_property_type(catalog, &self.categories, by.into_inner()))
    }
}

impl Source<Select<By<Vec<Listing>, Option<GenericFilter>>>> for Memory {
    type Ok = Vec<Listing>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Listing>, Option<GenericFilter>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let listings = self
            .listings
            .clone()
            .ok_or_else(|| tracerr::new!(Error::Unavailable))?;
        Ok(prefilter(listings, by.as_inner().as_ref()))
    }
}

impl Source<Select<By<Option<Document>, Key>>> for Memory {
    type Ok = Option<Document>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Document>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.document(by.as_inner()))
    }
}

impl Source<Insert<(Key, Document)>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert((key, doc)): Insert<(Key, Document)>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, doc);
        Ok(())
    }
}

impl Source<Delete<By<Document, Key>>> for Memory {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Document, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        _ = self
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(by.as_inner());
        Ok(())
    }
}
