//! [`Source`] implementation backed by JSON files on disk.
//!
//! Layout of the root directory:
//! - `inventory.json`: array of [`Listing`]s;
//! - `catalog.json`: [`Catalog`] with optional `categoriesByPropertyType`
//!   overrides;
//! - `session/<key>.json`: stored session [`Document`]s.

use std::{
    collections::HashMap,
    io,
    path::{Path, PathBuf},
};

use common::operations::{By, Delete, Insert, Select};
use serde::Deserialize;
use tokio::fs;
use tracerr::Traced;
use tracing as log;

use super::{
    for_property_type, prefilter,
    storage::{Document, Key},
    Error, Source,
};
use crate::{
    domain::{
        catalog::{District, PropertyType, PropertyTypeId},
        characteristic::Category,
        Catalog, Listing,
    },
    filter::GenericFilter,
};

/// [`Source`] reading JSON files from a root directory.
#[derive(Clone, Debug)]
pub struct Files {
    /// Root directory of this [`Files`].
    root: PathBuf,
}

impl Files {
    /// Creates a new [`Files`] rooted at the provided directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory of this [`Files`].
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the [`Document`] stored by the provided [`Key`].
    fn document_path(&self, key: &Key) -> PathBuf {
        self.root.join("session").join(format!("{}.json", key.as_str()))
    }

    /// Reads and deserializes the JSON file at the provided relative `path`.
    async fn read_json<T>(&self, path: &str) -> Result<T, Traced<Error>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let path = self.root.join(path);
        log::debug!("reading `{}`", path.display());
        let bytes = fs::read(&path)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        serde_json::from_slice(&bytes).map_err(tracerr::from_and_wrap!(=> Error))
    }
}

/// Contents of `catalog.json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    /// Known [`District`]s.
    #[serde(default)]
    districts: Vec<District>,

    /// Known [`PropertyType`]s.
    #[serde(default)]
    property_types: Vec<PropertyType>,

    /// [`Category`]s served when no property type specific ones exist.
    #[serde(default)]
    categories: Vec<Category>,

    /// [`Category`]s specific to some property types.
    #[serde(default)]
    categories_by_property_type: HashMap<PropertyTypeId, Vec<Category>>,
}

impl Source<Select<By<Catalog, Option<PropertyTypeId>>>> for Files {
    type Ok = Catalog;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Catalog, Option<PropertyTypeId>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let CatalogFile {
            districts,
            property_types,
            categories,
            categories_by_property_type,
        } = self
            .read_json("catalog.json")
            .await
            .map_err(tracerr::wrap!())?;

        let catalog = Catalog {
            districts,
            property_types,
            categories,
        };
        Ok(for_property_type(
            catalog,
            &categories_by_property_type,
            by.into_inner(),
        ))
    }
}

impl Source<Select<By<Vec<Listing>, Option<GenericFilter>>>> for Files {
    type Ok = Vec<Listing>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Listing>, Option<GenericFilter>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let listings = self
            .read_json("inventory.json")
            .await
            .map_err(tracerr::wrap!())?;
        Ok(prefilter(listings, by.as_inner().as_ref()))
    }
}

impl Source<Select<By<Option<Document>, Key>>> for Files {
    type Ok = Option<Document>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Document>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        match fs::read_to_string(self.document_path(by.as_inner())).await {
            Ok(doc) => Ok(Some(Document::from(doc))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(tracerr::new!(Error::from(e))),
        }
    }
}

impl Source<Insert<(Key, Document)>> for Files {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Insert((key, doc)): Insert<(Key, Document)>,
    ) -> Result<Self::Ok, Self::Err> {
        let path = self.document_path(&key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(tracerr::from_and_wrap!(=> Error))?;
        }
        fs::write(&path, String::from(doc))
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
    }
}

impl Source<Delete<By<Document, Key>>> for Files {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Document, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        match fs::remove_file(self.document_path(by.as_inner())).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(tracerr::new!(Error::from(e))),
        }
    }
}

#[cfg(test)]
mod spec {
    use std::{env, process};

    use common::operations::{By, Delete, Insert, Select};
    use tokio::fs;

    use crate::{
        domain::{Catalog, Listing},
        infra::{
            storage::{Document, Key},
            Error, Source as _,
        },
    };

    use super::Files;

    /// Creates an empty temporary root directory unique for the test.
    async fn root(test: &str) -> Files {
        let dir = env::temp_dir()
            .join(format!("property-search-{}-{test}", process::id()));
        _ = fs::remove_dir_all(&dir).await;
        fs::create_dir_all(&dir).await.unwrap();
        Files::new(dir)
    }

    #[tokio::test]
    async fn reads_catalog_with_type_overrides() {
        let files = root("catalog").await;
        fs::write(
            files.root().join("catalog.json"),
            r#"{
                "districts": [{ "id": 1, "name": "Centro" }],
                "propertyTypes": [{ "id": 2, "name": "House" }],
                "categories": [{
                    "code": "AMENITIES",
                    "name": "Amenities",
                    "characteristics": [{
                        "id": 5,
                        "name": "Pool",
                        "categoryCode": "AMENITIES",
                        "inputKind": "presence"
                    }]
                }],
                "categoriesByPropertyType": {
                    "2": [{ "code": "GARDEN", "name": "Garden", "order": 3 }]
                }
            }"#,
        )
        .await
        .unwrap();

        let default = files
            .execute(Select(By::<Catalog, _>::new(None)))
            .await
            .unwrap();
        let house = files
            .execute(Select(By::<Catalog, _>::new(Some(2.into()))))
            .await
            .unwrap();

        assert_eq!(default.categories[0].characteristics.len(), 1);
        assert_eq!(house.categories[0].code.to_string(), "GARDEN");
        assert_eq!(house.districts.len(), 1);
    }

    #[tokio::test]
    async fn missing_inventory_is_an_error() {
        let files = root("inventory").await;

        let err = files
            .execute(Select(By::<Vec<Listing>, _>::new(None)))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), Error::Io(_)));
    }

    #[tokio::test]
    async fn stores_documents() {
        let files = root("session").await;
        let key = Key::new("filters").unwrap();

        let missing = files
            .execute(Select(By::<Option<Document>, _>::new(key.clone())))
            .await
            .unwrap();
        assert_eq!(missing, None);

        files
            .execute(Insert((key.clone(), Document::from("{}".to_owned()))))
            .await
            .unwrap();
        let stored = files
            .execute(Select(By::<Option<Document>, _>::new(key.clone())))
            .await
            .unwrap();
        assert_eq!(stored.as_ref().map(AsRef::as_ref), Some("{}"));

        files
            .execute(Delete(By::<Document, _>::new(key.clone())))
            .await
            .unwrap();
        files
            .execute(Delete(By::<Document, _>::new(key)))
            .await
            .unwrap();
    }
}
