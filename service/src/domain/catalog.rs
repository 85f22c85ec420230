//! [`Catalog`] definitions.

use derive_more::{Display, From, FromStr, Into};
use serde::{Deserialize, Serialize};

use super::characteristic::Category;

/// Reference data listings are filtered against.
///
/// [`Category`]s are specific to the property type the [`Catalog`] was
/// loaded for.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    /// Known [`District`]s.
    #[serde(default)]
    pub districts: Vec<District>,

    /// Known [`PropertyType`]s.
    #[serde(default)]
    pub property_types: Vec<PropertyType>,

    /// [`Category`]s of advanced characteristics.
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// District a listing is located in.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct District {
    /// ID of this [`District`].
    pub id: DistrictId,

    /// Display name of this [`District`].
    pub name: String,
}

/// ID of a [`District`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct DistrictId(u32);

/// Type of a listing (apartment, house, office).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PropertyType {
    /// ID of this [`PropertyType`].
    pub id: PropertyTypeId,

    /// Display name of this [`PropertyType`].
    pub name: String,
}

/// ID of a [`PropertyType`].
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(transparent)]
pub struct PropertyTypeId(u32);
