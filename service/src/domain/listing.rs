//! [`Listing`] definitions.

use std::collections::BTreeMap;

use common::define_kind;
use derive_more::{AsRef, Display, From, FromStr, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{
    catalog::{DistrictId, PropertyTypeId},
    characteristic,
};

/// Property record being searched over.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// ID of this [`Listing`].
    pub id: Id,

    /// Human-readable title of this [`Listing`].
    #[serde(default)]
    pub title: String,

    /// Latitude of this [`Listing`], if known.
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Longitude of this [`Listing`], if known.
    #[serde(default)]
    pub longitude: Option<f64>,

    /// Area of this [`Listing`] in square meters.
    pub area: Decimal,

    /// [`Prices`] this [`Listing`] is offered for.
    #[serde(default)]
    pub transaction_prices: Prices,

    /// Type of this [`Listing`].
    pub property_type_id: PropertyTypeId,

    /// District this [`Listing`] is located in.
    pub district_id: DistrictId,

    /// Age of the building in years.
    #[serde(default)]
    pub age_years: u16,

    /// Number of parking places.
    #[serde(default)]
    pub parking_count: u16,

    /// [`FinishLevel`] of this [`Listing`], if specified.
    #[serde(default)]
    pub finish_level: Option<FinishLevel>,

    /// [`Characteristics`] recorded for this [`Listing`].
    #[serde(default)]
    pub characteristics: Characteristics,
}

impl Listing {
    /// Returns [`Location`] of this [`Listing`], if both coordinates are
    /// known.
    #[must_use]
    pub fn location(&self) -> Option<Location> {
        Some(Location {
            latitude: self.latitude?,
            longitude: self.longitude?,
        })
    }
}

/// ID of a [`Listing`].
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
pub struct Id(u64);

/// Geographical location of a [`Listing`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Location {
    /// Latitude in degrees.
    pub latitude: f64,

    /// Longitude in degrees.
    pub longitude: f64,
}

define_kind! {
    #[doc = "Kind of a transaction a [`Listing`] is searched for."]
    enum Transaction {
        #[doc = "Buying a [`Listing`] for its sale price."]
        Buy = 1,

        #[doc = "Renting a [`Listing`] for its rent price."]
        Rent = 2,
    }
}

/// Prices a [`Listing`] is offered for.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prices {
    /// Sale price, if a [`Listing`] is for sale.
    #[serde(default)]
    pub sale_price: Option<Decimal>,

    /// Monthly rent price, if a [`Listing`] is for rent.
    #[serde(default)]
    pub rent_price: Option<Decimal>,
}

impl Prices {
    /// Returns the price relevant for the provided [`Transaction`].
    #[must_use]
    pub fn for_transaction(&self, transaction: Transaction) -> Option<Decimal> {
        match transaction {
            Transaction::Buy => self.sale_price,
            Transaction::Rent => self.rent_price,
        }
    }
}

/// Finish level of a [`Listing`] (`"turnkey"`, `"white_box"`, etc).
#[derive(
    AsRef, Clone, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize,
)]
#[as_ref(forward)]
#[serde(try_from = "String", into = "String")]
pub struct FinishLevel(String);

impl FinishLevel {
    /// Creates a new [`FinishLevel`] if the given `level` is valid.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Option<Self> {
        let level = level.into();
        Self::check(&level).then_some(Self(level))
    }

    /// Checks whether the given `level` is a valid [`FinishLevel`].
    fn check(level: impl AsRef<str>) -> bool {
        let level = level.as_ref();
        level.trim() == level && !level.is_empty() && level.len() <= 64
    }
}

impl std::str::FromStr for FinishLevel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `FinishLevel`")
    }
}

impl TryFrom<String> for FinishLevel {
    type Error = &'static str;

    fn try_from(level: String) -> Result<Self, Self::Error> {
        Self::new(level).ok_or("invalid `FinishLevel`")
    }
}

impl From<FinishLevel> for String {
    fn from(level: FinishLevel) -> Self {
        level.0
    }
}

/// Characteristics recorded for a [`Listing`], keyed by their
/// [`characteristic::Id`].
///
/// Serialized as a list of `{ "characteristicId", "value" }` entries.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(from = "Vec<Entry>", into = "Vec<Entry>")]
pub struct Characteristics(BTreeMap<characteristic::Id, characteristic::Value>);

impl Characteristics {
    /// Returns the recorded [`characteristic::Value`], if any.
    #[must_use]
    pub fn get(&self, id: characteristic::Id) -> Option<characteristic::Value> {
        self.0.get(&id).copied()
    }

    /// Indicates whether no characteristics are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the recorded characteristics in [`characteristic::Id`]
    /// order.
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (characteristic::Id, characteristic::Value)> + '_
    {
        self.0.iter().map(|(id, v)| (*id, *v))
    }
}

impl FromIterator<(characteristic::Id, characteristic::Value)>
    for Characteristics
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (characteristic::Id, characteristic::Value)>,
    {
        Self(iter.into_iter().collect())
    }
}

/// Serialized entry of [`Characteristics`].
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct Entry {
    /// [`characteristic::Id`] of this [`Entry`].
    characteristic_id: characteristic::Id,

    /// Recorded [`characteristic::Value`].
    value: characteristic::Value,
}

impl From<Vec<Entry>> for Characteristics {
    fn from(entries: Vec<Entry>) -> Self {
        entries
            .into_iter()
            .map(|e| (e.characteristic_id, e.value))
            .collect()
    }
}

impl From<Characteristics> for Vec<Entry> {
    fn from(chars: Characteristics) -> Self {
        chars
            .0
            .into_iter()
            .map(|(characteristic_id, value)| Entry {
                characteristic_id,
                value,
            })
            .collect()
    }
}
