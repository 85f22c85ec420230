//! [`Characteristic`] definitions.

use common::define_kind;
use derive_more::{AsRef, Display, From, FromStr, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog entry describing a filterable facet of a listing.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Characteristic {
    /// ID of this [`Characteristic`].
    pub id: Id,

    /// Display name of this [`Characteristic`].
    pub name: String,

    /// [`CategoryCode`] this [`Characteristic`] is grouped under.
    pub category_code: CategoryCode,

    /// [`InputKind`] of this [`Characteristic`].
    pub input_kind: InputKind,

    /// Unit of numeric values (`"m²"`, `"pcs"`), if any.
    #[serde(default)]
    pub unit: Option<String>,
}

impl Characteristic {
    /// Indicates whether the provided [`Value`] fits the [`InputKind`] of
    /// this [`Characteristic`].
    #[must_use]
    pub fn accepts(&self, value: Value) -> bool {
        value.kind() == self.input_kind
    }
}

/// ID of a [`Characteristic`].
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
pub struct Id(u32);

define_kind! {
    #[doc = "Kind of input a [`Characteristic`] is filtered with."]
    enum InputKind {
        #[doc = "Mere presence of a [`Characteristic`] matters."]
        Presence = 1,

        #[doc = "Recorded amount of a [`Characteristic`] is compared."]
        Numeric = 2,
    }
}

/// Value of a [`Characteristic`].
///
/// Serialized as `true` for [`Value::Presence`] and as a number for
/// [`Value::Numeric`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "Repr", into = "Repr")]
pub enum Value {
    /// [`Characteristic`] is present.
    Presence,

    /// [`Characteristic`] is present with the provided amount.
    Numeric(Decimal),
}

impl Value {
    /// Returns [`InputKind`] this [`Value`] belongs to.
    #[must_use]
    pub const fn kind(self) -> InputKind {
        match self {
            Self::Presence => InputKind::Presence,
            Self::Numeric(_) => InputKind::Numeric,
        }
    }
}

/// Serialized representation of a [`Value`].
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(untagged)]
enum Repr {
    /// `true` for [`Value::Presence`].
    Flag(bool),

    /// Amount for [`Value::Numeric`].
    #[serde(with = "rust_decimal::serde::float")]
    Amount(Decimal),
}

impl TryFrom<Repr> for Value {
    type Error = &'static str;

    fn try_from(repr: Repr) -> Result<Self, Self::Error> {
        match repr {
            Repr::Flag(true) => Ok(Self::Presence),
            Repr::Flag(false) => Err("absent characteristic has no `Value`"),
            Repr::Amount(amount) => Ok(Self::Numeric(amount)),
        }
    }
}

impl From<Value> for Repr {
    fn from(value: Value) -> Self {
        match value {
            Value::Presence => Self::Flag(true),
            Value::Numeric(amount) => Self::Amount(amount),
        }
    }
}

/// Named group of [`Characteristic`]s.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// [`CategoryCode`] of this [`Category`].
    pub code: CategoryCode,

    /// Display name of this [`Category`].
    pub name: String,

    /// Display order of this [`Category`], ascending.
    #[serde(default)]
    pub order: u32,

    /// [`Characteristic`]s grouped under this [`Category`].
    #[serde(default)]
    pub characteristics: Vec<Characteristic>,
}

/// Code of a [`Category`] (`"PARKING"`, `"AMENITIES"`).
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[as_ref(forward)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryCode(String);

impl CategoryCode {
    /// Creates a new [`CategoryCode`] if the given `code` is valid.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        Self::check(&code).then_some(Self(code))
    }

    /// Checks whether the given `code` is a valid [`CategoryCode`].
    fn check(code: impl AsRef<str>) -> bool {
        let code = code.as_ref();
        code.trim() == code && !code.is_empty() && code.len() <= 64
    }
}

impl std::str::FromStr for CategoryCode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `CategoryCode`")
    }
}

impl TryFrom<String> for CategoryCode {
    type Error = &'static str;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Self::new(code).ok_or("invalid `CategoryCode`")
    }
}

impl From<CategoryCode> for String {
    fn from(code: CategoryCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use super::{CategoryCode, InputKind, Value};

    #[test]
    fn value_representation() {
        assert_eq!(
            serde_json::from_value::<Value>(json!(true)).unwrap(),
            Value::Presence,
        );
        assert_eq!(
            serde_json::from_value::<Value>(json!(2.5)).unwrap(),
            Value::Numeric("2.5".parse().unwrap()),
        );
        assert!(serde_json::from_value::<Value>(json!(false)).is_err());

        assert_eq!(serde_json::to_value(Value::Presence).unwrap(), json!(true));
        assert_eq!(
            serde_json::to_value(Value::Numeric(3.into())).unwrap(),
            json!(3.0),
        );
    }

    #[test]
    fn parses_category_codes() {
        assert_eq!(
            "PARKING".parse::<CategoryCode>().ok(),
            CategoryCode::new("PARKING"),
        );
        assert!("".parse::<CategoryCode>().is_err());
        assert!(" PARKING".parse::<CategoryCode>().is_err());
    }

    #[test]
    fn value_kind() {
        assert_eq!(Value::Presence.kind(), InputKind::Presence);
        assert_eq!(Value::Numeric(1.into()).kind(), InputKind::Numeric);
    }
}
