//! Persistence of a [`FilterState`] as a session [`Document`].

use derive_more::{Display, Error as StdError, From};
use serde::{Deserialize, Serialize};
use tracing as log;

use crate::infra::storage::Document;

use super::FilterState;

/// Version of the [`Document`] format written by this crate.
pub const VERSION: u8 = 1;

/// Envelope of a [`FilterState`] being written.
#[derive(Debug, Serialize)]
struct Outgoing<'a> {
    /// Format version.
    version: u8,

    /// Persisted [`FilterState`].
    filters: &'a FilterState,
}

/// Envelope of a [`FilterState`] being read.
#[derive(Debug, Deserialize)]
struct Incoming {
    /// Format version.
    version: u8,

    /// Persisted [`FilterState`].
    #[serde(default)]
    filters: FilterState,
}

impl FilterState {
    /// Serializes this [`FilterState`] into a [`Document`].
    ///
    /// # Errors
    ///
    /// If serialization fails.
    pub fn to_document(&self) -> Result<Document, Error> {
        let json = serde_json::to_string(&Outgoing {
            version: VERSION,
            filters: self,
        })?;
        Ok(Document::from(json))
    }

    /// Deserializes a [`FilterState`] from the provided [`Document`].
    ///
    /// Out-of-range values are cleared as if they were entered as input.
    ///
    /// # Errors
    ///
    /// If the [`Document`] is malformed or of an unsupported version.
    pub fn from_document(doc: &Document) -> Result<Self, Error> {
        let Incoming {
            version,
            mut filters,
        } = serde_json::from_str(doc.as_ref())?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        let cleared = filters.clamp();
        if cleared > 0 {
            log::warn!(cleared, "cleared out-of-range persisted filters");
        }
        Ok(filters)
    }
}

/// Error of reading or writing a [`Document`].
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Document`] is not a valid JSON of the expected shape.
    #[display("malformed filters document: {_0}")]
    Json(serde_json::Error),

    /// [`Document`] is of an unsupported format version.
    #[display("unsupported filters document version: {_0}")]
    #[from(ignore)]
    UnsupportedVersion(#[error(not(source))] u8),
}

#[cfg(test)]
mod spec {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    use crate::{
        domain::listing::{FinishLevel, Transaction},
        filter::{FilterState, Patch},
        index::{catalog::spec::code, inventory::spec::listing},
        infra::storage::Document,
        predicate::{evaluate, Predicate},
    };

    use super::Error;

    #[test]
    fn restores_equivalent_state() {
        let mut state = FilterState::default();
        _ = state.apply(Patch::PropertyType(Some(2.into())));
        _ = state.apply(Patch::ToggleDistrict(7.into()));
        _ = state.apply(Patch::GenericTransaction(Some(Transaction::Buy)));
        _ = state.apply(Patch::TargetBudget(Some("150000.5".parse().unwrap())));
        _ = state.apply(Patch::MaxRentPrice(Some(Decimal::from(900))));
        _ = state.apply(Patch::MinParking(Some(2)));
        _ = state.apply(Patch::FinishLevel(FinishLevel::new("turnkey")));
        _ = state.apply(Patch::TogglePresence {
            category: code("AMENITIES"),
            characteristic: 5.into(),
        });
        _ = state.apply(Patch::Floor {
            category: code("PARKING"),
            characteristic: 42.into(),
            floor: Some(Decimal::from(2)),
        });

        let doc = state.to_document().unwrap();

        assert_eq!(FilterState::from_document(&doc).unwrap(), state);
    }

    #[test]
    fn rejects_foreign_documents() {
        let unknown = Document::from(r#"{"version":9,"filters":{}}"#.to_owned());
        assert!(matches!(
            FilterState::from_document(&unknown),
            Err(Error::UnsupportedVersion(9)),
        ));

        let garbage = Document::from("{not json".to_owned());
        assert!(matches!(
            FilterState::from_document(&garbage),
            Err(Error::Json(_)),
        ));
    }

    #[test]
    fn tolerates_missing_layers() {
        let doc = Document::from(
            r#"{"version":1,"filters":{"basic":{"minParking":3}}}"#.to_owned(),
        );

        let state = FilterState::from_document(&doc).unwrap();

        assert_eq!(state.basic.min_parking, Some(3));
        assert!(!state.generic.is_active());
        assert!(!state.advanced.is_active());
    }

    #[test]
    fn clears_overflowing_amounts() {
        let doc = Document::from(
            r#"{"version":1,"filters":{
                "generic":{"targetArea":"79228162514264337593543950335"},
                "basic":{"minArea":"79228162514264337593543950335",
                         "minParking":2}
            }}"#
            .to_owned(),
        );

        let state = FilterState::from_document(&doc).unwrap();

        assert_eq!(state.generic.target_area, None);
        assert_eq!(state.basic.min_area, None);
        assert_eq!(state.basic.min_parking, Some(2));
        assert_eq!(Predicate::compile(&state).constraints().len(), 1);
        assert!(evaluate(&listing(1), &state));
    }
}
