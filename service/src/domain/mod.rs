//! Domain definitions.

pub mod catalog;
pub mod characteristic;
pub mod listing;

pub use self::{
    catalog::Catalog, characteristic::Characteristic, listing::Listing,
};
