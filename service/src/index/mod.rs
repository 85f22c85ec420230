//! Lookup structures built once over the loaded reference data.

pub mod catalog;
pub mod inventory;

pub use self::{catalog::CatalogIndex, inventory::Inventory};
