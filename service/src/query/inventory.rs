//! [`Query`] of listings.

use common::operations::By;

use crate::{domain::Listing, filter::GenericFilter};
#[cfg(doc)]
use crate::Query;

use super::SourceQuery;

/// Queries all the [`Listing`]s, optionally prefiltered by the source with
/// the provided [`GenericFilter`].
pub type Inventory = SourceQuery<By<Vec<Listing>, Option<GenericFilter>>>;
