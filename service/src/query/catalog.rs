//! [`Query`] of a [`domain::Catalog`].

use common::operations::By;

use crate::domain::{self, catalog::PropertyTypeId};
#[cfg(doc)]
use crate::Query;

use super::SourceQuery;

/// Queries a [`domain::Catalog`] of the provided property type, or the
/// general one if [`None`] is provided.
pub type Catalog = SourceQuery<By<domain::Catalog, Option<PropertyTypeId>>>;
