//! [`Query`] definition.
//!
//! Catalog and inventory reads go straight to the [`Source`] through
//! [`SourceQuery`], while [`PersistedFilters`] decodes what it reads.

pub mod catalog;
pub mod inventory;
pub mod persisted_filters;

use std::any;

use common::operations::{By, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    infra::{self, Source},
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

pub use self::{
    catalog::Catalog, inventory::Inventory,
    persisted_filters::PersistedFilters,
};

/// [`Query`] [`Select`]ing a `T`ype from a [`Source`] as is.
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct SourceQuery<T>(T);

impl<W, B> SourceQuery<By<W, B>> {
    /// Creates a new [`SourceQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<Src, W, B> Query<SourceQuery<By<W, B>>> for Service<Src>
where
    Src: Source<Select<By<W, B>>, Ok = W, Err = Traced<infra::Error>>,
{
    type Ok = W;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        SourceQuery(by): SourceQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        log::debug!(selected = any::type_name::<W>(), "reading source");
        self.source()
            .execute(Select(by))
            .await
            .map_err(tracerr::wrap!())
    }
}
