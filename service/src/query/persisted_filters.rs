//! [`Query`] of the persisted [`FilterState`].

use common::operations::{By, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    filter::FilterState,
    infra::{
        self,
        storage::{Document, Key},
        Source,
    },
    Service,
};

use super::Query;

/// Queries the [`FilterState`] persisted by the previous session, if any.
///
/// Unreadable [`Document`]s are treated as absent.
#[derive(Clone, Copy, Debug, Default)]
pub struct PersistedFilters;

impl<Src> Query<PersistedFilters> for Service<Src>
where
    Src: Source<
        Select<By<Option<Document>, Key>>,
        Ok = Option<Document>,
        Err = Traced<infra::Error>,
    >,
{
    type Ok = Option<FilterState>;
    type Err = Traced<infra::Error>;

    async fn execute(
        &self,
        _: PersistedFilters,
    ) -> Result<Self::Ok, Self::Err> {
        let Some(key) = self.config().session_key.clone() else {
            return Ok(None);
        };

        let doc = self
            .source()
            .execute(Select(By::new(key)))
            .await
            .map_err(tracerr::wrap!())?;
        let Some(doc) = doc else {
            return Ok(None);
        };

        match FilterState::from_document(&doc) {
            Ok(state) => {
                log::info!(
                    active = state.active_count(),
                    "restored persisted filters",
                );
                Ok(Some(state))
            }
            Err(e) => {
                log::warn!("ignoring unreadable persisted filters: {e}");
                Ok(None)
            }
        }
    }
}
