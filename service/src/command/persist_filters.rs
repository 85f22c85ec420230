//! [`Command`] for persisting a [`FilterState`].

use common::operations::Insert;
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    filter::{persist, FilterState},
    infra::{
        self,
        storage::{Document, Key},
        Source,
    },
    Service,
};

use super::Command;

/// [`Command`] for persisting a [`FilterState`] to survive a reload within
/// the same session.
///
/// Does nothing if no session key is configured.
#[derive(Clone, Debug)]
pub struct PersistFilters(pub FilterState);

impl<Src> Command<PersistFilters> for Service<Src>
where
    Src: Source<Insert<(Key, Document)>, Ok = (), Err = Traced<infra::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        PersistFilters(state): PersistFilters,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let Some(key) = self.config().session_key.clone() else {
            return Ok(());
        };

        let doc = state
            .to_document()
            .map_err(tracerr::from_and_wrap!(=> E))?;
        self.source()
            .execute(Insert((key, doc)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::debug!(active = state.active_count(), "persisted filters");
        Ok(())
    }
}

/// Error of [`PersistFilters`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`FilterState`] cannot be encoded.
    #[display("failed to encode filters: {_0}")]
    Encode(persist::Error),

    /// [`Source`] error.
    #[display("`Source` operation failed: {_0}")]
    Source(infra::Error),
}
