//! [`Command`] for forgetting the persisted [`FilterState`].

use common::operations::{By, Delete};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::filter::FilterState;
use crate::{
    infra::{
        self,
        storage::{Document, Key},
        Source,
    },
    Service,
};

use super::Command;

/// [`Command`] for forgetting the persisted [`FilterState`] when a new
/// search is started.
#[derive(Clone, Copy, Debug, Default)]
pub struct ForgetFilters;

impl<Src> Command<ForgetFilters> for Service<Src>
where
    Src: Source<Delete<By<Document, Key>>, Ok = (), Err = Traced<infra::Error>>,
{
    type Ok = ();
    type Err = Traced<infra::Error>;

    async fn execute(&self, _: ForgetFilters) -> Result<Self::Ok, Self::Err> {
        let Some(key) = self.config().session_key.clone() else {
            return Ok(());
        };

        self.source()
            .execute(Delete(By::new(key)))
            .await
            .map_err(tracerr::wrap!())?;

        log::info!("forgot persisted filters");
        Ok(())
    }
}
