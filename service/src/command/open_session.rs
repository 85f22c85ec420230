//! [`Command`] for opening a search session.

use std::convert::Infallible;

use common::{
    operations::{By, Delete, Insert, Select},
    PageSize,
};
use tracerr::Traced;
use tracing as log;

use crate::{
    controller::Controller,
    domain::{catalog::PropertyTypeId, Catalog, Listing},
    filter::{FilterState, GenericFilter, Patch},
    infra::{
        self,
        storage::{Document, Key},
        Source,
    },
    presentation::{ListView, MapView},
    query::PersistedFilters,
    Service,
};

use super::{Command, ForgetFilters, RunEffects};

/// [`Command`] for opening a search session rendering into the provided
/// views.
///
/// The returned [`Controller`] has its data loaded and results presented.
#[derive(Debug)]
pub struct OpenSession<L, M> {
    /// [`ListView`] of the session.
    pub list: L,

    /// [`MapView`] of the session.
    pub map: M,

    /// Width of the viewport the session is started in.
    ///
    /// Decides the [`PageSize`] once for the whole session.
    pub viewport_width: u32,

    /// [`GenericFilter`] of a shared link the session is started from.
    ///
    /// It replaces the generic layer of the restored [`FilterState`] and
    /// prefilters the listings at their source.
    pub shared: Option<GenericFilter>,

    /// Indicator whether the persisted [`FilterState`] should be discarded.
    pub fresh: bool,
}

impl<Src, L, M> Command<OpenSession<L, M>> for Service<Src>
where
    Src: Source<
            Select<By<Catalog, Option<PropertyTypeId>>>,
            Ok = Catalog,
            Err = Traced<infra::Error>,
        > + Source<
            Select<By<Vec<Listing>, Option<GenericFilter>>>,
            Ok = Vec<Listing>,
            Err = Traced<infra::Error>,
        > + Source<
            Select<By<Option<Document>, Key>>,
            Ok = Option<Document>,
            Err = Traced<infra::Error>,
        > + Source<Insert<(Key, Document)>, Ok = (), Err = Traced<infra::Error>>
        + Source<Delete<By<Document, Key>>, Ok = (), Err = Traced<infra::Error>>,
    L: ListView,
    M: MapView,
{
    type Ok = Controller<L, M>;
    type Err = Infallible;

    async fn execute(
        &self,
        cmd: OpenSession<L, M>,
    ) -> Result<Self::Ok, Self::Err> {
        let OpenSession {
            list,
            map,
            viewport_width,
            shared,
            fresh,
        } = cmd;

        let mut state = if fresh {
            _ = self.execute(ForgetFilters).await.map_err(|e| {
                log::warn!("failed to forget persisted filters: {e}");
            });
            FilterState::default()
        } else {
            self.execute(PersistedFilters)
                .await
                .map_err(|e| {
                    log::warn!("failed to read persisted filters: {e}");
                })
                .ok()
                .flatten()
                .unwrap_or_default()
        };
        if let Some(generic) = &shared {
            _ = state.apply(Patch::Generic(generic.clone()));
        }

        let page_size = PageSize::for_viewport(
            viewport_width,
            self.config().narrow_viewport_width,
        );
        log::info!(
            page_size = page_size.get(),
            active = state.active_count(),
            "opening search session",
        );

        let mut controller =
            Controller::new(list, map, page_size, self.config().debounce)
                .with_state(state)
                .with_prefilter(shared);

        let effects = controller.start();
        self.execute(RunEffects {
            controller: &mut controller,
            effects,
        })
        .await?;

        Ok(controller)
    }
}
