//! [`Command`]s for performing [`Effect`]s of a [`Controller`].

use std::{collections::VecDeque, convert::Infallible};

use common::operations::{By, Delete, Insert, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    controller::{Controller, Effect, Event},
    domain::{catalog::PropertyTypeId, Catalog, Listing},
    filter::GenericFilter,
    index::Inventory,
    infra::{
        self,
        storage::{Document, Key},
        Source,
    },
    presentation::{ListView, MapView},
    query, Service,
};

use super::{Command, ForgetFilters, PersistFilters};

/// [`Command`] for performing an [`Effect`] of a [`Controller`].
///
/// Returns the [`Event`] to be fed back into the [`Controller`], if any.
/// Failures never propagate: they are logged and reported as [`Event`]s of
/// unavailable data.
#[derive(Clone, Debug)]
pub struct RunEffect(pub Effect);

impl<Src> Command<RunEffect> for Service<Src>
where
    Src: Source<
            Select<By<Catalog, Option<PropertyTypeId>>>,
            Ok = Catalog,
            Err = Traced<infra::Error>,
        > + Source<
            Select<By<Vec<Listing>, Option<GenericFilter>>>,
            Ok = Vec<Listing>,
            Err = Traced<infra::Error>,
        > + Source<Insert<(Key, Document)>, Ok = (), Err = Traced<infra::Error>>
        + Source<Delete<By<Document, Key>>, Ok = (), Err = Traced<infra::Error>>,
{
    type Ok = Option<Event>;
    type Err = Infallible;

    async fn execute(
        &self,
        RunEffect(effect): RunEffect,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(match effect {
            Effect::ReloadCatalog(property_type) => {
                let catalog = self
                    .execute(query::Catalog::by(property_type))
                    .await
                    .map_err(|e| log::warn!("failed to load catalog: {e}"))
                    .ok();
                Some(Event::CatalogLoaded(catalog))
            }
            Effect::LoadInventory(prefilter) => {
                let inventory = self
                    .execute(query::Inventory::by(prefilter))
                    .await
                    .map(Inventory::new)
                    .map_err(|e| log::warn!("failed to load inventory: {e}"))
                    .ok();
                Some(Event::InventoryLoaded(inventory))
            }
            Effect::Persist(state) => {
                _ = self.execute(PersistFilters(state)).await.map_err(|e| {
                    log::warn!("failed to persist filters: {e}");
                });
                None
            }
            Effect::Forget => {
                _ = self.execute(ForgetFilters).await.map_err(|e| {
                    log::warn!("failed to forget persisted filters: {e}");
                });
                None
            }
        })
    }
}

/// [`Command`] for performing [`Effect`]s of a [`Controller`], feeding the
/// resulting [`Event`]s back into it until it settles.
#[derive(Debug)]
pub struct RunEffects<'c, L, M> {
    /// [`Controller`] the [`Effect`]s are emitted by.
    pub controller: &'c mut Controller<L, M>,

    /// [`Effect`]s to be performed.
    pub effects: Vec<Effect>,
}

impl<'c, Src, L, M> Command<RunEffects<'c, L, M>> for Service<Src>
where
    Self: Command<RunEffect, Ok = Option<Event>, Err = Infallible>,
    L: ListView,
    M: MapView,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        cmd: RunEffects<'c, L, M>,
    ) -> Result<Self::Ok, Self::Err> {
        let RunEffects {
            controller,
            effects,
        } = cmd;

        let mut queue = VecDeque::from(effects);
        while let Some(effect) = queue.pop_front() {
            let event = self.execute(RunEffect(effect)).await?;
            if let Some(event) = event {
                queue.extend(controller.handle(event));
            }
        }
        Ok(())
    }
}
