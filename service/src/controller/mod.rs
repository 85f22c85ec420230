//! Facet UI [`Controller`] translating user interaction into [`FilterState`]
//! changes and re-evaluating the results.
//!
//! [`Controller`] is synchronous and owns the [`FilterState`] exclusively.
//! Everything requiring I/O is returned as [`Effect`]s for the caller to
//! perform, with the outcome fed back as an [`Event`].

pub mod accordion;

use std::time::Duration;

use common::PageSize;
use tokio::time::Instant;
use tracing as log;

use crate::{
    domain::{
        catalog::{DistrictId, PropertyTypeId},
        characteristic::{self, CategoryCode, InputKind},
        listing::{FinishLevel, Transaction},
        Catalog,
    },
    filter::{
        input, store::Subscription, FilterState, GenericFilter, Layer,
        NumericField, Patch, Pruned, Store,
    },
    index::{CatalogIndex, Inventory},
    predicate::{self, ResultSet},
    presentation::{ListView, MapView, Ordinal, Presenter},
    task::Debounce,
};

pub use self::accordion::{Accordion, Section};

/// User interaction or I/O outcome handled by a [`Controller`].
#[derive(Debug)]
pub enum Event {
    /// Raw text entered into a [`NumericField`].
    ///
    /// Re-evaluation is debounced.
    Input {
        /// [`NumericField`] the text is entered into.
        field: NumericField,

        /// Entered text.
        input: String,
    },

    /// Raw text entered as a floor of a numeric-kind characteristic.
    ///
    /// Re-evaluation is debounced.
    Floor {
        /// [`CategoryCode`] of the characteristic.
        category: CategoryCode,

        /// ID of the characteristic.
        characteristic: characteristic::Id,

        /// Entered text.
        input: String,
    },

    /// Presence-kind characteristic is toggled.
    TogglePresence {
        /// [`CategoryCode`] of the characteristic.
        category: CategoryCode,

        /// ID of the characteristic.
        characteristic: characteristic::Id,
    },

    /// Property type is picked or cleared.
    PropertyType(Option<PropertyTypeId>),

    /// District is toggled.
    ToggleDistrict(DistrictId),

    /// [`Transaction`] of the generic layer is picked or cleared.
    GenericTransaction(Option<Transaction>),

    /// [`Transaction`] of the basic layer is picked or cleared.
    BasicTransaction(Option<Transaction>),

    /// [`FinishLevel`] is picked or cleared.
    FinishLevel(Option<FinishLevel>),

    /// All advanced entries of a category are cleared.
    ClearCategory(CategoryCode),

    /// Whole [`Layer`] is cleared.
    ClearLayer(Layer),

    /// All the layers are cleared.
    ClearAll,

    /// Search session is started over, forgetting the persisted filters.
    NewSearch,

    /// Page with the provided number is requested.
    Page(usize),

    /// Next page is requested.
    NextPage,

    /// Previous page is requested.
    PreviousPage,

    /// Item with the provided [`Ordinal`] is hovered in any view, or no item
    /// is hovered anymore.
    Hover(Option<Ordinal>),

    /// Item with the provided [`Ordinal`] is clicked in any view.
    Click(Ordinal),

    /// [`Section`] of the filter panel is toggled.
    ToggleSection(Section),

    /// Failed loads are requested to be retried.
    Retry,

    /// [`Catalog`] load has finished, with [`None`] if it failed.
    CatalogLoaded(Option<Catalog>),

    /// [`Inventory`] load has finished, with [`None`] if it failed.
    InventoryLoaded(Option<Inventory>),
}

/// I/O to be performed by the caller of a [`Controller`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Effect {
    /// [`Catalog`] for the provided property type is to be loaded and fed
    /// back as [`Event::CatalogLoaded`].
    ReloadCatalog(Option<PropertyTypeId>),

    /// [`Inventory`] prefiltered by the provided [`GenericFilter`] is to be
    /// loaded and fed back as [`Event::InventoryLoaded`].
    LoadInventory(Option<GenericFilter>),

    /// [`FilterState`] is to be persisted.
    Persist(FilterState),

    /// Persisted [`FilterState`] is to be forgotten.
    Forget,
}

/// State of the [`Catalog`] loading.
#[derive(Debug)]
pub enum CatalogState {
    /// [`Catalog`] is being loaded.
    Loading,

    /// [`Catalog`] is loaded and indexed.
    Available(CatalogIndex),

    /// [`Catalog`] cannot be loaded, so advanced facets are disabled.
    Unavailable,
}

impl CatalogState {
    /// Returns the loaded [`CatalogIndex`], if any.
    #[must_use]
    pub fn index(&self) -> Option<&CatalogIndex> {
        match self {
            Self::Available(index) => Some(index),
            Self::Loading | Self::Unavailable => None,
        }
    }

    /// Indicates whether the [`Catalog`] is being loaded.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// State of the [`Inventory`] loading.
#[derive(Debug)]
pub enum InventoryState {
    /// [`Inventory`] is being loaded.
    Loading,

    /// [`Inventory`] is loaded.
    Available(Inventory),

    /// [`Inventory`] cannot be loaded.
    Unavailable,
}

/// Results of the latest evaluation.
#[derive(Debug)]
pub enum Results {
    /// Data required for evaluation is still being loaded.
    Loading,

    /// [`Inventory`] cannot be loaded, which is distinct from no listing
    /// matching.
    Unavailable,

    /// [`ResultSet`] of the latest evaluation.
    Ready(ResultSet),
}

impl Results {
    /// Returns the [`ResultSet`] of the latest evaluation, if any.
    #[must_use]
    pub fn result_set(&self) -> Option<&ResultSet> {
        match self {
            Self::Ready(set) => Some(set),
            Self::Loading | Self::Unavailable => None,
        }
    }
}

/// What has to be done after handling an [`Event`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Eval {
    /// Nothing.
    Skip,

    /// Evaluation is scheduled on the [`Debounce`].
    Debounce,

    /// Results are to be re-evaluated right away.
    Now,

    /// Current results are to be re-paginated.
    Present,
}

/// Facet UI controller of a single search session.
#[derive(Debug)]
pub struct Controller<L, M> {
    /// [`Store`] of the [`FilterState`].
    store: Store,

    /// [`GenericFilter`] the [`Inventory`] is prefiltered with by its
    /// source.
    prefilter: Option<GenericFilter>,

    /// [`CatalogState`] of this session.
    catalog: CatalogState,

    /// [`InventoryState`] of this session.
    inventory: InventoryState,

    /// [`Results`] of the latest evaluation.
    results: Results,

    /// Requested page number.
    page: usize,

    /// [`PageSize`] fixed for this session.
    page_size: PageSize,

    /// [`Debounce`] of numeric inputs.
    debounce: Debounce,

    /// [`Accordion`] of the filter panel.
    accordion: Accordion,

    /// [`Presenter`] of the results.
    presenter: Presenter<L, M>,
}

impl<L: ListView, M: MapView> Controller<L, M> {
    /// Creates a new [`Controller`] rendering into the provided views.
    #[must_use]
    pub fn new(
        list: L,
        map: M,
        page_size: PageSize,
        debounce: Duration,
    ) -> Self {
        Self {
            store: Store::default(),
            prefilter: None,
            catalog: CatalogState::Loading,
            inventory: InventoryState::Loading,
            results: Results::Loading,
            page: 1,
            page_size,
            debounce: Debounce::new(debounce),
            accordion: Accordion::default(),
            presenter: Presenter::new(list, map),
        }
    }

    /// Starts this [`Controller`] from the provided [`FilterState`].
    #[must_use]
    pub fn with_state(mut self, state: FilterState) -> Self {
        self.store = Store::new(state);
        self
    }

    /// Sets the [`GenericFilter`] the [`Inventory`] is to be prefiltered
    /// with by its source.
    #[must_use]
    pub fn with_prefilter(mut self, prefilter: Option<GenericFilter>) -> Self {
        self.prefilter = prefilter;
        self
    }

    /// Presents the loading state and returns the [`Effect`]s loading the
    /// [`Inventory`] and the [`Catalog`].
    pub fn start(&mut self) -> Vec<Effect> {
        self.catalog = CatalogState::Loading;
        self.inventory = InventoryState::Loading;
        self.evaluate();
        vec![
            Effect::LoadInventory(self.prefilter.clone()),
            Effect::ReloadCatalog(self.property_type()),
        ]
    }

    /// Handles the provided [`Event`], returning the [`Effect`]s to be
    /// performed.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let revision = self.store.revision();
        let property_type = self.property_type();
        let forget = matches!(event, Event::NewSearch);
        let mut effects = Vec::new();

        let eval = match event {
            Event::Input { field, input } => {
                self.debounced(field.patch(&input))
            }
            Event::Floor {
                category,
                characteristic,
                input,
            } => {
                let kind = InputKind::Numeric;
                if self.has_facet(&category, characteristic, kind) {
                    self.debounced(Patch::Floor {
                        category,
                        characteristic,
                        floor: input::floor(&input),
                    })
                } else {
                    log::debug!(
                        "ignoring floor of unknown `Characteristic({})`",
                        characteristic,
                    );
                    Eval::Skip
                }
            }
            Event::TogglePresence {
                category,
                characteristic,
            } => {
                let kind = InputKind::Presence;
                if self.has_facet(&category, characteristic, kind) {
                    self.immediate(Patch::TogglePresence {
                        category,
                        characteristic,
                    })
                } else {
                    log::debug!(
                        "ignoring toggle of unknown `Characteristic({})`",
                        characteristic,
                    );
                    Eval::Skip
                }
            }
            Event::PropertyType(id) => self.immediate(Patch::PropertyType(id)),
            Event::ToggleDistrict(id) => {
                self.immediate(Patch::ToggleDistrict(id))
            }
            Event::GenericTransaction(t) => {
                self.immediate(Patch::GenericTransaction(t))
            }
            Event::BasicTransaction(t) => {
                self.immediate(Patch::BasicTransaction(t))
            }
            Event::FinishLevel(l) => self.immediate(Patch::FinishLevel(l)),
            Event::ClearCategory(code) => {
                self.immediate(Patch::ClearCategory(code))
            }
            Event::ClearLayer(layer) => {
                self.immediate(Patch::ClearLayer(layer))
            }
            Event::ClearAll => {
                _ = self.debounce.cancel();
                _ = self.store.apply_patch(Patch::Reset);
                Eval::Now
            }
            Event::NewSearch => {
                _ = self.debounce.cancel();
                _ = self.store.apply_patch(Patch::Reset);
                self.accordion.close();
                self.page = 1;
                effects.push(Effect::Forget);
                if self.prefilter.take().is_some() {
                    self.inventory = InventoryState::Loading;
                    effects.push(Effect::LoadInventory(None));
                }
                Eval::Now
            }
            Event::Page(page) => {
                self.page = page;
                Eval::Present
            }
            Event::NextPage => {
                self.page = self.page.saturating_add(1);
                Eval::Present
            }
            Event::PreviousPage => {
                self.page = self.page.saturating_sub(1);
                Eval::Present
            }
            Event::Hover(ordinal) => {
                self.presenter.hover(ordinal);
                Eval::Skip
            }
            Event::Click(ordinal) => {
                _ = self.presenter.click(ordinal);
                Eval::Skip
            }
            Event::ToggleSection(section) => {
                self.accordion.toggle(section);
                Eval::Skip
            }
            Event::Retry => {
                if matches!(self.inventory, InventoryState::Unavailable) {
                    self.inventory = InventoryState::Loading;
                    effects.push(Effect::LoadInventory(self.prefilter.clone()));
                }
                if matches!(self.catalog, CatalogState::Unavailable) {
                    self.catalog = CatalogState::Loading;
                    effects.push(Effect::ReloadCatalog(property_type));
                }
                Eval::Now
            }
            Event::CatalogLoaded(catalog) => {
                self.load_catalog(catalog);
                Eval::Now
            }
            Event::InventoryLoaded(inventory) => {
                self.load_inventory(inventory);
                Eval::Now
            }
        };

        if self.store.revision() != revision {
            self.page = 1;
            if self.property_type() != property_type {
                self.catalog = CatalogState::Loading;
                effects.push(Effect::ReloadCatalog(self.property_type()));
            }
            if !forget {
                effects.push(Effect::Persist(self.store.get_state().clone()));
            }
        }

        match eval {
            Eval::Now => self.evaluate(),
            Eval::Present => self.present(),
            Eval::Debounce | Eval::Skip => {}
        }
        effects
    }

    /// Returns [`Instant`] of the pending debounced evaluation, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    /// Runs the pending debounced evaluation if it's due at the provided
    /// [`Instant`], returning whether it was run.
    ///
    /// Evaluation always uses the current [`FilterState`].
    pub fn fire(&mut self, now: Instant) -> bool {
        let due = self.debounce.fire(now);
        if due {
            self.evaluate();
        }
        due
    }

    /// Subscribes the provided function to [`FilterState`] changes.
    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&FilterState) + 'static,
    ) -> Subscription {
        self.store.subscribe(subscriber)
    }

    /// Removes the provided [`Subscription`].
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.store.unsubscribe(subscription);
    }

    /// Returns the current [`FilterState`].
    #[must_use]
    pub fn state(&self) -> &FilterState {
        self.store.get_state()
    }

    /// Returns the [`CatalogState`] of this session.
    #[must_use]
    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    /// Returns the [`InventoryState`] of this session.
    #[must_use]
    pub fn inventory(&self) -> &InventoryState {
        &self.inventory
    }

    /// Returns [`Results`] of the latest evaluation.
    #[must_use]
    pub fn results(&self) -> &Results {
        &self.results
    }

    /// Returns the number of the presented page.
    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns [`PageSize`] of this session.
    #[must_use]
    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Returns [`Accordion`] of the filter panel.
    #[must_use]
    pub fn accordion(&self) -> Accordion {
        self.accordion
    }

    /// Returns [`Presenter`] of the results.
    #[must_use]
    pub fn presenter(&self) -> &Presenter<L, M> {
        &self.presenter
    }

    /// Returns the currently picked property type.
    fn property_type(&self) -> Option<PropertyTypeId> {
        self.store.get_state().generic.property_type_id
    }

    /// Applies the provided [`Patch`] superseding any pending debounced
    /// evaluation.
    fn immediate(&mut self, patch: Patch) -> Eval {
        if self.store.apply_patch(patch) {
            _ = self.debounce.cancel();
            Eval::Now
        } else {
            Eval::Skip
        }
    }

    /// Applies the provided [`Patch`] postponing evaluation until the input
    /// settles.
    fn debounced(&mut self, patch: Patch) -> Eval {
        if self.store.apply_patch(patch) {
            self.debounce.schedule();
            Eval::Debounce
        } else {
            Eval::Skip
        }
    }

    /// Indicates whether the loaded [`Catalog`] has the provided
    /// characteristic of the provided [`InputKind`] in the provided
    /// category.
    fn has_facet(
        &self,
        category: &CategoryCode,
        id: characteristic::Id,
        kind: InputKind,
    ) -> bool {
        self.catalog
            .index()
            .and_then(|index| index.characteristic(id))
            .is_some_and(|c| {
                &c.category_code == category && c.input_kind == kind
            })
    }

    /// Indexes the loaded [`Catalog`] and prunes stale references from the
    /// [`FilterState`].
    fn load_catalog(&mut self, catalog: Option<Catalog>) {
        let Some(catalog) = catalog else {
            log::warn!("catalog is unavailable, advanced filters are disabled");
            self.catalog = CatalogState::Unavailable;
            _ = self.store.apply_patch(Patch::ClearLayer(Layer::Advanced));
            return;
        };

        let index = CatalogIndex::new(catalog);
        let mut pruned = Pruned::default();
        _ = self.store.update(|state| {
            pruned = state.prune(&index);
            !pruned.is_empty()
        });
        if !pruned.is_empty() {
            log::warn!("dropped stale filter references: {pruned:?}");
        }
        log::info!(
            categories = index.categories_ordered().len(),
            "catalog loaded",
        );
        self.catalog = CatalogState::Available(index);
    }

    /// Accepts the loaded [`Inventory`].
    fn load_inventory(&mut self, inventory: Option<Inventory>) {
        self.inventory = match inventory {
            Some(inventory) => {
                log::info!(listings = inventory.len(), "inventory loaded");
                InventoryState::Available(inventory)
            }
            None => {
                log::warn!("inventory is unavailable");
                InventoryState::Unavailable
            }
        };
    }

    /// Evaluates the current [`FilterState`] and presents the results.
    ///
    /// Nothing is filtered until both the [`Inventory`] and the [`Catalog`]
    /// are loaded.
    fn evaluate(&mut self) {
        self.results = match &self.inventory {
            InventoryState::Loading => Results::Loading,
            InventoryState::Unavailable => Results::Unavailable,
            InventoryState::Available(_) if self.catalog.is_loading() => {
                Results::Loading
            }
            InventoryState::Available(inventory) => Results::Ready(
                predicate::filter(inventory.listings(), self.store.get_state()),
            ),
        };
        self.present();
    }

    /// Presents the requested page of the current [`Results`].
    fn present(&mut self) {
        match &self.results {
            Results::Loading => self.presenter.loading(),
            Results::Unavailable => self.presenter.unavailable(),
            Results::Ready(set) => {
                let window = set.paginate(self.page_size, self.page);
                self.page = window.page;
                self.presenter.present(&window);
            }
        }
    }
}
