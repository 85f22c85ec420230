//! Presentation of a page of listings by a list view and a map view kept in
//! lock-step.
//!
//! Every item of the current page gets an [`Ordinal`], which is the only key
//! correlating the list entries with the map markers.

pub mod highlight;

use std::sync::Arc;

use common::Window;
use derive_more::{Display, From, Into};
use tracing as log;

use crate::domain::{listing::Location, Listing};

pub use self::highlight::{Emphasis, Highlight};

/// 1-based position of an item across the whole result set.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
pub struct Ordinal(usize);

/// Item of the list view.
#[derive(Clone, Debug)]
pub struct Entry {
    /// [`Ordinal`] of this [`Entry`].
    pub ordinal: Ordinal,

    /// Presented [`Listing`].
    pub listing: Arc<Listing>,
}

/// Item of the map view.
#[derive(Clone, Debug)]
pub struct Marker {
    /// [`Ordinal`] of this [`Marker`], same as of the matching [`Entry`].
    pub ordinal: Ordinal,

    /// [`Location`] this [`Marker`] is placed at.
    pub location: Location,

    /// Presented [`Listing`].
    pub listing: Arc<Listing>,
}

/// Metadata of the presented page.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PageInfo {
    /// 1-based number of the page.
    pub page: usize,

    /// Total number of pages.
    pub page_count: usize,

    /// [`Ordinal`] of the first item on the page, `0` if it's empty.
    pub start_ordinal: usize,

    /// [`Ordinal`] of the last item on the page, `0` if it's empty.
    pub end_ordinal: usize,

    /// Total number of items in the result set.
    pub total: usize,
}

impl PageInfo {
    /// Indicates whether a page follows this one.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        self.page < self.page_count
    }

    /// Indicates whether a page precedes this one.
    #[must_use]
    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }
}

impl<T> From<&Window<'_, T>> for PageInfo {
    fn from(w: &Window<'_, T>) -> Self {
        Self {
            page: w.page,
            page_count: w.page_count,
            start_ordinal: w.start_ordinal,
            end_ordinal: w.end_ordinal,
            total: w.total,
        }
    }
}

/// Content of the list view.
#[derive(Clone, Copy, Debug)]
pub enum Content<'a> {
    /// Data is still being loaded.
    Loading,

    /// Inventory cannot be loaded, so a retry is to be offered.
    Unavailable,

    /// Page of the result set, possibly without any items.
    Page {
        /// [`PageInfo`] of the page.
        info: PageInfo,

        /// [`Entry`]s on the page.
        entries: &'a [Entry],
    },
}

/// Renderer of the list view.
pub trait ListView {
    /// Renders the provided [`Content`] from scratch.
    fn render(&mut self, content: Content<'_>);

    /// Changes [`Emphasis`] of the [`Entry`] with the provided [`Ordinal`].
    fn emphasize(&mut self, ordinal: Ordinal, emphasis: Option<Emphasis>);
}

/// Renderer of the map view.
pub trait MapView {
    /// Renders the provided [`Marker`]s from scratch.
    fn render(&mut self, markers: &[Marker]);

    /// Changes [`Emphasis`] of the [`Marker`] with the provided [`Ordinal`].
    fn emphasize(&mut self, ordinal: Ordinal, emphasis: Option<Emphasis>);
}

impl<V: ListView + ?Sized> ListView for Box<V> {
    fn render(&mut self, content: Content<'_>) {
        (**self).render(content);
    }

    fn emphasize(&mut self, ordinal: Ordinal, emphasis: Option<Emphasis>) {
        (**self).emphasize(ordinal, emphasis);
    }
}

impl<V: MapView + ?Sized> MapView for Box<V> {
    fn render(&mut self, markers: &[Marker]) {
        (**self).render(markers);
    }

    fn emphasize(&mut self, ordinal: Ordinal, emphasis: Option<Emphasis>) {
        (**self).emphasize(ordinal, emphasis);
    }
}

/// Drives a [`ListView`] and a [`MapView`] from the same page.
#[derive(Debug)]
pub struct Presenter<L, M> {
    /// [`ListView`] of this [`Presenter`].
    list: L,

    /// [`MapView`] of this [`Presenter`].
    map: M,

    /// [`Entry`]s of the presented page.
    entries: Vec<Entry>,

    /// [`Marker`]s of the presented page.
    markers: Vec<Marker>,

    /// Current [`Highlight`].
    highlight: Highlight,
}

impl<L: ListView, M: MapView> Presenter<L, M> {
    /// Creates a new [`Presenter`] over the provided views.
    #[must_use]
    pub fn new(list: L, map: M) -> Self {
        Self {
            list,
            map,
            entries: Vec::new(),
            markers: Vec::new(),
            highlight: Highlight::Idle,
        }
    }

    /// Presents the loading state.
    pub fn loading(&mut self) {
        self.clear();
        self.list.render(Content::Loading);
        self.map.render(&[]);
    }

    /// Presents the unavailable inventory state.
    pub fn unavailable(&mut self) {
        self.clear();
        self.list.render(Content::Unavailable);
        self.map.render(&[]);
    }

    /// Presents the provided page, dropping any [`Highlight`].
    ///
    /// Listings without a [`Location`] are listed, but get no [`Marker`].
    pub fn present(&mut self, window: &Window<'_, Arc<Listing>>) {
        self.clear();
        self.entries = window
            .numbered()
            .map(|(n, listing)| Entry {
                ordinal: n.into(),
                listing: Arc::clone(listing),
            })
            .collect();
        self.markers = self
            .entries
            .iter()
            .filter_map(|e| {
                Some(Marker {
                    ordinal: e.ordinal,
                    location: e.listing.location()?,
                    listing: Arc::clone(&e.listing),
                })
            })
            .collect();

        self.list.render(Content::Page {
            info: window.into(),
            entries: &self.entries,
        });
        self.map.render(&self.markers);
    }

    /// Hovers the item with the provided [`Ordinal`] in either view, or
    /// leaves any item if [`None`] is provided.
    ///
    /// Ordinals not on the presented page are ignored.
    pub fn hover(&mut self, ordinal: Option<Ordinal>) {
        if ordinal.is_some_and(|o| self.entry(o).is_none()) {
            log::trace!("ignoring hover of unknown ordinal {ordinal:?}");
            return;
        }
        let changes = self.highlight.hover(ordinal);
        self.emphasize(changes);
    }

    /// Clicks the item with the provided [`Ordinal`] in either view,
    /// returning its [`Entry`] if it's on the presented page.
    pub fn click(&mut self, ordinal: Ordinal) -> Option<&Entry> {
        if self.entry(ordinal).is_none() {
            log::trace!("ignoring click of unknown ordinal {ordinal}");
            return None;
        }
        let changes = self.highlight.click(ordinal);
        self.emphasize(changes);
        self.entry(ordinal)
    }

    /// Returns [`Entry`]s of the presented page.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns [`Marker`]s of the presented page.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// Returns the current [`Highlight`].
    #[must_use]
    pub fn highlight(&self) -> Highlight {
        self.highlight
    }

    /// Returns the [`ListView`] of this [`Presenter`].
    #[must_use]
    pub fn list(&self) -> &L {
        &self.list
    }

    /// Returns the [`MapView`] of this [`Presenter`].
    #[must_use]
    pub fn map(&self) -> &M {
        &self.map
    }

    /// Returns the [`Entry`] with the provided [`Ordinal`], if any.
    fn entry(&self, ordinal: Ordinal) -> Option<&Entry> {
        self.entries.iter().find(|e| e.ordinal == ordinal)
    }

    /// Forwards the provided [`Emphasis`] changes to both views.
    fn emphasize(&mut self, changes: Vec<highlight::Change>) {
        for (ordinal, emphasis) in changes {
            self.list.emphasize(ordinal, emphasis);
            if self.markers.iter().any(|m| m.ordinal == ordinal) {
                self.map.emphasize(ordinal, emphasis);
            }
        }
    }

    /// Drops the presented page along with its [`Highlight`], letting both
    /// views know which items lose their [`Emphasis`].
    fn clear(&mut self) {
        let changes = self.highlight.reset();
        self.emphasize(changes);
        self.entries.clear();
        self.markers.clear();
    }
}
