//! Abstractions for offset pagination.

use std::num::NonZeroUsize;

use derive_more::{Display, Into};
use serde::{Deserialize, Serialize};

/// Number of items on a single page.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    /// [`PageSize`] used on narrow viewports.
    pub const NARROW: Self = Self(NonZeroUsize::MIN.saturating_add(4));

    /// [`PageSize`] used on regular viewports.
    pub const REGULAR: Self = Self(NonZeroUsize::MIN.saturating_add(9));

    /// Creates a new [`PageSize`], if the provided `size` is not zero.
    #[must_use]
    pub fn new(size: usize) -> Option<Self> {
        NonZeroUsize::new(size).map(Self)
    }

    /// Picks a [`PageSize`] for a viewport of the provided `width`.
    ///
    /// Viewports not wider than `narrow_max` are considered narrow.
    #[must_use]
    pub fn for_viewport(width: u32, narrow_max: u32) -> Self {
        if width <= narrow_max {
            Self::NARROW
        } else {
            Self::REGULAR
        }
    }

    /// Returns this [`PageSize`] as a [`usize`].
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

/// Window over a contiguous page of items.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Window<'a, T> {
    /// Items on this page.
    pub items: &'a [T],

    /// 1-based number of this page, clamped into `[1, page_count]`.
    pub page: usize,

    /// Total number of pages, never less than `1`.
    pub page_count: usize,

    /// 1-based ordinal of the first item on this page, or `0` if the page is
    /// empty.
    pub start_ordinal: usize,

    /// 1-based ordinal of the last item on this page, or `0` if the page is
    /// empty.
    pub end_ordinal: usize,

    /// Total number of items across all pages.
    pub total: usize,
}

impl<T> Window<'_, T> {
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

    /// Iterates over the items of this page along with their 1-based
    /// ordinals.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        (self.start_ordinal..).zip(self.items)
    }
}

/// Slices `items` into pages of `size` and returns the `requested` one.
///
/// `requested` is clamped into `[1, page_count]`, where `page_count` is `1`
/// for empty `items`.
#[must_use]
pub fn paginate<T>(items: &[T], size: PageSize, requested: usize) -> Window<'_, T> {
    let total = items.len();
    let page_count = total.div_ceil(size.get()).max(1);
    let page = requested.clamp(1, page_count);

    let offset = (page - 1) * size.get();
    let end = (offset + size.get()).min(total);
    let items = items.get(offset..end).unwrap_or_default();

    let (start_ordinal, end_ordinal) = if items.is_empty() {
        (0, 0)
    } else {
        (offset + 1, end)
    };

    Window {
        items,
        page,
        page_count,
        start_ordinal,
        end_ordinal,
        total,
    }
}
