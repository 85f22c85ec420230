//! [`Highlight`] state machine definitions.

use common::define_kind;

use super::Ordinal;

define_kind! {
    #[doc = "Visual emphasis of an item shown by both views."]
    enum Emphasis {
        #[doc = "Transient emphasis of a hovered item."]
        Hovered = 1,

        #[doc = "Latched emphasis of a clicked item."]
        Selected = 2,
    }
}

/// Cross-highlight state of the items on the current page.
///
/// Hovering is transient and non-destructive, while a click latches the
/// selection until another item is clicked. At most one item is selected.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Highlight {
    /// Nothing is highlighted.
    #[default]
    Idle,

    /// An item is hovered.
    Hovered(Ordinal),

    /// An item is selected, while another one may be hovered.
    Selected {
        /// [`Ordinal`] of the selected item.
        selected: Ordinal,

        /// [`Ordinal`] of the hovered item, if any.
        hovered: Option<Ordinal>,
    },
}

/// Change of the [`Emphasis`] of a single item.
pub type Change = (Ordinal, Option<Emphasis>);

impl Highlight {
    /// Returns the [`Emphasis`] of the item with the provided [`Ordinal`].
    ///
    /// Selection wins over hovering.
    #[must_use]
    pub fn emphasis(&self, ordinal: Ordinal) -> Option<Emphasis> {
        match *self {
            Self::Idle => None,
            Self::Hovered(o) => (o == ordinal).then_some(Emphasis::Hovered),
            Self::Selected { selected, hovered } => {
                if selected == ordinal {
                    Some(Emphasis::Selected)
                } else if hovered == Some(ordinal) {
                    Some(Emphasis::Hovered)
                } else {
                    None
                }
            }
        }
    }

    /// Returns [`Ordinal`] of the selected item, if any.
    #[must_use]
    pub fn selected(&self) -> Option<Ordinal> {
        match *self {
            Self::Selected { selected, .. } => Some(selected),
            Self::Idle | Self::Hovered(_) => None,
        }
    }

    /// Returns [`Ordinal`] of the hovered item, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<Ordinal> {
        match *self {
            Self::Idle => None,
            Self::Hovered(o) => Some(o),
            Self::Selected { hovered, .. } => hovered,
        }
    }

    /// Moves the pointer onto the item with the provided [`Ordinal`], or off
    /// any item if [`None`] is provided.
    pub fn hover(&mut self, ordinal: Option<Ordinal>) -> Vec<Change> {
        let next = match (*self, ordinal) {
            (Self::Idle | Self::Hovered(_), Some(o)) => Self::Hovered(o),
            (Self::Idle | Self::Hovered(_), None) => Self::Idle,
            (Self::Selected { selected, .. }, hovered) => {
                Self::Selected { selected, hovered }
            }
        };
        self.transition(next)
    }

    /// Selects the item with the provided [`Ordinal`], replacing the prior
    /// selection.
    pub fn click(&mut self, ordinal: Ordinal) -> Vec<Change> {
        let next = Self::Selected {
            selected: ordinal,
            hovered: self.hovered(),
        };
        self.transition(next)
    }

    /// Drops any highlight, returning the items losing their [`Emphasis`].
    pub fn reset(&mut self) -> Vec<Change> {
        self.transition(Self::Idle)
    }

    /// Switches to the `next` state, returning the items whose [`Emphasis`]
    /// has changed.
    fn transition(&mut self, next: Self) -> Vec<Change> {
        let prev = std::mem::replace(self, next);

        let mut touched = [prev, next]
            .iter()
            .flat_map(|s| [s.selected(), s.hovered()])
            .flatten()
            .collect::<Vec<_>>();
        touched.sort_unstable();
        touched.dedup();

        touched
            .into_iter()
            .filter_map(|o| {
                let emphasis = next.emphasis(o);
                (prev.emphasis(o) != emphasis).then_some((o, emphasis))
            })
            .collect()
    }
}

#[cfg(test)]
mod spec {
    use super::{Emphasis, Highlight, Ordinal};

    fn o(n: usize) -> Ordinal {
        Ordinal::from(n)
    }

    #[test]
    fn hover_and_unhover() {
        let mut h = Highlight::Idle;

        assert_eq!(h.hover(Some(o(3))), [(o(3), Some(Emphasis::Hovered))]);
        assert_eq!(h, Highlight::Hovered(o(3)));

        assert_eq!(
            h.hover(Some(o(4))),
            [(o(3), None), (o(4), Some(Emphasis::Hovered))],
        );

        assert_eq!(h.hover(None), [(o(4), None)]);
        assert_eq!(h, Highlight::Idle);
    }

    #[test]
    fn click_latches_selection() {
        let mut h = Highlight::Idle;
        _ = h.hover(Some(o(2)));

        assert_eq!(h.click(o(2)), [(o(2), Some(Emphasis::Selected))]);

        assert!(h.hover(None).is_empty());
        assert_eq!(h.selected(), Some(o(2)));
        assert_eq!(h.emphasis(o(2)), Some(Emphasis::Selected));
    }

    #[test]
    fn hover_keeps_selection() {
        let mut h = Highlight::Idle;
        _ = h.click(o(1));

        assert_eq!(h.hover(Some(o(5))), [(o(5), Some(Emphasis::Hovered))]);
        assert_eq!(h.emphasis(o(1)), Some(Emphasis::Selected));

        assert_eq!(h.hover(None), [(o(5), None)]);
        assert_eq!(h.selected(), Some(o(1)));
    }

    #[test]
    fn new_click_replaces_selection() {
        let mut h = Highlight::Idle;
        _ = h.click(o(1));

        assert_eq!(
            h.click(o(7)),
            [(o(1), None), (o(7), Some(Emphasis::Selected))],
        );
        assert_eq!(h.selected(), Some(o(7)));
        assert_eq!(h.emphasis(o(1)), None);
    }

    #[test]
    fn clicking_hovered_item_promotes_it() {
        let mut h = Highlight::Idle;
        _ = h.click(o(1));
        _ = h.hover(Some(o(2)));

        assert_eq!(
            h.click(o(2)),
            [(o(1), None), (o(2), Some(Emphasis::Selected))],
        );

        assert!(h.hover(None).is_empty());
        assert_eq!(h.emphasis(o(2)), Some(Emphasis::Selected));
    }

    #[test]
    fn reset_clears_everything() {
        let mut h = Highlight::Idle;
        _ = h.click(o(1));
        _ = h.hover(Some(o(3)));

        assert_eq!(h.reset(), [(o(1), None), (o(3), None)]);
        assert_eq!(h, Highlight::Idle);
    }
}
