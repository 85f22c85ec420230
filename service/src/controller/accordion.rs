//! [`Accordion`] of the filter sections.

use common::define_kind;

define_kind! {
    #[doc = "Section of the filter panel, one per filter layer."]
    enum Section {
        #[doc = "Section of the generic layer."]
        Generic = 1,

        #[doc = "Section of the basic layer."]
        Basic = 2,

        #[doc = "Section of the advanced layer."]
        Advanced = 3,
    }
}

/// Filter panel keeping at most one [`Section`] open.
///
/// Which [`Section`] is open never affects the computed results.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Accordion {
    /// Currently open [`Section`], if any.
    open: Option<Section>,
}

impl Accordion {
    /// Returns the currently open [`Section`], if any.
    #[must_use]
    pub fn open(&self) -> Option<Section> {
        self.open
    }

    /// Indicates whether the provided [`Section`] is open.
    #[must_use]
    pub fn is_open(&self, section: Section) -> bool {
        self.open == Some(section)
    }

    /// Opens the provided [`Section`] closing any other one, or closes it if
    /// it's already open.
    pub fn toggle(&mut self, section: Section) {
        self.open = (!self.is_open(section)).then_some(section);
    }

    /// Closes any open [`Section`].
    pub fn close(&mut self) {
        self.open = None;
    }
}

#[cfg(test)]
mod spec {
    use super::{Accordion, Section};

    #[test]
    fn keeps_single_section_open() {
        let mut a = Accordion::default();
        assert_eq!(a.open(), None);

        a.toggle(Section::Basic);
        assert!(a.is_open(Section::Basic));

        a.toggle(Section::Advanced);
        assert!(a.is_open(Section::Advanced));
        assert!(!a.is_open(Section::Basic));

        a.toggle(Section::Advanced);
        assert_eq!(a.open(), None);

        a.toggle(Section::Generic);
        a.close();
        assert_eq!(a.open(), None);
    }
}
