//! Session storage definitions.

use std::str::FromStr;

use derive_more::{Display, From, Into};

/// Key of a [`Document`] in a session storage.
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
pub struct Key(String);

impl Key {
    /// Creates a new [`Key`] if the given `key` is valid.
    ///
    /// A valid [`Key`] consists of ASCII alphanumerics, `.`, `_` and `-`,
    /// and doesn't start with a `.`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        Self::check(&key).then_some(Self(key))
    }

    /// Returns this [`Key`] as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks whether the given `key` is a valid [`Key`].
    fn check(key: impl AsRef<str>) -> bool {
        let key = key.as_ref();
        !key.is_empty()
            && key.len() <= 128
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "._-".contains(c))
    }
}

impl FromStr for Key {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid storage `Key`")
    }
}

/// Opaque serialized document kept in a session storage.
#[derive(Clone, Debug, Display, Eq, From, Into, PartialEq)]
pub struct Document(String);

impl AsRef<str> for Document {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod spec {
    use super::Key;

    #[test]
    fn validates_keys() {
        assert!(Key::new("property-search.filters").is_some());
        assert!(Key::new("dashboard_tab-2").is_some());
        assert!(Key::new("").is_none());
        assert!(Key::new("../etc/passwd").is_none());
        assert!(Key::new(".hidden").is_none());
        assert!(Key::new("with space").is_none());
    }
}
