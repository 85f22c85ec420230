//! Faceted property search: filter layers, predicate evaluation, pagination
//! and synchronized list/map presentation of the results.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod controller;
pub mod domain;
pub mod filter;
pub mod index;
pub mod infra;
pub mod predicate;
pub mod presentation;
pub mod query;
pub mod task;

use std::time::Duration;

use smart_default::SmartDefault;

#[cfg(doc)]
use infra::Source;

pub use self::{
    command::Command, controller::Controller, filter::FilterState,
    query::Query,
};

/// [`Service`] configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Quiescent interval numeric inputs are debounced with.
    #[default(Duration::from_millis(300))]
    pub debounce: Duration,

    /// Widest viewport considered narrow.
    #[default(768)]
    pub narrow_viewport_width: u32,

    /// Key the [`FilterState`] is persisted under, or [`None`] to not
    /// persist it.
    pub session_key: Option<infra::storage::Key>,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Src> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Source`] of this [`Service`].
    source: Src,
}

impl<Src> Service<Src> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, source: Src) -> Self {
        Self { config, source }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Source`] of this [`Service`].
    #[must_use]
    pub fn source(&self) -> &Src {
        &self.source
    }
}
