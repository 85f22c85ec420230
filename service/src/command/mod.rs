//! [`Command`] definition.

pub mod forget_filters;
pub mod open_session;
pub mod persist_filters;
pub mod run_effect;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    forget_filters::ForgetFilters, open_session::OpenSession,
    persist_filters::PersistFilters,
    run_effect::{RunEffect, RunEffects},
};
