//! Scheduled tasks definitions.

pub mod debounce;

pub use self::debounce::Debounce;
