//! [`Config`]-related definitions.

use std::{path::PathBuf, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use derive_more::{Display, Error};
use serde::Deserialize;
use service::infra::storage::Key;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Data source configuration.
    #[serde(default)]
    pub data: Data,

    /// Search session configuration.
    #[serde(default)]
    pub search: Search,

    /// Filters persistence configuration.
    #[serde(default)]
    pub session: Session,

    /// Log configuration.
    #[serde(default)]
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }

    /// Builds [`service::Config`] out of this [`Config`].
    ///
    /// # Errors
    ///
    /// If the configured session key is invalid.
    pub fn service(&self) -> Result<service::Config, InvalidSessionKey> {
        let session_key = if self.session.persist {
            Some(
                Key::new(self.session.key.clone())
                    .ok_or_else(|| InvalidSessionKey(self.session.key.clone()))?,
            )
        } else {
            None
        };

        Ok(service::Config {
            debounce: self.search.debounce,
            narrow_viewport_width: self.search.narrow_viewport_width,
            session_key,
        })
    }
}

/// Error of an invalid [`Session::key`].
#[derive(Clone, Debug, Display, Error)]
#[display("`{_0}` is not a valid session key")]
pub struct InvalidSessionKey(#[error(not(source))] String);

/// Data source configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Data {
    /// Directory containing `inventory.json` and `catalog.json`.
    #[default(PathBuf::from("data"))]
    pub dir: PathBuf,
}

/// Search session configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Search {
    /// Quiescent interval numeric inputs are debounced with.
    #[default(time::Duration::from_millis(300))]
    #[serde(with = "humantime_serde")]
    pub debounce: time::Duration,

    /// Widest viewport considered narrow.
    #[default(768)]
    pub narrow_viewport_width: u32,

    /// Width of the viewport of this session.
    #[default(1280)]
    pub viewport_width: u32,
}

/// Filters persistence configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Session {
    /// Key the filters are persisted under.
    #[default("property-search.filters".to_owned())]
    pub key: String,

    /// Indicator whether the filters are persisted at all.
    #[default(true)]
    pub persist: bool,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
