//! [`Args`] definitions.

use clap::Parser;

/// Interactive faceted property search.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Query string of a shared search link to start from.
    #[arg(short, long)]
    pub share: Option<String>,

    /// Start a new search, discarding the persisted filters.
    #[arg(short, long)]
    pub new: bool,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}
