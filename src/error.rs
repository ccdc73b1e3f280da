//! Errors raised while building a display or loading its configuration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while setting up a fireworks display.
#[derive(Error, Debug)]
pub enum Error {
    /// The container has no drawable area.
    #[error("container has no drawable area ({width}x{height})")]
    EmptyContainer {
        /// Container width in pixels.
        width: usize,
        /// Container height in pixels.
        height: usize,
    },

    /// A color string could not be parsed.
    #[error("invalid color `{0}`")]
    InvalidColor(String),

    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for the options schema.
    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Terminal or log file I/O failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
