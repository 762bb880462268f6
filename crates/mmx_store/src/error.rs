//! Error types for store operations.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in '{path}': {source}")]
    Json {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Walking the mods directory failed.
    #[error("Failed to walk mods directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// The store was written by an incompatible version.
    #[error("Unsupported store version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// A mod's `info.json` could not be turned into a mod.
    #[error("Invalid mod info '{path}': {source}")]
    ModInfo {
        path: Utf8PathBuf,
        #[source]
        source: mmx_mod::Error,
    },

    /// Load order could not be calculated.
    #[error(transparent)]
    Mod(#[from] mmx_mod::Error),

    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Path(std::path::PathBuf),
}
