//! Error types for mod and dependency handling.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading mods and their dependencies.
#[derive(Error, Debug)]
pub enum Error {
    /// A dependency declaration could not be split into prefix, name and version.
    #[error("Malformed dependency '{declaration}': {reason}")]
    MalformedDependency { declaration: String, reason: String },

    /// The version part of a dependency declaration is not a valid version.
    #[error("Invalid version '{0}' in dependency declaration")]
    InvalidVersion(String),

    /// Reading the dependencies of a mod failed. Wraps the first failing declaration.
    #[error("Failed to read dependencies of mod '{mod_name}': {source}")]
    ModDependencies {
        mod_name: String,
        #[source]
        source: Box<Error>,
    },

    /// The dependency graph contains a cycle, so no load order exists.
    #[error("Cyclic dependencies between mods: {}", .0.join(", "))]
    CyclicDependencies(Vec<String>),

    /// Failed to parse `info.json`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
