//! Error types for reduction.
//!
//! All fallible functions in this crate return [`Result<T>`]. Both data errors abort
//! the reduction of the whole combination; nothing is written for it.

use mmx_combination::{ContentHash, EntityKind};
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A combination lists a hash that is not in the raw entity registry.
    #[error("{kind} {hash} not found in the raw registry")]
    EntityNotFound { kind: EntityKind, hash: ContentHash },

    /// An entity of a combination has no counterpart in the parent baseline.
    ///
    /// The export produced data that contradicts the parent relation.
    #[error("{kind} '{identifier}' of combination '{combination}' is missing from its parent")]
    MissingParentEntity {
        combination: String,
        kind: EntityKind,
        identifier: String,
    },

    /// Failed to serialize an entity for hashing.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
