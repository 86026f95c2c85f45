//! Error types for the WordPress API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently branch on
//! "the resource does not exist" — most notably after a delete. Term lookups
//! get their own `TermNotFound` variant since existence checks on terms are
//! common control flow. Create/update rejections keep the raw status code
//! and body so the caller can diagnose what the server objected to. All
//! other non-2xx responses land in `HttpError`.

use std::fmt;

use crate::response::Direction;

/// Errors returned by client operations.
#[derive(Debug)]
pub enum ApiError {
    /// The server returned 404 for a direct single-entity lookup.
    NotFound,

    /// The server returned 404 for a term lookup in the given taxonomy.
    TermNotFound { taxonomy: String, id: u64 },

    /// The server rejected a create or update (validation failure, auth
    /// failure, malformed payload). Status and body are preserved for
    /// diagnosis.
    CreateFailed { status: u16, body: String },

    /// The server returned an unexpected status not covered above.
    HttpError { status: u16, body: String },

    /// Network-level failure from the transport: DNS, connection refused,
    /// timeout. Distinct from `NotFound`, which is an application-level
    /// answer from the server.
    Transport(String),

    /// An update or delete was attempted on an entity without a
    /// server-assigned id.
    MissingId,

    /// A term operation was attempted on a term without a taxonomy slug.
    MissingTaxonomy,

    /// Traversal was requested in a direction the current page carries no
    /// link for.
    MissingLink(Direction),

    /// The request payload could not be serialized to JSON.
    SerializationError(String),

    /// The response body could not be deserialized into the expected type.
    DeserializationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound => write!(f, "resource not found"),
            ApiError::TermNotFound { taxonomy, id } => {
                write!(f, "term {id} not found in taxonomy '{taxonomy}'")
            }
            ApiError::CreateFailed { status, body } => {
                write!(f, "create rejected with HTTP {status}: {body}")
            }
            ApiError::HttpError { status, body } => {
                write!(f, "HTTP {status}: {body}")
            }
            ApiError::Transport(msg) => write!(f, "transport failure: {msg}"),
            ApiError::MissingId => {
                write!(f, "entity has no server-assigned id")
            }
            ApiError::MissingTaxonomy => {
                write!(f, "term has no taxonomy slug")
            }
            ApiError::MissingLink(direction) => {
                write!(f, "page has no {direction} link")
            }
            ApiError::SerializationError(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::DeserializationError(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
