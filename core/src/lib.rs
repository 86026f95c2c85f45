//! Typed client for a WordPress-style content-management REST API.
//!
//! # Overview
//! Covers posts, post meta, taxonomies, and terms: authenticated CRUD,
//! typed JSON (de)serialization, and link-following pagination exposed as
//! an immutable [`PagedResponse`] cursor.
//!
//! # Design
//! - [`Endpoints`] is the stateless core: each operation is split into a
//!   `build_*` method producing an [`HttpRequest`] and a `parse_*` method
//!   consuming an [`HttpResponse`], so request construction and response
//!   interpretation are testable without any I/O.
//! - [`Client`] pairs that layer with a [`Transport`] implementation and
//!   exposes one blocking call per operation, including multi-round-trip
//!   ones like [`Client::get_terms`].
//! - Failures are classified, never swallowed: `NotFound` and
//!   `TermNotFound` for missing entities, `CreateFailed` with status and
//!   body for rejected writes, `Transport` for network-level errors. An
//!   empty filtered search is an empty page, not an error.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod types;

pub use client::Client;
pub use config::ClientConfig;
pub use endpoints::Endpoints;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use request::{Resource, SearchRequest, SearchRequestBuilder};
pub use response::{Direction, PagedResponse};
pub use types::{Post, PostMeta, RenderedText, Taxonomy, Term};
