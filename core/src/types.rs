//! Entity models for the WordPress-style REST contract.
//!
//! # Design
//! These types mirror the server's JSON schema but are defined
//! independently of the mock-server crate; integration tests catch schema
//! drift. Every server-assigned field is an `Option` so the same type
//! serves both directions: a `Post` built locally has `id: None` until the
//! server assigns one on create. Serialization skips absent fields, and
//! unknown response fields are ignored for forward compatibility.
//!
//! The original API's entity builders carried no validation, so they are
//! replaced with `Default` plus struct-update syntax and a few small
//! constructors.

use serde::{Deserialize, Serialize};

/// A {raw, rendered} pair, the value object behind a post's title, content,
/// and excerpt. The server returns `rendered`; `raw` only appears in edit
/// contexts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedText {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
}

impl RenderedText {
    pub fn from_rendered(rendered: impl Into<String>) -> Self {
        Self {
            raw: None,
            rendered: Some(rendered.into()),
        }
    }
}

/// A post. `id` is absent until the server assigns one on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<RenderedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<RenderedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<RenderedText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// A single value within a taxonomy (a tag, a category). The wire name of
/// the owning taxonomy's slug is `taxonomy`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "taxonomy", skip_serializing_if = "Option::is_none")]
    pub taxonomy_slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl Term {
    /// A new, not-yet-created term in the given taxonomy.
    pub fn new(taxonomy_slug: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            taxonomy_slug: Some(taxonomy_slug.into()),
            ..Self::default()
        }
    }
}

/// A classification scheme under which terms are organized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub slug: String,
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A key/value annotation on a post. Scoped to its post by the endpoint
/// path; the body carries only the meta id, key, and value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub key: String,
    pub value: String,
}
