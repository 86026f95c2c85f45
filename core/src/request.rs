//! Search requests for list endpoints.
//!
//! # Design
//! A `SearchRequest` names a resource family and carries an ordered bag of
//! query parameters. Parameter names are deliberately unvalidated: the
//! server defines the filter vocabulary (`filter[author]`,
//! `filter[meta_key]`, ...) and unknown keys pass through verbatim. An
//! invalid filter yields an empty result set from the server, not a client
//! error. Once built, a request is read-only.

use url::form_urlencoded;

/// A resource family exposed through a list endpoint. Terms are always
/// scoped to one taxonomy, so the slug travels with the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Posts,
    Taxonomies,
    Terms { taxonomy: String },
}

impl Resource {
    /// Endpoint path relative to the API root.
    pub fn path(&self) -> String {
        match self {
            Resource::Posts => "/posts".to_string(),
            Resource::Taxonomies => "/taxonomies".to_string(),
            Resource::Terms { taxonomy } => format!("/taxonomies/{taxonomy}/terms"),
        }
    }
}

/// An immutable list-endpoint query: resource family plus ordered
/// parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    resource: Resource,
    params: Vec<(String, String)>,
}

impl SearchRequest {
    pub fn builder(resource: Resource) -> SearchRequestBuilder {
        SearchRequestBuilder {
            resource,
            params: Vec::new(),
        }
    }

    /// An unfiltered posts query.
    pub fn posts() -> Self {
        Self::builder(Resource::Posts).build()
    }

    /// An unfiltered terms query for one taxonomy.
    pub fn terms(taxonomy: impl Into<String>) -> Self {
        Self::builder(Resource::Terms {
            taxonomy: taxonomy.into(),
        })
        .build()
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Rendered query string including the leading `?`, percent-encoded;
    /// empty when there are no parameters.
    pub fn query_string(&self) -> String {
        if self.params.is_empty() {
            return String::new();
        }
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter().map(|(n, v)| (n.as_str(), v.as_str())))
            .finish();
        format!("?{encoded}")
    }
}

/// Chaining builder for `SearchRequest`.
#[derive(Debug, Clone)]
pub struct SearchRequestBuilder {
    resource: Resource,
    params: Vec<(String, String)>,
}

impl SearchRequestBuilder {
    /// Add a named parameter, overwriting any earlier value for the same
    /// name. Insertion order is preserved.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.params.push((name, value)),
        }
        self
    }

    pub fn build(self) -> SearchRequest {
        SearchRequest {
            resource: self.resource,
            params: self.params,
        }
    }
}
