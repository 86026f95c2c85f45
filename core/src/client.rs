//! Transport-coupled client: complete operations over a live service.
//!
//! # Design
//! `Client` pairs the stateless [`Endpoints`] build/parse layer with a
//! [`Transport`] implementation and exposes one blocking method per API
//! operation. It holds no mutable state across calls, so a single instance
//! may be shared between concurrent callers as long as the transport is
//! concurrent-safe. No retry, caching, or connection pooling happens here;
//! transport failures surface as `ApiError::Transport`.

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::endpoints::Endpoints;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::request::SearchRequest;
use crate::response::{Direction, PagedResponse};
use crate::types::{Post, PostMeta, Taxonomy, Term};

/// Synchronous client for a WordPress-style REST API.
pub struct Client {
    endpoints: Endpoints,
    transport: Box<dyn Transport + Send + Sync>,
}

impl Client {
    /// Build a client from connection settings and a transport. The
    /// configuration is immutable for the client's lifetime.
    pub fn from_config(config: &ClientConfig, transport: Box<dyn Transport + Send + Sync>) -> Self {
        Self {
            endpoints: Endpoints::new(config),
            transport,
        }
    }

    /// The underlying build/parse layer, for callers that execute their own
    /// I/O.
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.transport
            .execute(request)
            .map_err(|e| ApiError::Transport(e.message))
    }

    // --- posts ---

    /// Fetch a single post. `NotFound` when the id does not resolve.
    pub fn get_post(&self, id: u64) -> Result<Post, ApiError> {
        let request = self.endpoints.build_get_post(id);
        self.endpoints.parse_get_post(self.execute(&request)?)
    }

    /// Fetch the first page of posts matching the search. A filter that
    /// matches nothing yields an empty page, not an error.
    pub fn fetch_posts(&self, search: &SearchRequest) -> Result<PagedResponse<Post>, ApiError> {
        self.get_paged_response(search)
    }

    /// Create a post. The returned representation carries the
    /// server-assigned id; rejection surfaces as `CreateFailed`.
    pub fn create_post(&self, post: &Post) -> Result<Post, ApiError> {
        let request = self.endpoints.build_create_post(post)?;
        self.endpoints.parse_create_post(self.execute(&request)?)
    }

    /// Update an existing post. The post must carry a server-assigned id.
    pub fn update_post(&self, post: &Post) -> Result<Post, ApiError> {
        let request = self.endpoints.build_update_post(post)?;
        self.endpoints.parse_update_post(self.execute(&request)?)
    }

    /// Delete a post, returning its now-deleted representation.
    pub fn delete_post(&self, post: &Post) -> Result<Post, ApiError> {
        let request = self.endpoints.build_delete_post(post)?;
        self.endpoints.parse_delete_post(self.execute(&request)?)
    }

    // --- post meta ---

    pub fn get_post_metas(&self, post_id: u64) -> Result<Vec<PostMeta>, ApiError> {
        let request = self.endpoints.build_get_post_metas(post_id);
        self.endpoints.parse_get_post_metas(self.execute(&request)?)
    }

    pub fn get_post_meta(&self, post_id: u64, meta_id: u64) -> Result<PostMeta, ApiError> {
        let request = self.endpoints.build_get_post_meta(post_id, meta_id);
        self.endpoints.parse_get_post_meta(self.execute(&request)?)
    }

    pub fn create_meta(&self, post_id: u64, key: &str, value: &str) -> Result<PostMeta, ApiError> {
        let request = self.endpoints.build_create_meta(post_id, key, value)?;
        self.endpoints.parse_create_meta(self.execute(&request)?)
    }

    /// Replace an existing meta entry's key and value.
    pub fn update_post_meta(
        &self,
        post_id: u64,
        meta_id: u64,
        key: &str,
        value: &str,
    ) -> Result<PostMeta, ApiError> {
        let request = self
            .endpoints
            .build_update_post_meta(post_id, meta_id, key, value)?;
        self.endpoints.parse_update_post_meta(self.execute(&request)?)
    }

    /// Delete a meta entry. `force` bypasses the service's soft-delete.
    pub fn delete_post_meta(
        &self,
        post_id: u64,
        meta_id: u64,
        force: bool,
    ) -> Result<bool, ApiError> {
        let request = self.endpoints.build_delete_post_meta(post_id, meta_id, force);
        self.endpoints.parse_delete_post_meta(self.execute(&request)?)
    }

    // --- taxonomies and terms ---

    pub fn get_taxonomies(&self) -> Result<Vec<Taxonomy>, ApiError> {
        let request = self.endpoints.build_get_taxonomies();
        self.endpoints.parse_get_taxonomies(self.execute(&request)?)
    }

    pub fn get_taxonomy(&self, slug: &str) -> Result<Taxonomy, ApiError> {
        let request = self.endpoints.build_get_taxonomy(slug);
        self.endpoints.parse_get_taxonomy(self.execute(&request)?)
    }

    /// Fetch the COMPLETE set of terms in a taxonomy: page one is fetched,
    /// then `next` links are followed until exhausted and the pages
    /// concatenated. Callers wanting page-level control should use
    /// `get_paged_response` and `traverse` instead.
    pub fn get_terms(&self, taxonomy: &str) -> Result<Vec<Term>, ApiError> {
        let mut page = self.get_paged_response::<Term>(&SearchRequest::terms(taxonomy))?;
        let mut terms = page.items().to_vec();
        while page.has_next() {
            page = self.traverse(&page, Direction::Next)?;
            terms.extend_from_slice(page.items());
        }
        Ok(terms)
    }

    /// Fetch a single term. `TermNotFound` when the id does not resolve in
    /// the taxonomy — including after the term has been deleted.
    pub fn get_term(&self, taxonomy: &str, id: u64) -> Result<Term, ApiError> {
        let request = self.endpoints.build_get_term(taxonomy, id);
        self.endpoints
            .parse_get_term(taxonomy, id, self.execute(&request)?)
    }

    /// Create a term in the taxonomy named by its `taxonomy_slug`.
    pub fn create_term(&self, term: &Term) -> Result<Term, ApiError> {
        let request = self.endpoints.build_create_term(term)?;
        self.endpoints.parse_create_term(self.execute(&request)?)
    }

    /// Delete a term, returning its now-deleted representation. A
    /// subsequent `get_term` on the same id fails with `TermNotFound`.
    pub fn delete_term(&self, term: &Term) -> Result<Term, ApiError> {
        let taxonomy = term.taxonomy_slug.as_deref().ok_or(ApiError::MissingTaxonomy)?;
        let id = term.id.ok_or(ApiError::MissingId)?;
        let request = self.endpoints.build_delete_term(term)?;
        self.endpoints
            .parse_delete_term(taxonomy, id, self.execute(&request)?)
    }

    // --- generic paged fetch and traversal ---

    /// The generalized list entry point every specific list operation
    /// reduces to.
    pub fn get_paged_response<T: DeserializeOwned>(
        &self,
        search: &SearchRequest,
    ) -> Result<PagedResponse<T>, ApiError> {
        let request = self.endpoints.build_list(search);
        let response = self.execute(&request)?;
        self.endpoints.parse_page(&request.url, response)
    }

    /// Fetch the page adjacent to `page` in the given direction. The input
    /// page is untouched; callers chain by reassignment. `MissingLink` when
    /// the page has no link that way, `NotFound` when the link has gone
    /// stale server-side.
    pub fn traverse<T: DeserializeOwned>(
        &self,
        page: &PagedResponse<T>,
        direction: Direction,
    ) -> Result<PagedResponse<T>, ApiError> {
        let request = self.endpoints.build_traverse(page, direction)?;
        let response = self.execute(&request)?;
        self.endpoints.parse_page(&request.url, response)
    }
}
