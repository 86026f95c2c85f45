//! Stateless request builder and response parser for every API operation.
//!
//! # Design
//! `Endpoints` holds only the API root URL and a precomputed auth header.
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`,
//! so the I/O boundary stays explicit and every operation can be tested
//! without a network. The transport-coupled [`crate::client::Client`]
//! pairs them up.
//!
//! All list operations reduce to `build_list` + `parse_page`: that pair is
//! the one place pagination wrapping lives.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::request::SearchRequest;
use crate::response::{parse_link_header, Direction, PagedResponse};
use crate::types::{Post, PostMeta, Taxonomy, Term};

/// Stateless build/parse layer for the API. Carries no mutable state; safe
/// to share and clone freely.
#[derive(Debug, Clone)]
pub struct Endpoints {
    api_root: String,
    auth_header: Option<String>,
}

impl Endpoints {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            api_root: config.api_root(),
            auth_header: config.auth_header(),
        }
    }

    fn request(&self, method: HttpMethod, url: String, body: Option<String>) -> HttpRequest {
        let mut headers = Vec::new();
        if let Some(auth) = &self.auth_header {
            headers.push(("authorization".to_string(), auth.clone()));
        }
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    fn get(&self, url: String) -> HttpRequest {
        self.request(HttpMethod::Get, url, None)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path)
    }

    // --- posts ---

    pub fn build_get_post(&self, id: u64) -> HttpRequest {
        self.get(self.url(&format!("/posts/{id}")))
    }

    pub fn parse_get_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        check_fetch(&response)?;
        decode(&response)
    }

    pub fn build_create_post(&self, post: &Post) -> Result<HttpRequest, ApiError> {
        let body = encode(post)?;
        Ok(self.request(HttpMethod::Post, self.url("/posts"), Some(body)))
    }

    pub fn parse_create_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        check_create(&response)?;
        decode(&response)
    }

    pub fn build_update_post(&self, post: &Post) -> Result<HttpRequest, ApiError> {
        let id = post.id.ok_or(ApiError::MissingId)?;
        let body = encode(post)?;
        Ok(self.request(HttpMethod::Post, self.url(&format!("/posts/{id}")), Some(body)))
    }

    pub fn parse_update_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        check_update(&response)?;
        decode(&response)
    }

    pub fn build_delete_post(&self, post: &Post) -> Result<HttpRequest, ApiError> {
        let id = post.id.ok_or(ApiError::MissingId)?;
        Ok(self.request(HttpMethod::Delete, self.url(&format!("/posts/{id}")), None))
    }

    /// The delete endpoint returns the deleted post's prior representation.
    pub fn parse_delete_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        check_fetch(&response)?;
        decode(&response)
    }

    // --- post meta ---

    pub fn build_get_post_metas(&self, post_id: u64) -> HttpRequest {
        self.get(self.url(&format!("/posts/{post_id}/meta")))
    }

    pub fn parse_get_post_metas(&self, response: HttpResponse) -> Result<Vec<PostMeta>, ApiError> {
        check_fetch(&response)?;
        decode(&response)
    }

    pub fn build_get_post_meta(&self, post_id: u64, meta_id: u64) -> HttpRequest {
        self.get(self.url(&format!("/posts/{post_id}/meta/{meta_id}")))
    }

    pub fn parse_get_post_meta(&self, response: HttpResponse) -> Result<PostMeta, ApiError> {
        check_fetch(&response)?;
        decode(&response)
    }

    pub fn build_create_meta(
        &self,
        post_id: u64,
        key: &str,
        value: &str,
    ) -> Result<HttpRequest, ApiError> {
        let body = encode(&PostMeta {
            id: None,
            key: key.to_string(),
            value: value.to_string(),
        })?;
        Ok(self.request(
            HttpMethod::Post,
            self.url(&format!("/posts/{post_id}/meta")),
            Some(body),
        ))
    }

    pub fn parse_create_meta(&self, response: HttpResponse) -> Result<PostMeta, ApiError> {
        check_create(&response)?;
        decode(&response)
    }

    /// Full replace of key and value on an existing meta entry.
    pub fn build_update_post_meta(
        &self,
        post_id: u64,
        meta_id: u64,
        key: &str,
        value: &str,
    ) -> Result<HttpRequest, ApiError> {
        let body = encode(&PostMeta {
            id: Some(meta_id),
            key: key.to_string(),
            value: value.to_string(),
        })?;
        Ok(self.request(
            HttpMethod::Post,
            self.url(&format!("/posts/{post_id}/meta/{meta_id}")),
            Some(body),
        ))
    }

    pub fn parse_update_post_meta(&self, response: HttpResponse) -> Result<PostMeta, ApiError> {
        check_update(&response)?;
        decode(&response)
    }

    pub fn build_delete_post_meta(&self, post_id: u64, meta_id: u64, force: bool) -> HttpRequest {
        let mut url = self.url(&format!("/posts/{post_id}/meta/{meta_id}"));
        if force {
            url.push_str("?force=true");
        }
        self.request(HttpMethod::Delete, url, None)
    }

    pub fn parse_delete_post_meta(&self, response: HttpResponse) -> Result<bool, ApiError> {
        check_fetch(&response)?;
        Ok(true)
    }

    // --- taxonomies and terms ---

    pub fn build_get_taxonomies(&self) -> HttpRequest {
        self.get(self.url("/taxonomies"))
    }

    pub fn parse_get_taxonomies(&self, response: HttpResponse) -> Result<Vec<Taxonomy>, ApiError> {
        check_fetch(&response)?;
        decode(&response)
    }

    pub fn build_get_taxonomy(&self, slug: &str) -> HttpRequest {
        self.get(self.url(&format!("/taxonomies/{slug}")))
    }

    pub fn parse_get_taxonomy(&self, response: HttpResponse) -> Result<Taxonomy, ApiError> {
        check_fetch(&response)?;
        decode(&response)
    }

    pub fn build_get_term(&self, taxonomy: &str, id: u64) -> HttpRequest {
        self.get(self.url(&format!("/taxonomies/{taxonomy}/terms/{id}")))
    }

    pub fn parse_get_term(
        &self,
        taxonomy: &str,
        id: u64,
        response: HttpResponse,
    ) -> Result<Term, ApiError> {
        check_term_fetch(taxonomy, id, &response)?;
        decode(&response)
    }

    pub fn build_create_term(&self, term: &Term) -> Result<HttpRequest, ApiError> {
        let taxonomy = term.taxonomy_slug.as_deref().ok_or(ApiError::MissingTaxonomy)?;
        let body = encode(term)?;
        Ok(self.request(
            HttpMethod::Post,
            self.url(&format!("/taxonomies/{taxonomy}/terms")),
            Some(body),
        ))
    }

    pub fn parse_create_term(&self, response: HttpResponse) -> Result<Term, ApiError> {
        check_create(&response)?;
        decode(&response)
    }

    pub fn build_delete_term(&self, term: &Term) -> Result<HttpRequest, ApiError> {
        let taxonomy = term.taxonomy_slug.as_deref().ok_or(ApiError::MissingTaxonomy)?;
        let id = term.id.ok_or(ApiError::MissingId)?;
        Ok(self.request(
            HttpMethod::Delete,
            self.url(&format!("/taxonomies/{taxonomy}/terms/{id}")),
            None,
        ))
    }

    /// The delete endpoint returns the deleted term's prior representation.
    pub fn parse_delete_term(
        &self,
        taxonomy: &str,
        id: u64,
        response: HttpResponse,
    ) -> Result<Term, ApiError> {
        check_term_fetch(taxonomy, id, &response)?;
        decode(&response)
    }

    // --- lists and traversal ---

    pub fn build_list(&self, search: &SearchRequest) -> HttpRequest {
        let url = format!(
            "{}{}",
            self.url(&search.resource().path()),
            search.query_string()
        );
        self.get(url)
    }

    /// Request the adjacent page in the given direction. Fails with
    /// `MissingLink` when the current page carries no link that way.
    pub fn build_traverse<T>(
        &self,
        page: &PagedResponse<T>,
        direction: Direction,
    ) -> Result<HttpRequest, ApiError> {
        let url = page
            .link(direction)
            .ok_or(ApiError::MissingLink(direction))?;
        Ok(self.get(url.to_string()))
    }

    /// Wrap a list response body into a page. `self_url` is the URL that
    /// produced the response; adjacent-page links come from the `Link`
    /// header. A stale link that no longer resolves surfaces as `NotFound`,
    /// never as an empty page.
    pub fn parse_page<T: DeserializeOwned>(
        &self,
        self_url: &str,
        response: HttpResponse,
    ) -> Result<PagedResponse<T>, ApiError> {
        check_fetch(&response)?;
        let items: Vec<T> = decode(&response)?;
        let (next, previous) = response
            .header("link")
            .map(parse_link_header)
            .unwrap_or((None, None));
        Ok(PagedResponse::new(items, self_url, next, previous))
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Read path: 200 expected, 404 is `NotFound`, anything else `HttpError`.
fn check_fetch(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200 => Ok(()),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

/// Term read path: 404 becomes the named `TermNotFound` condition.
fn check_term_fetch(taxonomy: &str, id: u64, response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200 => Ok(()),
        404 => Err(ApiError::TermNotFound {
            taxonomy: taxonomy.to_string(),
            id,
        }),
        status => Err(ApiError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

/// Create path: any rejection keeps status and body for diagnosis.
fn check_create(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200 | 201 => Ok(()),
        status => Err(ApiError::CreateFailed {
            status,
            body: response.body.clone(),
        }),
    }
}

/// Update path: 404 means the id is gone; other rejections read as a
/// failed write.
fn check_update(response: &HttpResponse) -> Result<(), ApiError> {
    match response.status {
        200 => Ok(()),
        404 => Err(ApiError::NotFound),
        status => Err(ApiError::CreateFailed {
            status,
            body: response.body.clone(),
        }),
    }
}
