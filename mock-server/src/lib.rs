//! In-memory WordPress-like REST fixture used by the client's tests.
//!
//! Serves posts, post meta, taxonomies, and terms under `/wp-json/wp/v2`
//! with WordPress conventions: created resources come back with a
//! server-assigned integer id, deletes return the deleted representation,
//! list endpoints honor `page`/`per_page` and advertise adjacent pages in a
//! `Link` header, and `filter[author]`/`filter[meta_key]` narrow post
//! lists. Trash semantics for meta deletion are flattened: with or without
//! `?force=true` the entry is gone afterward.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use url::form_urlencoded;

/// API context path, the versioned root all routes live under.
pub const CONTEXT: &str = "/wp-json/wp/v2";

/// Default page size for list endpoints.
pub const PER_PAGE: usize = 10;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Post {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Rendered>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Rendered>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<Rendered>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Meta {
    pub id: u64,
    pub key: String,
    pub value: String,
}

#[derive(Deserialize)]
pub struct MetaInput {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Taxonomy {
    pub slug: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Term {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

/// Backing store. `BTreeMap` keeps listings in id order so pagination is
/// deterministic.
#[derive(Default)]
pub struct Db {
    posts: BTreeMap<u64, Post>,
    metas: BTreeMap<u64, BTreeMap<u64, Meta>>,
    taxonomies: BTreeMap<String, Taxonomy>,
    terms: BTreeMap<String, BTreeMap<u64, Term>>,
    next_id: u64,
}

impl Db {
    fn seeded() -> Self {
        let mut db = Self::default();
        for (slug, name) in [("category", "Categories"), ("post_tag", "Tags")] {
            db.taxonomies.insert(
                slug.to_string(),
                Taxonomy {
                    slug: slug.to_string(),
                    name: name.to_string(),
                    description: None,
                },
            );
            db.terms.insert(slug.to_string(), BTreeMap::new());
        }
        db
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type SharedDb = Arc<RwLock<Db>>;

pub fn app() -> Router {
    let db: SharedDb = Arc::new(RwLock::new(Db::seeded()));
    let api = Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post).post(update_post).delete(delete_post),
        )
        .route("/posts/{id}/meta", get(list_metas).post(create_meta))
        .route(
            "/posts/{id}/meta/{meta_id}",
            get(get_meta).post(update_meta).delete(delete_meta),
        )
        .route("/taxonomies", get(list_taxonomies))
        .route("/taxonomies/{slug}", get(get_taxonomy))
        .route(
            "/taxonomies/{slug}/terms",
            get(list_terms).post(create_term),
        )
        .route(
            "/taxonomies/{slug}/terms/{id}",
            get(get_term).delete(delete_term),
        )
        .with_state(db);
    Router::new().nest(CONTEXT, api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- posts ---

async fn list_posts(
    State(db): State<SharedDb>,
    headers: HeaderMap,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let db = db.read().await;
    let mut posts: Vec<Post> = db.posts.values().cloned().collect();
    if let Some(author) = params.get("filter[author]") {
        posts.retain(|p| p.author.is_some_and(|a| a.to_string() == *author));
    }
    if let Some(key) = params.get("filter[meta_key]") {
        posts.retain(|p| {
            p.id.is_some_and(|id| {
                db.metas
                    .get(&id)
                    .is_some_and(|metas| metas.values().any(|m| m.key == *key))
            })
        });
    }
    paged(&headers, "/posts", &params, posts)
}

async fn create_post(
    State(db): State<SharedDb>,
    headers: HeaderMap,
    Json(input): Json<Post>,
) -> Response {
    if input.title.is_none() && input.content.is_none() && input.excerpt.is_none() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "empty_content",
            "Content, title, and excerpt are empty.",
        );
    }
    let mut db = db.write().await;
    let id = db.allocate_id();
    let mut post = input;
    post.id = Some(id);
    if post.author.is_none() {
        post.author = Some(1);
    }
    if post.status.is_none() {
        post.status = Some("draft".to_string());
    }
    post.link = Some(format!("http://{}/?p={id}", host_of(&headers)));
    db.posts.insert(id, post.clone());
    (StatusCode::CREATED, Json(post)).into_response()
}

async fn get_post(State(db): State<SharedDb>, Path(id): Path<u64>) -> Response {
    match db.read().await.posts.get(&id) {
        Some(post) => Json(post.clone()).into_response(),
        None => post_not_found(),
    }
}

async fn update_post(
    State(db): State<SharedDb>,
    Path(id): Path<u64>,
    Json(input): Json<Post>,
) -> Response {
    let mut db = db.write().await;
    let Some(post) = db.posts.get_mut(&id) else {
        return post_not_found();
    };
    if let Some(title) = input.title {
        post.title = Some(title);
    }
    if let Some(content) = input.content {
        post.content = Some(content);
    }
    if let Some(excerpt) = input.excerpt {
        post.excerpt = Some(excerpt);
    }
    if let Some(slug) = input.slug {
        post.slug = Some(slug);
    }
    if let Some(status) = input.status {
        post.status = Some(status);
    }
    if let Some(author) = input.author {
        post.author = Some(author);
    }
    Json(post.clone()).into_response()
}

async fn delete_post(State(db): State<SharedDb>, Path(id): Path<u64>) -> Response {
    let mut db = db.write().await;
    match db.posts.remove(&id) {
        Some(post) => {
            db.metas.remove(&id);
            Json(post).into_response()
        }
        None => post_not_found(),
    }
}

// --- post meta ---

async fn list_metas(State(db): State<SharedDb>, Path(id): Path<u64>) -> Response {
    let db = db.read().await;
    if !db.posts.contains_key(&id) {
        return post_not_found();
    }
    let metas: Vec<Meta> = db
        .metas
        .get(&id)
        .map(|m| m.values().cloned().collect())
        .unwrap_or_default();
    Json(metas).into_response()
}

async fn create_meta(
    State(db): State<SharedDb>,
    Path(id): Path<u64>,
    Json(input): Json<MetaInput>,
) -> Response {
    let mut db = db.write().await;
    if !db.posts.contains_key(&id) {
        return post_not_found();
    }
    let meta_id = db.allocate_id();
    let meta = Meta {
        id: meta_id,
        key: input.key,
        value: input.value,
    };
    db.metas.entry(id).or_default().insert(meta_id, meta.clone());
    (StatusCode::CREATED, Json(meta)).into_response()
}

async fn get_meta(State(db): State<SharedDb>, Path((id, meta_id)): Path<(u64, u64)>) -> Response {
    let db = db.read().await;
    match db.metas.get(&id).and_then(|m| m.get(&meta_id)) {
        Some(meta) => Json(meta.clone()).into_response(),
        None => meta_not_found(),
    }
}

async fn update_meta(
    State(db): State<SharedDb>,
    Path((id, meta_id)): Path<(u64, u64)>,
    Json(input): Json<MetaInput>,
) -> Response {
    let mut db = db.write().await;
    let Some(meta) = db.metas.get_mut(&id).and_then(|m| m.get_mut(&meta_id)) else {
        return meta_not_found();
    };
    meta.key = input.key;
    meta.value = input.value;
    Json(meta.clone()).into_response()
}

async fn delete_meta(
    State(db): State<SharedDb>,
    Path((id, meta_id)): Path<(u64, u64)>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let forced = params.get("force").is_some_and(|v| v == "true");
    let mut db = db.write().await;
    match db.metas.get_mut(&id).and_then(|m| m.remove(&meta_id)) {
        Some(_) => Json(json!({ "deleted": true, "forced": forced })).into_response(),
        None => meta_not_found(),
    }
}

// --- taxonomies and terms ---

async fn list_taxonomies(State(db): State<SharedDb>) -> Response {
    let taxonomies: Vec<Taxonomy> = db.read().await.taxonomies.values().cloned().collect();
    Json(taxonomies).into_response()
}

async fn get_taxonomy(State(db): State<SharedDb>, Path(slug): Path<String>) -> Response {
    match db.read().await.taxonomies.get(&slug) {
        Some(taxonomy) => Json(taxonomy.clone()).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            "rest_taxonomy_invalid",
            "Invalid taxonomy.",
        ),
    }
}

async fn list_terms(
    State(db): State<SharedDb>,
    headers: HeaderMap,
    Path(slug): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let db = db.read().await;
    let Some(terms) = db.terms.get(&slug) else {
        return error_response(
            StatusCode::NOT_FOUND,
            "rest_taxonomy_invalid",
            "Invalid taxonomy.",
        );
    };
    let terms: Vec<Term> = terms.values().cloned().collect();
    paged(&headers, &format!("/taxonomies/{slug}/terms"), &params, terms)
}

async fn create_term(
    State(db): State<SharedDb>,
    Path(slug): Path<String>,
    Json(input): Json<Term>,
) -> Response {
    let mut db = db.write().await;
    if !db.taxonomies.contains_key(&slug) {
        return error_response(
            StatusCode::NOT_FOUND,
            "rest_taxonomy_invalid",
            "Invalid taxonomy.",
        );
    }
    if input.name.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "empty_term_name",
            "A name is required for this term.",
        );
    }
    let id = db.allocate_id();
    let term = Term {
        id: Some(id),
        slug: Some(input.name.to_lowercase().replace(' ', "-")),
        taxonomy: Some(slug.clone()),
        count: Some(0),
        name: input.name,
        description: input.description,
    };
    db.terms
        .entry(slug)
        .or_default()
        .insert(id, term.clone());
    (StatusCode::CREATED, Json(term)).into_response()
}

async fn get_term(State(db): State<SharedDb>, Path((slug, id)): Path<(String, u64)>) -> Response {
    match db.read().await.terms.get(&slug).and_then(|t| t.get(&id)) {
        Some(term) => Json(term.clone()).into_response(),
        None => term_not_found(),
    }
}

async fn delete_term(
    State(db): State<SharedDb>,
    Path((slug, id)): Path<(String, u64)>,
) -> Response {
    let mut db = db.write().await;
    match db.terms.get_mut(&slug).and_then(|t| t.remove(&id)) {
        Some(term) => Json(term).into_response(),
        None => term_not_found(),
    }
}

// --- pagination and error plumbing ---

/// Page slice bounds: `(start, end, total_pages)`, or `None` when the page
/// is past the end. An empty collection still has one (empty) page.
fn page_bounds(total: usize, page: usize, per_page: usize) -> Option<(usize, usize, usize)> {
    let total_pages = total.div_ceil(per_page).max(1);
    if page == 0 || page > total_pages {
        return None;
    }
    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total);
    Some((start, end, total_pages))
}

fn paged<T: Serialize>(
    headers: &HeaderMap,
    path: &str,
    params: &BTreeMap<String, String>,
    items: Vec<T>,
) -> Response {
    let page = numeric_param(params, "page", 1);
    // per_page=0 would divide by zero in page_bounds
    let per_page = numeric_param(params, "per_page", PER_PAGE).max(1);
    let Some((start, end, total_pages)) = page_bounds(items.len(), page, per_page) else {
        return error_response(
            StatusCode::NOT_FOUND,
            "rest_invalid_page_number",
            "The page number requested is larger than the number of pages available.",
        );
    };

    let mut links = Vec::new();
    if page > 1 {
        links.push(page_link(headers, path, params, page - 1, "prev"));
    }
    if page < total_pages {
        links.push(page_link(headers, path, params, page + 1, "next"));
    }
    let mut response_headers = HeaderMap::new();
    if !links.is_empty() {
        if let Ok(value) = HeaderValue::try_from(links.join(", ")) {
            response_headers.insert(header::LINK, value);
        }
    }

    let page_items: Vec<T> = items.into_iter().skip(start).take(end - start).collect();
    (response_headers, Json(page_items)).into_response()
}

/// One `Link` header segment pointing at another page of the same query.
fn page_link(
    headers: &HeaderMap,
    path: &str,
    params: &BTreeMap<String, String>,
    page: usize,
    rel: &str,
) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (name, value) in params {
        if name != "page" {
            query.append_pair(name, value);
        }
    }
    query.append_pair("page", &page.to_string());
    format!(
        "<http://{}{CONTEXT}{path}?{}>; rel=\"{rel}\"",
        host_of(headers),
        query.finish()
    )
}

fn numeric_param(params: &BTreeMap<String, String>, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn host_of(headers: &HeaderMap) -> &str {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("127.0.0.1")
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({ "code": code, "message": message }))).into_response()
}

fn post_not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "rest_post_invalid_id",
        "Invalid post ID.",
    )
}

fn meta_not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "rest_meta_invalid_id",
        "Invalid meta ID.",
    )
}

fn term_not_found() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "rest_term_invalid",
        "Term does not exist.",
    )
}
