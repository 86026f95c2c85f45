//! Full lifecycle tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port and drives the
//! transport-coupled `Client` over real HTTP using a ureq-backed
//! `Transport`. This validates request building, auth headers, status
//! classification, and `Link`-header pagination end to end.

use wp_core::{
    ApiError, Client, ClientConfig, Direction, HttpMethod, HttpRequest, HttpResponse, Post,
    RenderedText, Resource, SearchRequest, Term, Transport, TransportError,
};

/// `Transport` backed by ureq. Disables ureq's status-code-as-error
/// behavior so 4xx/5xx responses come back as data for the client to
/// classify.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match (request.method, &request.body) {
            (HttpMethod::Get, _) => {
                let mut r = self.agent.get(&request.url);
                for (name, value) in &request.headers {
                    r = r.header(name.as_str(), value.as_str());
                }
                r.call()
            }
            (HttpMethod::Delete, _) => {
                let mut r = self.agent.delete(&request.url);
                for (name, value) in &request.headers {
                    r = r.header(name.as_str(), value.as_str());
                }
                r.call()
            }
            (HttpMethod::Post, body) => {
                let mut r = self.agent.post(&request.url);
                for (name, value) in &request.headers {
                    r = r.header(name.as_str(), value.as_str());
                }
                match body {
                    Some(body) => r.send(body.as_bytes()),
                    None => r.send_empty(),
                }
            }
            (HttpMethod::Put, body) => {
                let mut r = self.agent.put(&request.url);
                for (name, value) in &request.headers {
                    r = r.header(name.as_str(), value.as_str());
                }
                match body {
                    Some(body) => r.send(body.as_bytes()),
                    None => r.send_empty(),
                }
            }
        };
        let mut response = result.map_err(|e| TransportError {
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response.body_mut().read_to_string().unwrap_or_default();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Start the mock server on a random port; returns its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn client_for(base_url: &str) -> Client {
    let config = ClientConfig::new(base_url).with_credentials("admin", "secret");
    Client::from_config(&config, Box::new(UreqTransport::new()))
}

fn post_with_content(title: &str, content: &str, excerpt: &str) -> Post {
    Post {
        title: Some(RenderedText::from_rendered(title)),
        content: Some(RenderedText::from_rendered(content)),
        excerpt: Some(RenderedText::from_rendered(excerpt)),
        ..Post::default()
    }
}

fn rendered(text: &Option<RenderedText>) -> &str {
    text.as_ref()
        .and_then(|t| t.rendered.as_deref())
        .unwrap_or_default()
}

#[test]
fn post_crud_lifecycle() {
    let client = client_for(&start_server());

    // create — the server assigns an id and echoes the supplied fields
    let created = client
        .create_post(&post_with_content(
            "Hello, World!",
            "<p>This is the sandbox</p>\n",
            "This is...",
        ))
        .unwrap();
    assert!(created.id.is_some());
    assert_eq!(rendered(&created.title), "Hello, World!");
    assert_eq!(rendered(&created.content), "<p>This is the sandbox</p>\n");
    let id = created.id.unwrap();

    // immediately retrievable with the same fields
    let fetched = client.get_post(id).unwrap();
    assert_eq!(fetched.title, created.title);
    assert_eq!(fetched.content, created.content);

    // update content and excerpt; old values must not survive
    let mut changed = fetched.clone();
    changed.content = Some(RenderedText::from_rendered("replacement content"));
    changed.excerpt = Some(RenderedText::from_rendered("replacement excerpt"));
    let updated = client.update_post(&changed).unwrap();
    assert_eq!(rendered(&updated.content), "replacement content");
    assert_eq!(rendered(&updated.excerpt), "replacement excerpt");

    let refetched = client.get_post(id).unwrap();
    assert_eq!(rendered(&refetched.content), "replacement content");

    // delete returns the deleted representation
    let deleted = client.delete_post(&updated).unwrap();
    assert_eq!(deleted.id, Some(id));

    // the id is no longer valid
    let err = client.get_post(id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    let err = client.update_post(&updated).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[test]
fn create_post_rejection_is_a_create_failure() {
    let client = client_for(&start_server());

    let err = client.create_post(&Post::default()).unwrap_err();
    match err {
        ApiError::CreateFailed { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("empty_content"));
        }
        other => panic!("expected CreateFailed, got {other:?}"),
    }
}

#[test]
fn search_filters_narrow_the_result_list() {
    let client = client_for(&start_server());

    let first = client
        .create_post(&post_with_content("one", "body one", "..."))
        .unwrap();
    client
        .create_post(&post_with_content("two", "body two", "..."))
        .unwrap();
    client
        .create_meta(first.id.unwrap(), "pKlRn", "v")
        .unwrap();

    // unknown author matches nothing — empty list, not an error
    let search = SearchRequest::builder(Resource::Posts)
        .with_param("filter[author]", "999")
        .build();
    let page = client.fetch_posts(&search).unwrap();
    assert!(page.items().is_empty());

    // the default author matches everything
    let search = SearchRequest::builder(Resource::Posts)
        .with_param("filter[author]", "1")
        .build();
    let page = client.fetch_posts(&search).unwrap();
    assert_eq!(page.items().len(), 2);

    // exactly one post carries the meta key
    let search = SearchRequest::builder(Resource::Posts)
        .with_param("filter[meta_key]", "pKlRn")
        .build();
    let page = client.fetch_posts(&search).unwrap();
    assert_eq!(page.items().len(), 1);
    assert_eq!(page.items()[0].id, first.id);
}

#[test]
fn paged_traversal_visits_every_post() {
    let base_url = start_server();
    let client = client_for(&base_url);

    for i in 0..25 {
        client
            .create_post(&post_with_content(&format!("post {i}"), "body", "..."))
            .unwrap();
    }

    // server pages at 10 by default
    let first = client.fetch_posts(&SearchRequest::posts()).unwrap();
    assert_eq!(first.items().len(), 10);
    assert!(first.has_next());
    assert!(!first.has_previous());
    assert_eq!(
        first.self_url(),
        format!("{base_url}/wp-json/wp/v2/posts")
    );

    let mut collected = first.items().len();
    let mut pages = 1;
    let mut page = first;
    while page.has_next() {
        page = client.traverse(&page, Direction::Next).unwrap();
        collected += page.items().len();
        pages += 1;
    }
    assert_eq!(pages, 3);
    assert_eq!(collected, 25);
    assert!(!page.has_next());
    assert!(page.has_previous());

    // and back one step
    let previous = client.traverse(&page, Direction::Previous).unwrap();
    assert_eq!(previous.items().len(), 10);
}

#[test]
fn stale_next_link_surfaces_as_not_found() {
    let client = client_for(&start_server());

    let mut created = Vec::new();
    for i in 0..11 {
        created.push(
            client
                .create_post(&post_with_content(&format!("post {i}"), "body", "..."))
                .unwrap(),
        );
    }

    let first = client.fetch_posts(&SearchRequest::posts()).unwrap();
    assert!(first.has_next());

    // shrink the collection so page 2 no longer exists
    for post in &created[1..] {
        client.delete_post(post).unwrap();
    }

    let err = client.traverse(&first, Direction::Next).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[test]
fn post_meta_lifecycle() {
    let client = client_for(&start_server());

    let post = client
        .create_post(&post_with_content("meta host", "body", "..."))
        .unwrap();
    let post_id = post.id.unwrap();

    assert!(client.get_post_metas(post_id).unwrap().is_empty());

    let created = client.create_meta(post_id, "k1", "v1").unwrap();
    assert!(created.id.is_some());
    assert_eq!(created.key, "k1");
    assert_eq!(created.value, "v1");
    let meta_id = created.id.unwrap();

    let metas = client.get_post_metas(post_id).unwrap();
    assert_eq!(metas.len(), 1);

    // full replace; the old pair must not be readable afterwards
    let updated = client
        .update_post_meta(post_id, meta_id, "k2", "v2")
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.key, "k2");
    assert_eq!(updated.value, "v2");
    assert_ne!(updated.key, created.key);
    assert_ne!(updated.value, created.value);

    let refetched = client.get_post_meta(post_id, meta_id).unwrap();
    assert_eq!(refetched.key, "k2");
    assert_eq!(refetched.value, "v2");

    assert!(client.delete_post_meta(post_id, meta_id, true).unwrap());
    let err = client.get_post_meta(post_id, meta_id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[test]
fn taxonomy_and_term_flows() {
    let client = client_for(&start_server());

    let taxonomies = client.get_taxonomies().unwrap();
    assert!(taxonomies.iter().any(|t| t.slug == "category"));

    let category = client.get_taxonomy("category").unwrap();
    assert_eq!(category.slug, "category");

    // enough terms to span two server pages; get_terms must return all
    for i in 0..12 {
        client
            .create_term(&Term::new("category", format!("term {i}")))
            .unwrap();
    }
    let terms = client.get_terms("category").unwrap();
    assert_eq!(terms.len(), 12);

    let first = &terms[0];
    let fetched = client.get_term("category", first.id.unwrap()).unwrap();
    assert_eq!(fetched.id, first.id);
    assert_eq!(fetched.name, first.name);

    // page-level access through the generic entry point
    let page = client
        .get_paged_response::<Term>(&SearchRequest::terms("category"))
        .unwrap();
    assert_eq!(page.items().len(), 10);
    assert!(page.has_next());
}

#[test]
fn deleted_term_is_gone_for_good() {
    let client = client_for(&start_server());

    let tag = client.create_term(&Term::new("post_tag", "abc")).unwrap();
    assert!(tag.id.is_some());
    assert_eq!(tag.name, "abc");
    let id = tag.id.unwrap();

    let deleted = client.delete_term(&tag).unwrap();
    assert_eq!(deleted.id, Some(id));

    let err = client.get_term("post_tag", id).unwrap_err();
    match err {
        ApiError::TermNotFound { taxonomy, id: missing } => {
            assert_eq!(taxonomy, "post_tag");
            assert_eq!(missing, id);
        }
        other => panic!("expected TermNotFound, got {other:?}"),
    }
}

#[test]
fn unreachable_server_is_a_transport_failure() {
    // nothing listens on port 9 (discard)
    let config = ClientConfig::new("http://127.0.0.1:9");
    let client = Client::from_config(&config, Box::new(UreqTransport::new()));
    let err = client.get_post(1).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
