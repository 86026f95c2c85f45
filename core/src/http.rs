//! HTTP boundary types and the transport seam.
//!
//! # Design
//! `HttpRequest` and `HttpResponse` describe HTTP traffic as plain data.
//! The endpoints layer builds requests and parses responses without ever
//! touching the network; a `Transport` implementation executes the actual
//! round-trip. This keeps request construction and response interpretation
//! deterministic and testable without a server.
//!
//! All fields use owned types (`String`, `Vec`) so values can move freely
//! between the client and whatever executes the I/O.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An HTTP request described as plain data.
///
/// Built by the endpoints layer. `url` is absolute, including the API
/// context path and any query string.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
///
/// Produced by a `Transport` after executing an `HttpRequest`, then handed
/// to the endpoints layer for status interpretation and deserialization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Look up a header value by name, case-insensitively. Returns the first
    /// match; the pagination `Link` header is the main consumer.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A network-level failure from the transport: DNS, connection refused,
/// timeout. Never a non-2xx status — those come back as `HttpResponse`
/// data for the endpoints layer to classify.
#[derive(Debug)]
pub struct TransportError {
    pub message: String,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport failure: {}", self.message)
    }
}

impl std::error::Error for TransportError {}

/// Executes HTTP round-trips on behalf of the client.
///
/// Implementations must return every response the server produced,
/// including 4xx/5xx, as an `HttpResponse`; `Err` is reserved for failures
/// where no response exists. Retry and timeout policy belong to the
/// implementation, not the client.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}
