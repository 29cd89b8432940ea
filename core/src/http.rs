//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `ActivityLogClient` builds
//! `HttpRequest` values and parses `HttpResponse` values; whoever implements
//! `Transport` performs the actual round-trip. Owned `String`/`Vec` fields
//! keep the values easy to hand across the C ABI.

use crate::network::NetworkError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// An HTTP request described as plain data.
///
/// `path` is the absolute URL including the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// What a transport hands back: a response of any status, or a failure
/// that prevented one (timeout, refused connection, ...).
pub type HttpOutcome = Result<HttpResponse, NetworkError>;

/// Executes `HttpRequest` values against the network.
///
/// Implementations own timeouts, connection pooling and queuing. A
/// non-2xx status is still an `Ok(HttpResponse)`; only failures that
/// produced no response at all are `Err`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> HttpOutcome;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> HttpOutcome + Send + Sync,
{
    fn execute(&self, request: HttpRequest) -> HttpOutcome {
        self(request)
    }
}
