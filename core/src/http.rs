//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and parses `HttpResponse` values without
//! ever touching the network; the caller (host) executes the actual I/O with
//! whatever HTTP stack it already has.
//!
//! Query parameters are kept as ordered pairs next to the path rather than
//! pre-rendered into it, so hosts whose HTTP library has its own query API can
//! use the pairs directly. `HttpRequest::url` renders the percent-encoded URL
//! for everyone else.

use url::Url;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built by the `build_*` methods of `DirectusClient` and its services. The
/// caller is responsible for executing this request against the network and
/// returning the corresponding `HttpResponse`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Absolute URL without the query string.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Full URL with the query pairs percent-encoded in order.
    ///
    /// Falls back to naive concatenation only if `path` is not an absolute
    /// URL, which `DirectusClient` never produces.
    pub fn url(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        match Url::parse_with_params(&self.path, &self.query) {
            Ok(url) => url.into(),
            Err(_) => {
                let joined: Vec<String> = self.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
                format!("{}?{}", self.path, joined.join("&"))
            }
        }
    }

    /// Value of the first query pair named `key`.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the caller after executing an `HttpRequest`, then passed
/// to the matching `parse_*` method for deserialization.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
