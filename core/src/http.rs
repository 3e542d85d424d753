//! HTTP exchange metadata captured for diagnostics.
//!
//! # Design
//! These types describe the parts of a request and a response that end up in
//! a transcript: the start line and the ordered header list. Bodies are kept
//! separate because they are single-use byte sources that the formatter
//! consumes; `HttpRequest` and `HttpResponse` pair a head with an in-memory
//! body for hosts that buffer.
//!
//! All fields use owned types (`String`, `Vec`) so a snapshot outlives the
//! exchange it was taken from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::transcript::{escape_metadata, escape_metadata_bytes};

/// HTTP method for a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    /// Any other token, e.g. `PROPFIND` or `REPORT`.
    Other(String),
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Other(token) => token,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&http::Method> for HttpMethod {
    fn from(method: &http::Method) -> Self {
        match method.as_str() {
            "GET" => HttpMethod::Get,
            "HEAD" => HttpMethod::Head,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "PATCH" => HttpMethod::Patch,
            "DELETE" => HttpMethod::Delete,
            "OPTIONS" => HttpMethod::Options,
            other => HttpMethod::Other(other.to_string()),
        }
    }
}

/// Ordered header list. A name may occur several times; every value is kept
/// in the order it was appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First value for `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All values for `name` in their original order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Headers(iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect())
    }
}

impl From<Vec<(String, String)>> for Headers {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Headers(pairs)
    }
}

/// `HeaderMap` yields each name once per value, grouped by name. Values with
/// any byte outside 0x20-0x7e (tabs and obs-text included) are escaped.
impl From<&http::HeaderMap> for Headers {
    fn from(map: &http::HeaderMap) -> Self {
        map.iter()
            .map(|(name, value)| {
                let value = match value.to_str() {
                    Ok(text) => escape_metadata(text).into_owned(),
                    Err(_) => escape_metadata_bytes(value.as_bytes()),
                };
                (name.as_str().to_string(), value)
            })
            .collect()
    }
}

/// Start line and headers of a request. `path` is the encoded path only,
/// without query or fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHead {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Headers,
}

impl RequestHead {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Headers::new(),
        }
    }

    pub fn from_http<B>(request: &http::Request<B>) -> Self {
        Self {
            method: request.method().into(),
            path: request.uri().path().to_string(),
            headers: request.headers().into(),
        }
    }
}

/// Status line and headers of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHead {
    pub protocol: String,
    pub status: u16,
    pub message: String,
    pub headers: Headers,
}

impl ResponseHead {
    pub fn new(protocol: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            status,
            message: message.into(),
            headers: Headers::new(),
        }
    }

    /// The `http` crate carries no reason phrase, so the canonical one for
    /// the status is used (empty when there is none).
    pub fn from_http<B>(response: &http::Response<B>) -> Self {
        let status = response.status();
        Self {
            protocol: format!("{:?}", response.version()),
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or_default().to_string(),
            headers: response.headers().into(),
        }
    }
}

/// A request with its body buffered in memory.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub head: RequestHead,
    pub body: Option<Vec<u8>>,
}

/// A response with its body buffered in memory.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub head: ResponseHead,
    pub body: Option<Vec<u8>>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.head.status)
    }
}
