//! The error returned when an HTTP exchange fails.
//!
//! # Design
//! `HttpError` keeps printable transcripts of the failing request and
//! response next to the status, so the whole exchange can be logged or
//! attached to a bug report after the connection is gone. Transcripts are
//! plain strings computed once at construction, which is what lets the error
//! derive `Serialize`/`Deserialize` and cross process boundaries.

use std::io::Read;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::http::{HttpRequest, HttpResponse, RequestHead, ResponseHead};
use crate::transcript::{format_request, format_response};

/// Coarse classification of an [`HttpError`] by status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpErrorKind {
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 409
    Conflict,
    /// 412, typically a failed `If-Match` / `If-None-Match`.
    PreconditionFailed,
    /// 503; see [`HttpError::retry_after`].
    ServiceUnavailable,
    /// Any other 4xx.
    Client,
    /// Any other 5xx.
    Server,
    /// A status outside 4xx/5xx that the caller did not expect.
    Unexpected,
    /// No response status: the exchange failed below HTTP.
    Transport,
}

impl HttpErrorKind {
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            None => HttpErrorKind::Transport,
            Some(401) => HttpErrorKind::Unauthorized,
            Some(403) => HttpErrorKind::Forbidden,
            Some(404) => HttpErrorKind::NotFound,
            Some(409) => HttpErrorKind::Conflict,
            Some(412) => HttpErrorKind::PreconditionFailed,
            Some(503) => HttpErrorKind::ServiceUnavailable,
            Some(400..=499) => HttpErrorKind::Client,
            Some(500..=599) => HttpErrorKind::Server,
            Some(_) => HttpErrorKind::Unexpected,
        }
    }
}

/// Value of a `Retry-After` response header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetryAfter {
    /// Delay in seconds.
    Seconds(u64),
    /// Absolute point in time, from an HTTP-date.
    Date(SystemTime),
}

impl RetryAfter {
    /// Parse a header value. Returns `None` for anything that is neither
    /// delta-seconds nor an HTTP-date.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Ok(seconds) = value.parse::<u64>() {
            return Some(RetryAfter::Seconds(seconds));
        }
        httpdate::parse_http_date(value).ok().map(RetryAfter::Date)
    }
}

/// A failed or unexpected HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct HttpError {
    status: Option<u16>,
    message: String,
    request: Option<String>,
    response: Option<String>,
    retry_after: Option<RetryAfter>,
}

impl HttpError {
    /// An error with no status and no transcripts.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            request: None,
            response: None,
            retry_after: None,
        }
    }

    /// An error for `status` without a captured exchange. The message reads
    /// `"{status} {reason}"`.
    pub fn with_status(status: u16, reason: &str) -> Self {
        Self {
            status: Some(status),
            ..Self::new(format!("{status} {reason}"))
        }
    }

    /// Capture a completed exchange.
    ///
    /// Both bodies are read to the end; the response body is released before
    /// this returns. A body that cannot be read is left out of its transcript.
    pub fn from_exchange<Q: Read, S: Read>(
        request: &RequestHead,
        request_body: Option<Q>,
        response: &ResponseHead,
        response_body: Option<S>,
    ) -> Self {
        let retry_after = response.headers.get("Retry-After").and_then(RetryAfter::parse);
        Self {
            status: Some(response.status),
            message: format!("{} {}", response.status, response.message),
            request: Some(format_request(request, request_body)),
            response: Some(format_response(response, response_body)),
            retry_after,
        }
    }

    /// Capture a buffered exchange. The request body is only borrowed.
    pub fn from_response(request: &HttpRequest, response: HttpResponse) -> Self {
        Self::from_exchange(
            &request.head,
            request.body.as_deref(),
            &response.head,
            response.body.as_deref(),
        )
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Printable transcript of the request, if an exchange was captured.
    pub fn request(&self) -> Option<&str> {
        self.request.as_deref()
    }

    /// Printable transcript of the response, if an exchange was captured.
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn retry_after(&self) -> Option<RetryAfter> {
        self.retry_after
    }

    pub fn kind(&self) -> HttpErrorKind {
        HttpErrorKind::from_status(self.status)
    }
}
