//! Printable transcripts of failed HTTP exchanges.
//!
//! # Overview
//! When an HTTP exchange fails, [`HttpError`] captures the request and the
//! response (start line, headers, body) as printable text, ready for logs and
//! bug reports. Bodies of unknown media type and charset are rendered byte by
//! byte: printable ASCII as-is, everything else escaped.
//!
//! # Design
//! - [`transcript`] holds the formatter. It never fails: an unreadable body is
//!   logged with `tracing` and left out of the transcript.
//! - Bodies are any `std::io::Read`, taken by value, so the formatter owns
//!   and releases them.
//! - [`http`](crate::http) has plain-data snapshots of the exchange, convertible from the
//!   `http` crate's request and response types.
//! - [`HttpError`] stores transcripts as strings and is serde-serializable.

pub mod error;
pub mod exchange;
pub mod http;
pub mod transcript;

pub use error::{HttpError, HttpErrorKind, RetryAfter};
pub use exchange::ensure_success;
pub use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse, RequestHead, ResponseHead};
pub use transcript::{
    escape_byte_stream, escape_bytes, escape_metadata, format_request, format_response, BodyUnreadable,
};
