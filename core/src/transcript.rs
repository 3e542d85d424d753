//! Printable transcripts of HTTP requests and responses.
//!
//! # Design
//! The media type and character set of a body are unknown when an exchange
//! fails, so bodies are never decoded as text. Every byte is mapped on its
//! own: printable ASCII is kept, CR and LF become `[CR]` and `[LF]` (the
//! latter followed by a real line break so the transcript stays readable),
//! and every other octet is shown as `[xx]` in lowercase hex.
//!
//! Metadata (method, path, status line, header names and values) goes
//! through the same mapping whenever it holds anything outside 0x20-0x7e,
//! except that `[LF]` gets no line break there: one metadata item always
//! stays on one transcript line.
//!
//! Formatting runs while an error is being built, so it never fails. A body
//! that cannot be read is logged and left out; the header block is still
//! returned.

use std::borrow::Cow;
use std::io::{self, BufReader, Read};

use crate::http::{Headers, RequestHead, ResponseHead};

/// Reading a body failed part-way. Carries the underlying I/O error.
#[derive(Debug, thiserror::Error)]
#[error("body could not be read: {0}")]
pub struct BodyUnreadable(#[from] pub io::Error);

/// Escape every byte of `input` until end-of-stream.
///
/// Output is the same for a given byte sequence no matter how the reader
/// splits it into chunks.
pub fn escape_byte_stream<R: Read>(input: R) -> Result<String, BodyUnreadable> {
    let mut escaped = String::new();
    for byte in BufReader::new(input).bytes() {
        push_escaped(&mut escaped, byte?, true);
    }
    Ok(escaped)
}

/// Escape an in-memory byte slice.
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut escaped = String::with_capacity(bytes.len());
    for &byte in bytes {
        push_escaped(&mut escaped, byte, true);
    }
    escaped
}

fn push_escaped(out: &mut String, byte: u8, break_after_lf: bool) {
    match byte {
        b'\r' => out.push_str("[CR]"),
        b'\n' if break_after_lf => out.push_str("[LF]\n"),
        b'\n' => out.push_str("[LF]"),
        0x20..=0x7e => out.push(char::from(byte)),
        _ => out.push_str(&format!("[{byte:02x}]")),
    }
}

fn is_visible_ascii(text: &str) -> bool {
    text.bytes().all(|b| (0x20..=0x7e).contains(&b))
}

/// `text` unchanged when it is visible ASCII, escaped byte by byte otherwise.
/// The result never contains a line break.
pub fn escape_metadata(text: &str) -> Cow<'_, str> {
    if is_visible_ascii(text) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(escape_metadata_bytes(text.as_bytes()))
}

/// Metadata mapping over raw bytes, for header values that are not UTF-8.
pub(crate) fn escape_metadata_bytes(bytes: &[u8]) -> String {
    let mut escaped = String::with_capacity(bytes.len());
    for &byte in bytes {
        push_escaped(&mut escaped, byte, false);
    }
    escaped
}

/// `METHOD PATH`, the headers, and the escaped body if there is one.
///
/// The body is read to the end. Pass a borrowed slice or a copy when the
/// original body is still needed afterwards.
pub fn format_request<R: Read>(head: &RequestHead, body: Option<R>) -> String {
    let mut transcript = format!(
        "{} {}\n",
        escape_metadata(head.method.as_str()),
        escape_metadata(&head.path)
    );
    push_headers(&mut transcript, &head.headers);
    append_body(&mut transcript, body, "request");
    transcript
}

/// `PROTOCOL CODE MESSAGE`, the headers, and the escaped body if there is one.
///
/// Takes ownership of the body, so the underlying handle is released when
/// this returns, whether reading succeeded or not.
pub fn format_response<R: Read>(head: &ResponseHead, body: Option<R>) -> String {
    let mut transcript = format!(
        "{} {} {}\n",
        escape_metadata(&head.protocol),
        head.status,
        escape_metadata(&head.message)
    );
    push_headers(&mut transcript, &head.headers);
    append_body(&mut transcript, body, "response");
    transcript
}

fn push_headers(out: &mut String, headers: &Headers) {
    for (name, value) in headers.iter() {
        out.push_str(&format!("{}: {}\n", escape_metadata(name), escape_metadata(value)));
    }
}

fn append_body<R: Read>(out: &mut String, body: Option<R>, side: &'static str) {
    let Some(body) = body else {
        return;
    };
    match escape_byte_stream(body) {
        Ok(escaped) => {
            out.push('\n');
            out.push_str(&escaped);
        }
        Err(err) => {
            tracing::warn!(error = %err.0, "couldn't read {side} body");
        }
    }
}
