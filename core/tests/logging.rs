//! An unreadable body is reported through `tracing`, not to the caller.

use std::io::{self, Read};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;
use transcript_core::{format_request, format_response, HttpMethod, RequestHead, ResponseHead};

/// Collects everything the subscriber writes.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

struct ResetAfter(&'static [u8]);

impl Read for ResetAfter {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.0.is_empty() {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"));
        }
        let n = self.0.len().min(buf.len());
        buf[..n].copy_from_slice(&self.0[..n]);
        self.0 = &self.0[n..];
        Ok(n)
    }
}

fn capture<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs.contents())
}

#[test]
fn unreadable_request_body_logs_warning() {
    let mut head = RequestHead::new(HttpMethod::Put, "/files/a.ics");
    head.headers.append("Content-Type", "text/calendar");

    let (transcript, logs) = capture(|| format_request(&head, Some(ResetAfter(b"BEGIN:"))));

    assert_eq!(transcript, "PUT /files/a.ics\nContent-Type: text/calendar\n");
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("couldn't read request body"), "{logs}");
    assert!(logs.contains("peer went away"), "{logs}");
}

#[test]
fn unreadable_response_body_logs_warning() {
    let head = ResponseHead::new("HTTP/1.1", 500, "Internal Server Error");

    let (transcript, logs) = capture(|| format_response(&head, Some(ResetAfter(b""))));

    assert_eq!(transcript, "HTTP/1.1 500 Internal Server Error\n");
    assert!(logs.contains("couldn't read response body"), "{logs}");
}

#[test]
fn readable_body_logs_nothing() {
    let head = ResponseHead::new("HTTP/1.1", 404, "Not Found");

    let (transcript, logs) = capture(|| format_response(&head, Some(&b"HI\n"[..])));

    assert_eq!(transcript, "HTTP/1.1 404 Not Found\n\nHI[LF]\n");
    assert!(!logs.contains("WARN"), "{logs}");
}
