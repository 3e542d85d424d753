//! Status checking for buffered exchanges.

use crate::error::HttpError;
use crate::http::{HttpRequest, HttpResponse};

/// Pass a 2xx response through; turn anything else into an [`HttpError`]
/// carrying transcripts of both sides.
pub fn ensure_success(request: &HttpRequest, response: HttpResponse) -> Result<HttpResponse, HttpError> {
    if response.is_success() {
        return Ok(response);
    }
    tracing::debug!(
        method = %request.head.method,
        path = %request.head.path,
        status = response.head.status,
        "HTTP exchange failed"
    );
    Err(HttpError::from_response(request, response))
}
