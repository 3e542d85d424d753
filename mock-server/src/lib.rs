use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// Body of the `GET /broken` response: every kind of byte the transcript
/// formatter distinguishes.
pub const BROKEN_BODY: &[u8] = b"fatal\r\n\x00\x1b[31m\xff\xfe";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub size: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Listing {
    pub files: Vec<FileEntry>,
}

pub type Db = Arc<RwLock<HashMap<String, Vec<u8>>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/files", get(list_files))
        .route("/files/{name}", get(get_file).put(put_file).delete(delete_file))
        .route("/files/{name}/lock", post(lock_file))
        .route("/broken", get(broken))
        .route("/unavailable", get(unavailable))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_files(State(db): State<Db>) -> Json<Listing> {
    let files = db.read().await;
    let mut entries: Vec<FileEntry> = files
        .iter()
        .map(|(name, data)| FileEntry {
            name: name.clone(),
            size: data.len(),
        })
        .collect();
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Json(Listing { files: entries })
}

async fn get_file(State(db): State<Db>, Path(name): Path<String>) -> Response {
    let files = db.read().await;
    match files.get(&name) {
        Some(data) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            data.clone(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "not found\n").into_response(),
    }
}

/// `If-None-Match: *` makes the upload fail with 412 when the file exists.
async fn put_file(
    State(db): State<Db>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let mut files = db.write().await;
    let create_only = headers
        .get(header::IF_NONE_MATCH)
        .is_some_and(|v| v.as_bytes() == b"*");
    if create_only && files.contains_key(&name) {
        tracing::debug!(%name, "refusing to overwrite");
        return (StatusCode::PRECONDITION_FAILED, "file already exists\n").into_response();
    }
    match files.insert(name, body.to_vec()) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => StatusCode::CREATED.into_response(),
    }
}

async fn delete_file(
    State(db): State<Db>,
    Path(name): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let mut files = db.write().await;
    files.remove(&name).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

/// Locking is never granted; the request body is echoed back.
async fn lock_file(Path(name): Path<String>, body: Bytes) -> Response {
    tracing::debug!(%name, len = body.len(), "lock refused");
    (
        StatusCode::CONFLICT,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        body,
    )
        .into_response()
}

async fn broken() -> Response {
    let mut headers = HeaderMap::new();
    headers.append("x-custom", HeaderValue::from_static("a"));
    headers.append("x-custom", HeaderValue::from_static("b"));
    (StatusCode::INTERNAL_SERVER_ERROR, headers, BROKEN_BODY).into_response()
}

async fn unavailable() -> Response {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        [(header::RETRY_AFTER, "120")],
        "maintenance\n",
    )
        .into_response()
}
