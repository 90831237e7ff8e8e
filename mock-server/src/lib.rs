//! Inspection server for exercising the request builder over real HTTP.
//!
//! Three routes cover what the core's integration tests need to observe:
//! `/echo` reflects the received method, URI, content type and raw body
//! back as JSON; `/large/{bytes}` streams an oversized payload for the
//! response-cap tests; `/status/{code}` answers with an arbitrary status.

use axum::{
    body::Bytes,
    extract::Path,
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode, Uri},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What the `/echo` route reflects back about the request it received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub uri: String,
    pub content_type: Option<String>,
    /// Raw request body, lossily decoded as UTF-8.
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/large/{bytes}", get(large))
        .route("/status/{code}", get(status))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    Json(Echo {
        method: method.to_string(),
        uri: uri.to_string(),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(String::from),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn large(Path(bytes): Path<usize>) -> Vec<u8> {
    vec![b'x'; bytes]
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}
