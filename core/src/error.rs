//! Error types for request structuring and execution.
//!
//! # Design
//! Every failure a caller can act on gets its own variant: unsupported
//! method/encoding strings fail at parse time, serialization and URL
//! problems fail in `structure`, and transport problems surface as
//! `Network` with the underlying message. `HttpStatus` is only produced
//! by the must-succeed execution variant — a non-2xx response is data,
//! not an error, in the primary variant.

use std::fmt;

/// Errors returned while building, structuring or executing a [`Request`].
///
/// [`Request`]: crate::Request
#[derive(Debug)]
pub enum RequestError {
    /// The method string is not one of GET, POST, PUT, DELETE, PATCH.
    UnsupportedMethod(String),

    /// The encoding name is not one of the recognized body encodings.
    UnsupportedEncoding(String),

    /// The body fields could not be serialized in the selected encoding.
    BodySerialization(String),

    /// The request URL could not be parsed.
    UrlParse(String),

    /// The transport failed to complete the round-trip, or the response
    /// body could not be read.
    Network(String),

    /// The server answered with a non-2xx status. Only returned by
    /// `execute_must_succeed` / `send_must_succeed`; carries the raw
    /// response body for debugging.
    HttpStatus { status: u16, body: Vec<u8> },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::UnsupportedMethod(method) => {
                write!(f, "unsupported method: {method}")
            }
            RequestError::UnsupportedEncoding(name) => {
                write!(f, "unsupported encoding: {name}")
            }
            RequestError::BodySerialization(msg) => {
                write!(f, "body serialization failed: {msg}")
            }
            RequestError::UrlParse(msg) => write!(f, "invalid url: {msg}"),
            RequestError::Network(msg) => write!(f, "network error: {msg}"),
            RequestError::HttpStatus { status, body } => {
                write!(f, "HTTP {status}: {}", String::from_utf8_lossy(body))
            }
        }
    }
}

impl std::error::Error for RequestError {}
