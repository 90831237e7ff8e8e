//! Declarative HTTP request construction and execution.
//!
//! # Overview
//! A [`Request`] describes one outgoing HTTP call — method, URL, headers,
//! query parameters, body fields and an [`Encoding`] — and compiles it
//! into a transport-ready request: query string appended, body serialized,
//! `Content-Type` resolved. Execution is delegated to a [`Transport`]
//! collaborator; the default [`UreqTransport`] speaks real HTTP, and tests
//! substitute deterministic doubles.
//!
//! # Design
//! - A `Request` is configured through chained setters and consumed
//!   exactly once by [`Request::execute`]; there is no hidden mutable
//!   state between calls.
//! - Body fields carry an explicit [`FieldValue`] variant (text, file, or
//!   JSON value), so the multipart file-upload dispatch is a match on a
//!   tagged union rather than runtime type inspection.
//! - The response body is read up to a configurable byte cap (10 MiB by
//!   default) and the reader is released on every exit path.

pub mod body;
pub mod error;
mod multipart;
pub mod request;
pub mod transport;

pub use body::{Encoding, FieldValue, File};
pub use error::RequestError;
pub use request::{Request, Response, StructuredRequest, DEFAULT_RESPONSE_CAP};
pub use transport::{
    Method, Transport, TransportRequest, TransportResponse, UreqTransport, DEFAULT_TIMEOUT,
};
