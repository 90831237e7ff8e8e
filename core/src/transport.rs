//! Transport collaborator boundary.
//!
//! # Design
//! `structure` compiles a [`Request`] into a [`TransportRequest`] — plain
//! data plus a byte body — and [`Transport`] is the capability that moves
//! it over the network. Keeping the boundary a trait lets tests substitute
//! a deterministic double instead of opening sockets; the response body is
//! a reader rather than a buffer so the caller's byte cap and release
//! semantics stay observable.
//!
//! [`Request`]: crate::Request

use std::fmt;
use std::io::Read;
use std::str::FromStr;
use std::time::Duration;

use crate::error::RequestError;

/// Timeout applied by [`UreqTransport`] when the request carries none.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP method for a request. Anything outside this set is rejected at
/// parse time with [`RequestError::UnsupportedMethod`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            other => Err(RequestError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// A fully structured outgoing request, ready for a [`Transport`].
///
/// The URL already carries the appended query string and the headers
/// already carry the resolved `Content-Type`.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Overrides the `Host` header independent of the URL.
    pub host: Option<String>,
    /// Overall deadline for the round-trip; the transport's default
    /// applies when `None`.
    pub timeout: Option<Duration>,
}

/// The transport's answer: status, headers, and the body as an unread
/// stream. The caller reads it up to its byte cap and drops it; dropping
/// the reader releases the underlying connection resources.
pub struct TransportResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Box<dyn Read>,
}

/// Capability that exchanges one request for one response over the
/// network. Implementations own connection handling, TLS, proxies and
/// timeouts; they must not interpret status codes as errors.
pub trait Transport {
    fn send(&self, request: TransportRequest) -> Result<TransportResponse, RequestError>;
}

/// Default transport backed by ureq.
///
/// Reproduces the compatibility defaults: TLS certificate verification
/// disabled, no connection keep-alive, proxy taken from the environment,
/// 60-second timeout unless the request overrides it.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn send(&self, request: TransportRequest) -> Result<TransportResponse, RequestError> {
        let timeout = request.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .max_idle_connections(0)
            .tls_config(
                ureq::tls::TlsConfig::builder()
                    .disable_verification(true)
                    .build(),
            )
            .build()
            .new_agent();

        let mut builder = ureq::http::Request::builder()
            .method(request.method.as_str())
            .uri(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(host) = &request.host {
            builder = builder.header("Host", host.as_str());
        }
        let outgoing = builder
            .body(request.body)
            .map_err(|e| RequestError::Network(e.to_string()))?;

        let response = agent
            .run(outgoing)
            .map_err(|e| RequestError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body: Box<dyn Read> = Box::new(response.into_body().into_reader());

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parses_supported_verbs() {
        assert_eq!("GET".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("POST".parse::<Method>().unwrap(), Method::Post);
        assert_eq!("PUT".parse::<Method>().unwrap(), Method::Put);
        assert_eq!("DELETE".parse::<Method>().unwrap(), Method::Delete);
        assert_eq!("PATCH".parse::<Method>().unwrap(), Method::Patch);
    }

    #[test]
    fn method_rejects_head() {
        let err = "HEAD".parse::<Method>().unwrap_err();
        assert!(matches!(err, RequestError::UnsupportedMethod(m) if m == "HEAD"));
    }

    #[test]
    fn method_is_case_sensitive() {
        assert!("get".parse::<Method>().is_err());
    }

    #[test]
    fn method_defaults_to_get() {
        assert_eq!(Method::default(), Method::Get);
    }
}
