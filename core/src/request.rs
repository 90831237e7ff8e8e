//! Declarative request description, structuring and execution.
//!
//! # Design
//! A [`Request`] is configured once through chained setters, then consumed
//! exactly once by [`Request::execute`]. `structure` is a pure function of
//! the configured value: it resolves the query string, the body bytes and
//! the `Content-Type` without touching the network, so every encoding rule
//! is testable without a transport.

use std::collections::BTreeMap;
use std::io::Read;
use std::time::Duration;

use crate::body::{form_pairs, Encoding, FieldValue};
use crate::error::RequestError;
use crate::multipart::MultipartWriter;
use crate::transport::{Method, Transport, TransportRequest, UreqTransport};

/// Default cap on how many response body bytes are read (10 MiB).
pub const DEFAULT_RESPONSE_CAP: u64 = 10 * 1024 * 1024;

/// Declarative description of one outgoing HTTP call.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: String,
    host: Option<String>,
    timeout: Option<Duration>,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: BTreeMap<String, FieldValue>,
    encoding: Encoding,
    response_cap: u64,
    strict: bool,
}

/// Output of [`Request::structure`]: the final URL, the resolved
/// `Content-Type`, and the serialized body (empty for bodyless requests).
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    pub url: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// A captured response: status, headers, and the body read up to the
/// request's byte cap.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl Request {
    /// A GET request for `url` with JSON encoding and the default
    /// response cap. The URL may already contain a query string.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            method: Method::default(),
            url: url.into(),
            host: None,
            timeout: None,
            headers: Vec::new(),
            query: Vec::new(),
            body: BTreeMap::new(),
            encoding: Encoding::default(),
            response_cap: DEFAULT_RESPONSE_CAP,
            strict: false,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Override the `Host` header independent of the URL.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Override the transport's default 60-second timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Select the encoding by name. Unrecognized names are ignored and
    /// the prior encoding is kept; use [`Encoding::from_str`] to fail
    /// loudly instead.
    ///
    /// [`Encoding::from_str`]: std::str::FromStr::from_str
    pub fn encoding_name(mut self, name: &str) -> Self {
        if let Some(encoding) = Encoding::recognize(name) {
            self.encoding = encoding;
        }
        self
    }

    /// Override the 10 MiB response read limit (in bytes).
    pub fn response_cap(mut self, bytes: u64) -> Self {
        self.response_cap = bytes;
        self
    }

    /// Fail with [`RequestError::BodySerialization`] instead of silently
    /// dropping body fields that have no flat text form in form-style
    /// encodings.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Append one query pair. Repeated keys are preserved as repeated
    /// pairs; the pairs are appended to the URL at structuring time.
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn body_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// Compile the description into a transport-ready URL, content type
    /// and body.
    ///
    /// GET never serializes the body fields: the body stays empty and only
    /// the encoding's canonical content type is emitted. Other methods
    /// serialize `body` according to the encoding.
    pub fn structure(&self) -> Result<StructuredRequest, RequestError> {
        let mut url =
            url::Url::parse(&self.url).map_err(|e| RequestError::UrlParse(e.to_string()))?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        let (content_type, body) = match self.method {
            Method::Get => (self.encoding.mime().to_string(), Vec::new()),
            Method::Post | Method::Put | Method::Delete | Method::Patch => {
                self.structure_body()?
            }
        };

        Ok(StructuredRequest {
            url: url.into(),
            content_type,
            body,
        })
    }

    fn structure_body(&self) -> Result<(String, Vec<u8>), RequestError> {
        match self.encoding {
            Encoding::Json => {
                // No fields means no body at all, matching form-less GETs
                // from callers that only set a method.
                let bytes = if self.body.is_empty() {
                    Vec::new()
                } else {
                    serde_json::to_vec(&self.body)
                        .map_err(|e| RequestError::BodySerialization(e.to_string()))?
                };
                Ok((Encoding::Json.mime().to_string(), bytes))
            }
            Encoding::UrlEncoded | Encoding::Xml => {
                let pairs = form_pairs(&self.body, self.strict)?;
                let encoded = serde_urlencoded::to_string(&pairs)
                    .map_err(|e| RequestError::BodySerialization(e.to_string()))?;
                Ok((self.encoding.mime().to_string(), encoded.into_bytes()))
            }
            Encoding::Multipart => {
                let mut writer = MultipartWriter::new();
                for (key, value) in &self.body {
                    match value {
                        FieldValue::File(file) => {
                            writer.file_part(key, &file.name, &file.content)
                        }
                        FieldValue::Text(text) => writer.text_part(key, text),
                        other => {
                            let text = other.as_form_text().unwrap_or_default();
                            if !text.is_empty() {
                                writer.text_part(key, &text);
                            } else if self.strict {
                                return Err(RequestError::BodySerialization(format!(
                                    "field `{key}` has no multipart representation"
                                )));
                            }
                        }
                    }
                }
                let body = writer.finish();
                Ok((body.content_type, body.bytes))
            }
        }
    }

    /// Structure the request, send it through `transport`, and read the
    /// response body up to the configured cap (the remainder is silently
    /// discarded). A non-2xx status is returned as data, not an error.
    ///
    /// The response body reader is dropped on every exit path, including
    /// a failed read, so the transport's resources are always released.
    pub fn execute(self, transport: &dyn Transport) -> Result<Response, RequestError> {
        let structured = self.structure()?;

        let mut headers: Vec<(String, String)> = self
            .headers
            .into_iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case("content-type"))
            .collect();
        headers.push(("Content-Type".to_string(), structured.content_type));

        let response = transport.send(TransportRequest {
            method: self.method,
            url: structured.url,
            headers,
            body: structured.body,
            host: self.host,
            timeout: self.timeout,
        })?;

        let mut body = Vec::new();
        response
            .body
            .take(self.response_cap)
            .read_to_end(&mut body)
            .map_err(|e| RequestError::Network(e.to_string()))?;

        Ok(Response {
            status: response.status,
            headers: response.headers,
            body,
        })
    }

    /// Like [`Request::execute`], but maps any non-2xx status to
    /// [`RequestError::HttpStatus`] carrying the status and the body.
    pub fn execute_must_succeed(
        self,
        transport: &dyn Transport,
    ) -> Result<Response, RequestError> {
        let response = self.execute(transport)?;
        if !response.is_success() {
            return Err(RequestError::HttpStatus {
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }

    /// Execute against the default [`UreqTransport`].
    pub fn send(self) -> Result<Response, RequestError> {
        self.execute(&UreqTransport)
    }

    /// Execute against the default [`UreqTransport`], demanding a 2xx
    /// status.
    pub fn send_must_succeed(self) -> Result<Response, RequestError> {
        self.execute_must_succeed(&UreqTransport)
    }
}
