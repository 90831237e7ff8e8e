//! Minimal multipart/form-data writer for request bodies.
//!
//! # Design
//! The content type (with its `boundary=` parameter) only exists on the
//! value returned by [`MultipartWriter::finish`], so it is impossible to
//! read it before the closing boundary has been written.

use uuid::Uuid;

pub(crate) struct MultipartWriter {
    boundary: String,
    buf: Vec<u8>,
}

/// A finished multipart body: the bytes plus the matching content type.
pub(crate) struct MultipartBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MultipartWriter {
    pub fn new() -> Self {
        Self {
            boundary: Uuid::new_v4().simple().to_string(),
            buf: Vec::new(),
        }
    }

    pub fn text_part(&mut self, name: &str, value: &str) {
        self.open_part(
            &format!("form-data; name=\"{}\"", escape_quotes(name)),
            None,
        );
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.extend_from_slice(b"\r\n");
    }

    pub fn file_part(&mut self, name: &str, filename: &str, content: &[u8]) {
        self.open_part(
            &format!(
                "form-data; name=\"{}\"; filename=\"{}\"",
                escape_quotes(name),
                escape_quotes(filename)
            ),
            Some("application/octet-stream"),
        );
        self.buf.extend_from_slice(content);
        self.buf.extend_from_slice(b"\r\n");
    }

    fn open_part(&mut self, disposition: &str, content_type: Option<&str>) {
        self.buf
            .extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.buf
            .extend_from_slice(format!("Content-Disposition: {disposition}\r\n").as_bytes());
        if let Some(ct) = content_type {
            self.buf
                .extend_from_slice(format!("Content-Type: {ct}\r\n").as_bytes());
        }
        self.buf.extend_from_slice(b"\r\n");
    }

    /// Write the closing boundary and hand back the finished body.
    pub fn finish(mut self) -> MultipartBody {
        self.buf
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        MultipartBody {
            content_type: format!("multipart/form-data; boundary={}", self.boundary),
            bytes: self.buf,
        }
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
