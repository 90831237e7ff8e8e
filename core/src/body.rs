//! Body field values and encoding selection.
//!
//! # Design
//! Each body field is declared with an explicit variant at insertion time
//! ([`FieldValue`]) rather than inspected dynamically when the body is
//! built. The flattening rules for form-style encodings live here next to
//! the types so the lossy conversion (structured values without a flat
//! text form are skipped) has a single home.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::RequestError;

/// Body serialization strategy. Selects both how `body` fields become
/// bytes and which `Content-Type` is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Json,
    /// Same wire format as [`Encoding::UrlEncoded`] with an XML content
    /// type. A pragmatic shortcut, not real XML marshaling.
    Xml,
    UrlEncoded,
    Multipart,
}

impl Encoding {
    /// Canonical MIME string for the encoding. For multipart this is the
    /// bare type; a boundary parameter is only available once a body has
    /// been written.
    pub fn mime(&self) -> &'static str {
        match self {
            Encoding::Json => "application/json",
            Encoding::Xml => "application/xml",
            Encoding::UrlEncoded => "application/x-www-form-urlencoded",
            Encoding::Multipart => "multipart/form-data",
        }
    }

    /// Recognize an encoding name, including the historical aliases
    /// `form`, `form-data` and `urlencoded` for the URL-encoded form.
    pub(crate) fn recognize(name: &str) -> Option<Encoding> {
        match name {
            "json" => Some(Encoding::Json),
            "xml" => Some(Encoding::Xml),
            "urlencoded" | "form" | "form-data" => Some(Encoding::UrlEncoded),
            "multipart-form-data" => Some(Encoding::Multipart),
            _ => None,
        }
    }
}

impl FromStr for Encoding {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Encoding::recognize(s).ok_or_else(|| RequestError::UnsupportedEncoding(s.to_string()))
    }
}

/// A file to upload as a multipart part: original filename plus raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    pub name: String,
    pub content: Vec<u8>,
}

impl File {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// One body field value, tagged at insertion time.
///
/// `Text` and `File` have dedicated multipart handling; `Value` covers
/// numbers, bools and arbitrary JSON for the JSON encoding, and falls
/// back to a best-effort string form elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    File(File),
    Value(serde_json::Value),
}

impl FieldValue {
    /// Flat text form used by the form, XML and multipart encoders.
    /// Files, arrays, objects and null have none and yield `None`.
    pub(crate) fn as_form_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(text) => Some(text.clone()),
            FieldValue::Value(serde_json::Value::String(s)) => Some(s.clone()),
            FieldValue::Value(serde_json::Value::Number(n)) => Some(n.to_string()),
            FieldValue::Value(serde_json::Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(text) => serializer.serialize_str(text),
            FieldValue::File(file) => file.serialize(serializer),
            FieldValue::Value(value) => value.serialize(serializer),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Value(serde_json::Value::Bool(value))
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Value(serde_json::Value::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Value(serde_json::Value::from(value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Value(serde_json::Value::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Value(serde_json::Value::from(value))
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        FieldValue::Value(value)
    }
}

impl From<File> for FieldValue {
    fn from(value: File) -> Self {
        FieldValue::File(value)
    }
}

/// Flatten fields to `(key, text)` pairs for the URL-encoded and XML
/// encodings. In strict mode a field without a flat text form is an
/// error; otherwise it is skipped (lossy by design).
pub(crate) fn form_pairs(
    fields: &BTreeMap<String, FieldValue>,
    strict: bool,
) -> Result<Vec<(&str, String)>, RequestError> {
    let mut pairs = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        match value.as_form_text() {
            Some(text) => pairs.push((key.as_str(), text)),
            None if strict => {
                return Err(RequestError::BodySerialization(format!(
                    "field `{key}` has no form representation"
                )))
            }
            None => {}
        }
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encoding_recognizes_aliases() {
        assert_eq!("json".parse::<Encoding>().unwrap(), Encoding::Json);
        assert_eq!("xml".parse::<Encoding>().unwrap(), Encoding::Xml);
        assert_eq!("form".parse::<Encoding>().unwrap(), Encoding::UrlEncoded);
        assert_eq!("form-data".parse::<Encoding>().unwrap(), Encoding::UrlEncoded);
        assert_eq!("urlencoded".parse::<Encoding>().unwrap(), Encoding::UrlEncoded);
        assert_eq!(
            "multipart-form-data".parse::<Encoding>().unwrap(),
            Encoding::Multipart
        );
    }

    #[test]
    fn encoding_rejects_unknown_name() {
        let err = "yaml".parse::<Encoding>().unwrap_err();
        assert!(matches!(err, RequestError::UnsupportedEncoding(n) if n == "yaml"));
    }

    #[test]
    fn form_text_stringifies_scalars() {
        assert_eq!(FieldValue::from("x").as_form_text().as_deref(), Some("x"));
        assert_eq!(FieldValue::from(3_i64).as_form_text().as_deref(), Some("3"));
        assert_eq!(
            FieldValue::from(true).as_form_text().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn form_text_has_no_form_for_structured_values() {
        assert!(FieldValue::from(json!({"k": 1})).as_form_text().is_none());
        assert!(FieldValue::from(json!([1, 2])).as_form_text().is_none());
        assert!(FieldValue::File(File::new("f.bin", b"x".to_vec()))
            .as_form_text()
            .is_none());
    }

    #[test]
    fn form_pairs_skips_unconvertible_fields() {
        let mut fields = BTreeMap::new();
        fields.insert("a".to_string(), FieldValue::from("1"));
        fields.insert("b".to_string(), FieldValue::from(json!([1])));
        let pairs = form_pairs(&fields, false).unwrap();
        assert_eq!(pairs, vec![("a", "1".to_string())]);
    }

    #[test]
    fn form_pairs_strict_fails_on_unconvertible_field() {
        let mut fields = BTreeMap::new();
        fields.insert("b".to_string(), FieldValue::from(json!([1])));
        let err = form_pairs(&fields, true).unwrap_err();
        assert!(matches!(err, RequestError::BodySerialization(_)));
    }

    #[test]
    fn field_value_serializes_to_json() {
        let mut fields = BTreeMap::new();
        fields.insert("a".to_string(), FieldValue::from(1_i64));
        fields.insert("b".to_string(), FieldValue::from("x"));
        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(value, json!({"a": 1, "b": "x"}));
    }
}
