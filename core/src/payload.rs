//! Best-effort interpretation of a response body.
//!
//! The server gives no static contract for its bodies: they may be JSON, empty,
//! or a plain-text diagnostic. `Payload` keeps the three cases apart so callers
//! have to decide what each one means for them.

use std::fmt;

use serde_json::Value;

/// A response body, interpreted without assuming a schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The body parsed as JSON (object, array or scalar, including `null`).
    Json(Value),
    /// The body was empty.
    Empty,
    /// The body was not valid JSON; the text is kept unmodified.
    Raw(String),
}

impl Payload {
    /// Interpret response text. Only a zero-length body is `Empty`; whitespace
    /// that fails to parse comes back as `Raw`.
    pub fn from_text(text: String) -> Self {
        if text.is_empty() {
            return Payload::Empty;
        }
        match serde_json::from_str(&text) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Raw(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Payload::Empty)
    }

    /// The server-assigned identifier under the conventional `id` key.
    pub fn id(&self) -> Option<ResourceId> {
        self.as_json()
            .and_then(|value| value.get("id"))
            .and_then(ResourceId::from_value)
    }
}

/// `{:#}` pretty-prints JSON payloads.
impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Json(value) if f.alternate() => write!(f, "{value:#}"),
            Payload::Json(value) => write!(f, "{value}"),
            Payload::Empty => f.write_str("null"),
            Payload::Raw(text) => f.write_str(text),
        }
    }
}

/// A server-assigned resource identifier, rendered as a path segment.
///
/// The server may hand out numeric or string ids. Strings are used verbatim
/// and numbers by their JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(id) => Some(Self(id.clone())),
            Value::Number(id) => Some(Self(id.to_string())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
