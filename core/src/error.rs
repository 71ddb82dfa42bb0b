//! Error types for the JSON document server client.
//!
//! # Design
//! Every failure surfaces to the outermost caller unchanged; nothing here is
//! retried. A non-JSON body is not an error at all, it arrives as
//! `Payload::Raw`. Non-2xx responses keep the already-parsed payload so callers
//! can inspect structured detail without parsing the body again.

use crate::payload::Payload;

/// Errors returned by the request executor and the demo.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required setting is missing or empty. Raised before any request.
    #[error("configuration error: {0}")]
    Config(String),

    /// The HTTP round trip could not complete (DNS, refused connection, ...).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The server answered with a status outside 200..=299.
    #[error("HTTP {status}: {payload}")]
    Http { status: u16, payload: Payload },

    /// The request body could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A create response carried no usable `id` field.
    #[error("response has no `id` field: {0}")]
    MissingId(Payload),
}

impl ApiError {
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        ApiError::Transport(err.into())
    }

    /// HTTP status of an `Http` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            ApiError::Http { payload, .. } | ApiError::MissingId(payload) => Some(payload),
            _ => None,
        }
    }

    /// Short human-readable message: the `error` field of a JSON object
    /// payload when there is one, otherwise the payload or error text.
    pub fn message(&self) -> String {
        let Some(payload) = self.payload() else {
            return self.to_string();
        };
        match payload {
            Payload::Json(value) => match value.get("error") {
                Some(serde_json::Value::String(message)) => message.clone(),
                Some(other) => other.to_string(),
                None => value.to_string(),
            },
            Payload::Raw(text) if !text.is_empty() => text.clone(),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn http_error_displays_status_and_payload() {
        let err = ApiError::Http {
            status: 404,
            payload: Payload::Json(json!({"error": "not found"})),
        };
        assert_eq!(err.to_string(), r#"HTTP 404: {"error":"not found"}"#);
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn message_prefers_error_field() {
        let err = ApiError::Http {
            status: 400,
            payload: Payload::Json(json!({"error": "invalid JSON"})),
        };
        assert_eq!(err.message(), "invalid JSON");
    }

    #[test]
    fn message_falls_back_to_raw_text() {
        let err = ApiError::Http {
            status: 401,
            payload: Payload::Raw("unauthorized".to_string()),
        };
        assert_eq!(err.message(), "unauthorized");

        let err = ApiError::Http {
            status: 405,
            payload: Payload::Empty,
        };
        assert_eq!(err.message(), "HTTP 405: null");
    }

    #[test]
    fn non_http_errors_have_no_status() {
        let err = ApiError::Config("token is required".to_string());
        assert_eq!(err.status(), None);
        assert!(err.payload().is_none());
        assert_eq!(err.message(), "configuration error: token is required");
    }

    #[test]
    fn transport_keeps_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = ApiError::transport(io);
        assert!(err.to_string().contains("refused"));
        assert!(err.source().is_some());
    }
}
