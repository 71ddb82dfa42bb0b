//! Request building and response parsing, without any I/O.
//!
//! # Design
//! `build_request` turns a `RequestSpec` into an `HttpRequest` and
//! `parse_response` turns an `HttpResponse` into a `Payload`. The transport in
//! between is the only part that touches the network, so every rule about
//! headers, bodies and status handling lives here and is tested as plain data.

use serde::Serialize;
use serde_json::Value;

use crate::config::AuthContext;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::payload::Payload;

/// One call against the API: method, path (starting with `/`) and an
/// optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: None,
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Delete,
            path: path.into(),
            body: None,
        }
    }

    pub fn post<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Self::with_body(HttpMethod::Post, path, body)
    }

    pub fn put<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Self::with_body(HttpMethod::Put, path, body)
    }

    pub fn patch<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Self::with_body(HttpMethod::Patch, path, body)
    }

    fn with_body<B: Serialize + ?Sized>(
        method: HttpMethod,
        path: impl Into<String>,
        body: &B,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            method,
            path: path.into(),
            body: Some(serde_json::to_value(body)?),
        })
    }
}

/// Path of a collection, or of one item in it: `/api/<db>/<collection>[/<id>]`.
///
/// Segments are joined verbatim; nothing is percent-encoded.
pub fn collection_path(database: &str, collection: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("/api/{database}/{collection}/{id}"),
        None => format!("/api/{database}/{collection}"),
    }
}

/// Build the wire request for `spec`.
///
/// The URL is `base_url` followed by `spec.path`, with no normalization. Every
/// request carries `authorization: Bearer <token>`; `content-type` is set only
/// when a body is sent.
pub fn build_request(auth: &AuthContext, spec: &RequestSpec) -> Result<HttpRequest, ApiError> {
    let mut headers = vec![("authorization".to_string(), auth.bearer())];
    let body = match &spec.body {
        Some(value) => {
            headers.push(("content-type".to_string(), "application/json".to_string()));
            Some(serde_json::to_string(value)?)
        }
        None => None,
    };
    Ok(HttpRequest {
        method: spec.method,
        url: format!("{}{}", auth.base_url(), spec.path),
        headers,
        body,
    })
}

/// Interpret the body, then the status. Non-2xx statuses become
/// `ApiError::Http` carrying the payload parsed the same way as on success.
pub fn parse_response(response: HttpResponse) -> Result<Payload, ApiError> {
    let success = response.is_success();
    let status = response.status;
    let payload = Payload::from_text(response.body);
    if !success {
        return Err(ApiError::Http { status, payload });
    }
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{NewPost, PostPatch};

    fn auth() -> AuthContext {
        AuthContext::new("http://localhost:43210", "secret-token", "db").unwrap()
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn get_request_has_auth_and_no_body() {
        let req = build_request(&auth(), &RequestSpec::get("/api/db/posts")).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:43210/api/db/posts");
        assert_eq!(req.header("authorization"), Some("Bearer secret-token"));
        assert_eq!(req.header("content-type"), None);
        assert!(req.body.is_none());
    }

    #[test]
    fn delete_request_has_no_content_type() {
        let req = build_request(&auth(), &RequestSpec::delete("/api/db/posts/1")).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.headers.len(), 1);
        assert!(req.body.is_none());
    }

    #[test]
    fn post_request_serializes_body_with_content_type() {
        let post = NewPost {
            title: "Hello from Node".to_string(),
            author: "example".to_string(),
        };
        let spec = RequestSpec::post("/api/db/posts", &post).unwrap();
        let req = build_request(&auth(), &spec).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("authorization"), Some("Bearer secret-token"));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"title": "Hello from Node", "author": "example"}));
    }

    #[test]
    fn patch_request_omits_absent_fields() {
        let patch = PostPatch {
            title: Some("Updated by Node".to_string()),
        };
        let spec = RequestSpec::patch("/api/db/posts/1", &patch).unwrap();
        let req = build_request(&auth(), &spec).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.url, "http://localhost:43210/api/db/posts/1");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"title": "Updated by Node"}));
    }

    #[test]
    fn content_type_present_iff_body_present() {
        let specs = [
            RequestSpec::get("/api/db/posts"),
            RequestSpec::delete("/api/db/posts/1"),
            RequestSpec::post("/api/db/posts", &json!({"a": 1})).unwrap(),
            RequestSpec::put("/api/db/posts/1", &json!({"a": 2})).unwrap(),
            RequestSpec::patch("/api/db/posts/1", &json!({})).unwrap(),
        ];
        for spec in &specs {
            let req = build_request(&auth(), spec).unwrap();
            assert_eq!(
                req.header("content-type").is_some(),
                req.body.is_some(),
                "{} {}",
                spec.method,
                spec.path
            );
        }
    }

    #[test]
    fn url_is_concatenated_verbatim() {
        let auth = AuthContext::new("http://host/", "t", "db").unwrap();
        let req = build_request(&auth, &RequestSpec::get("/api/my db/posts?x=1")).unwrap();
        assert_eq!(req.url, "http://host//api/my db/posts?x=1");
    }

    #[test]
    fn collection_path_shapes() {
        assert_eq!(collection_path("db", "posts", None), "/api/db/posts");
        assert_eq!(collection_path("db", "posts", Some("1")), "/api/db/posts/1");
    }

    #[test]
    fn empty_list_is_returned() {
        let payload = parse_response(response(200, "[]")).unwrap();
        assert_eq!(payload, Payload::Json(json!([])));
    }

    #[test]
    fn created_object_is_returned() {
        let body = r#"{"id":"1","title":"Hello from Node","author":"example"}"#;
        let payload = parse_response(response(201, body)).unwrap();
        assert_eq!(
            payload,
            Payload::Json(json!({"id": "1", "title": "Hello from Node", "author": "example"}))
        );
    }

    #[test]
    fn empty_body_is_empty_regardless_of_status() {
        assert_eq!(parse_response(response(200, "")).unwrap(), Payload::Empty);
        assert_eq!(parse_response(response(204, "")).unwrap(), Payload::Empty);
        let err = parse_response(response(500, "")).unwrap_err();
        assert_eq!(err.payload(), Some(&Payload::Empty));
    }

    #[test]
    fn success_with_plain_text_returns_raw() {
        let payload = parse_response(response(200, "ok")).unwrap();
        assert_eq!(payload, Payload::Raw("ok".to_string()));
    }

    #[test]
    fn not_found_carries_parsed_payload() {
        let err = parse_response(response(404, r#"{"error":"not found"}"#)).unwrap_err();
        match err {
            ApiError::Http { status, payload } => {
                assert_eq!(status, 404);
                assert_eq!(payload, Payload::Json(json!({"error": "not found"})));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn failure_with_plain_text_carries_raw() {
        let err = parse_response(response(401, "unauthorized")).unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.payload(), Some(&Payload::Raw("unauthorized".to_string())));
    }

    #[test]
    fn every_non_2xx_status_is_an_error() {
        for status in [100, 199, 300, 304, 400, 401, 403, 404, 409, 422, 500, 503] {
            let err = parse_response(response(status, "{}")).unwrap_err();
            assert_eq!(err.status(), Some(status));
        }
        for status in [200, 201, 202, 204, 299] {
            assert!(parse_response(response(status, "{}")).is_ok(), "{status}");
        }
    }
}
