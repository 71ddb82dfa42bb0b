//! The request executor and collection-level helpers built on it.
//!
//! # Design
//! `execute` is the single entry point that performs a call: it builds the
//! wire request, hands it to a `Transport`, and normalizes the response into a
//! `Payload` or an `ApiError`. `JsonServerClient` bundles an `AuthContext`
//! with a transport and names the usual collection operations; it holds no
//! mutable state between calls.

use serde::Serialize;
use tracing::debug;

use crate::config::AuthContext;
use crate::error::ApiError;
use crate::payload::{Payload, ResourceId};
use crate::request::{build_request, collection_path, parse_response, RequestSpec};
use crate::transport::{Transport, UreqTransport};

/// Issue one authenticated call and normalize its outcome.
///
/// Transport failures propagate unchanged. A non-2xx status becomes
/// `ApiError::Http` with the best-effort parsed body attached.
pub fn execute<T: Transport + ?Sized>(
    transport: &T,
    auth: &AuthContext,
    spec: &RequestSpec,
) -> Result<Payload, ApiError> {
    let request = build_request(auth, spec)?;
    debug!(method = %request.method, url = %request.url, "sending request");
    let response = transport.send(request)?;
    debug!(status = response.status, bytes = response.body.len(), "received response");
    parse_response(response)
}

/// Client for one database on a JSON document server.
#[derive(Debug, Clone)]
pub struct JsonServerClient<T = UreqTransport> {
    auth: AuthContext,
    transport: T,
}

impl JsonServerClient<UreqTransport> {
    /// Client over a blocking ureq transport honoring `auth`'s timeout.
    pub fn new(auth: AuthContext) -> Self {
        let transport = UreqTransport::new(auth.timeout());
        Self { auth, transport }
    }
}

impl<T: Transport> JsonServerClient<T> {
    pub fn with_transport(auth: AuthContext, transport: T) -> Self {
        Self { auth, transport }
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn execute(&self, spec: &RequestSpec) -> Result<Payload, ApiError> {
        execute(&self.transport, &self.auth, spec)
    }

    /// `GET /api/<db>`: the whole database document.
    pub fn database(&self) -> Result<Payload, ApiError> {
        self.execute(&RequestSpec::get(format!("/api/{}", self.auth.database())))
    }

    pub fn list(&self, collection: &str) -> Result<Payload, ApiError> {
        self.list_with(collection, &[])
    }

    /// `list` with query parameters such as `_sort`, `_order` or field
    /// filters. Pairs are appended as `?k=v&...` without percent-encoding,
    /// like the rest of the path.
    pub fn list_with(&self, collection: &str, params: &[(&str, &str)]) -> Result<Payload, ApiError> {
        let mut path = self.path(collection, None);
        for (i, (key, value)) in params.iter().enumerate() {
            path.push(if i == 0 { '?' } else { '&' });
            path.push_str(key);
            path.push('=');
            path.push_str(value);
        }
        self.execute(&RequestSpec::get(path))
    }

    pub fn get(&self, collection: &str, id: &ResourceId) -> Result<Payload, ApiError> {
        self.execute(&RequestSpec::get(self.path(collection, Some(id))))
    }

    pub fn create<B: Serialize + ?Sized>(&self, collection: &str, body: &B) -> Result<Payload, ApiError> {
        self.execute(&RequestSpec::post(self.path(collection, None), body)?)
    }

    /// `PUT`: replace the whole item. The server keeps the existing `id`.
    pub fn replace<B: Serialize + ?Sized>(
        &self,
        collection: &str,
        id: &ResourceId,
        body: &B,
    ) -> Result<Payload, ApiError> {
        self.execute(&RequestSpec::put(self.path(collection, Some(id)), body)?)
    }

    /// `PATCH`: replace only the fields present in `body`.
    pub fn patch<B: Serialize + ?Sized>(
        &self,
        collection: &str,
        id: &ResourceId,
        body: &B,
    ) -> Result<Payload, ApiError> {
        self.execute(&RequestSpec::patch(self.path(collection, Some(id)), body)?)
    }

    pub fn delete(&self, collection: &str, id: &ResourceId) -> Result<Payload, ApiError> {
        self.execute(&RequestSpec::delete(self.path(collection, Some(id))))
    }

    /// Ids of every item in `collection`. A missing collection (404) yields an
    /// empty list; items without a usable `id` are skipped.
    pub fn ids(&self, collection: &str) -> Result<Vec<ResourceId>, ApiError> {
        let payload = match self.list(collection) {
            Ok(payload) => payload,
            Err(err) if err.status() == Some(404) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        let ids: Vec<ResourceId> = payload
            .as_json()
            .and_then(|value| value.as_array())
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.get("id").and_then(ResourceId::from_value))
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }

    fn path(&self, collection: &str, id: Option<&ResourceId>) -> String {
        collection_path(self.auth.database(), collection, id.map(ResourceId::as_str))
    }
}
