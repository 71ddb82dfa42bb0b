//! Request bodies for the `posts` collection.
//!
//! # Design
//! Only what the client sends is typed. Responses are not validated against a
//! schema and stay `Payload` values; the server may store fields these types
//! do not know about.

use serde::{Deserialize, Serialize};

/// Payload for creating a post. The server assigns the `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub author: String,
}

/// Partial update for a post. Only the fields present in the JSON are
/// replaced; omitted fields are expected to stay unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
