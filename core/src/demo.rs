//! Create/read/update/delete walkthrough against the `posts` collection.
//!
//! # Design
//! The five steps form a linear dependency chain: read, patch and delete all
//! need the id the server assigns on create. Each step is announced and its
//! result (or error) reported before the next one starts. The first error
//! aborts the run and is returned unchanged.

use tracing::info;

use crate::client::JsonServerClient;
use crate::error::ApiError;
use crate::payload::{Payload, ResourceId};
use crate::transport::Transport;
use crate::types::{NewPost, PostPatch};

pub const POSTS: &str = "posts";

/// Values the demo writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoPost {
    pub title: String,
    pub author: String,
    pub updated_title: String,
}

impl Default for DemoPost {
    fn default() -> Self {
        Self {
            title: "Hello from Rust".to_string(),
            author: "example".to_string(),
            updated_title: "Updated by Rust".to_string(),
        }
    }
}

/// Receives progress from `run_demo`.
pub trait Reporter {
    /// A step is about to run.
    fn step(&mut self, title: &str);

    /// The step that just ran returned `payload`.
    fn payload(&mut self, payload: &Payload);

    /// The step that just ran failed; the demo stops after this.
    fn failed(&mut self, err: &ApiError);

    /// Free-form status line.
    fn note(&mut self, message: &str);
}

/// Writes the walkthrough to stdout, pretty-printing JSON payloads.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    steps: usize,
}

impl Reporter for ConsoleReporter {
    fn step(&mut self, title: &str) {
        if self.steps > 0 {
            println!();
        }
        self.steps += 1;
        println!("# {title}");
    }

    fn payload(&mut self, payload: &Payload) {
        println!("{payload:#}");
    }

    fn failed(&mut self, err: &ApiError) {
        eprintln!("error: {err}");
    }

    fn note(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Run list, create, read-by-id, patch and delete against
/// `/api/<db>/posts`, returning the id the server assigned (and that was
/// deleted again).
pub fn run_demo<T: Transport>(
    client: &JsonServerClient<T>,
    post: &DemoPost,
    reporter: &mut dyn Reporter,
) -> Result<ResourceId, ApiError> {
    let db = client.auth().database();

    step(reporter, &format!("Listing posts in {db}"), || client.list(POSTS))?;

    let new_post = NewPost {
        title: post.title.clone(),
        author: post.author.clone(),
    };
    let created = step(reporter, "Creating a post", || client.create(POSTS, &new_post))?;
    let id = match created.id() {
        Some(id) => id,
        None => {
            let err = ApiError::MissingId(created);
            reporter.failed(&err);
            return Err(err);
        }
    };
    info!(%id, "post created");

    step(reporter, "Fetching by id", || client.get(POSTS, &id))?;

    let patch = PostPatch {
        title: Some(post.updated_title.clone()),
    };
    step(reporter, "Patching title", || client.patch(POSTS, &id, &patch))?;

    reporter.step("Deleting");
    match client.delete(POSTS, &id) {
        Ok(payload) => {
            // a delete normally answers with no body
            if !payload.is_empty() {
                reporter.payload(&payload);
            }
            reporter.note("deleted");
        }
        Err(err) => {
            reporter.failed(&err);
            return Err(err);
        }
    }
    info!(%id, "post deleted");

    Ok(id)
}

fn step(
    reporter: &mut dyn Reporter,
    title: &str,
    call: impl FnOnce() -> Result<Payload, ApiError>,
) -> Result<Payload, ApiError> {
    reporter.step(title);
    info!(step = title, "running demo step");
    match call() {
        Ok(payload) => {
            reporter.payload(&payload);
            Ok(payload)
        }
        Err(err) => {
            reporter.failed(&err);
            Err(err)
        }
    }
}
