use std::time::Duration;

use clap::Parser;
use jsonserver_core::config::{DEFAULT_BASE_URL, DEFAULT_DATABASE};
use jsonserver_core::{ApiError, AuthContext, DemoPost};

/// Walk a JSON document server through list, create, read, patch and delete
/// on its `posts` collection.
#[derive(Debug, Parser)]
#[command(name = "jsonserver-demo", version, about)]
pub struct Cli {
    /// Server base URL; request paths are appended verbatim.
    #[arg(long, env = "JSON_SERVER_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Bearer token sent with every request.
    #[arg(long, env = "JSON_SERVER_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Database name (the server's JSON file without `.json`).
    #[arg(long, env = "JSON_SERVER_DB", default_value = DEFAULT_DATABASE)]
    pub db: String,

    /// Per-request timeout in seconds. Unset means no timeout.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[arg(long, default_value = "Hello from Rust")]
    pub title: String,

    #[arg(long, default_value = "example")]
    pub author: String,

    /// Title written by the patch step.
    #[arg(long, default_value = "Updated by Rust")]
    pub updated_title: String,
}

impl Cli {
    /// Fails with `ApiError::Config` when no token was given.
    pub fn auth(&self) -> Result<AuthContext, ApiError> {
        let token = self.token.clone().unwrap_or_default();
        let auth = AuthContext::new(self.base_url.clone(), token, self.db.clone())?;
        Ok(match self.timeout {
            Some(secs) => auth.with_timeout(Duration::from_secs(secs)),
            None => auth,
        })
    }

    pub fn post(&self) -> DemoPost {
        DemoPost {
            title: self.title.clone(),
            author: self.author.clone(),
            updated_title: self.updated_title.clone(),
        }
    }
}
