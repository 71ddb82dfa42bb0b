//! Connection settings shared by every request.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:43210";
pub const DEFAULT_DATABASE: &str = "db";

/// Base URL, bearer token and database name, built once at startup and only
/// read afterwards.
///
/// The token is held as a `SecretString` so it never shows up in `Debug`
/// output or logs.
#[derive(Debug, Clone)]
pub struct AuthContext {
    base_url: String,
    token: SecretString,
    database: String,
    timeout: Option<Duration>,
}

impl AuthContext {
    /// Fails with `ApiError::Config` when `token` is empty. The base URL is
    /// kept verbatim; request paths are appended to it as-is.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        database: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let token = token.into();
        if token.is_empty() {
            return Err(ApiError::Config("API token is required".to_string()));
        }
        Ok(Self {
            base_url: base_url.into(),
            token: SecretString::from(token),
            database: database.into(),
            timeout: None,
        })
    }

    /// Overall deadline for a single request. Without one the transport's
    /// defaults apply.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_a_config_error() {
        let err = AuthContext::new(DEFAULT_BASE_URL, "", DEFAULT_DATABASE).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn bearer_header_value() {
        let auth = AuthContext::new(DEFAULT_BASE_URL, "secret-token", "db").unwrap();
        assert_eq!(auth.bearer(), "Bearer secret-token");
        assert_eq!(auth.database(), "db");
        assert_eq!(auth.timeout(), None);
    }

    #[test]
    fn debug_hides_token() {
        let auth = AuthContext::new(DEFAULT_BASE_URL, "secret-token", "db").unwrap();
        assert!(!format!("{auth:?}").contains("secret-token"));
    }

    #[test]
    fn base_url_is_kept_verbatim() {
        let auth = AuthContext::new("http://example.test:8080/", "t", "db").unwrap();
        assert_eq!(auth.base_url(), "http://example.test:8080/");
    }

    #[test]
    fn timeout_is_optional() {
        let auth = AuthContext::new(DEFAULT_BASE_URL, "t", "db")
            .unwrap()
            .with_timeout(Duration::from_secs(5));
        assert_eq!(auth.timeout(), Some(Duration::from_secs(5)));
    }
}
