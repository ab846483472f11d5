//! Author handle resolution against the identity directory.
//!
//! Best-effort enrichment: the dispatcher treats every failure here as
//! "no handle on file" and carries on with bare attribution.

use crate::error::{Error, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Looks up an author's public handle.
#[async_trait]
pub trait HandleResolver: Send + Sync {
    /// Resolve `author` to a public handle, `None` when the directory has
    /// none on file. Must short-circuit without a network call when
    /// `author` is empty.
    async fn resolve_handle(&self, author: &str) -> Result<Option<String>>;
}

/// Resolver backed by the GitHub users API.
///
/// Reads the nullable `twitter_username` field of `GET /users/{login}`.
pub struct GithubResolver {
    client: reqwest::Client,
    api_base: String,
    token: Option<SecretString>,
}

/// The subset of the user payload we care about.
#[derive(Deserialize)]
struct UserResponse {
    twitter_username: Option<String>,
}

impl GithubResolver {
    pub const DEFAULT_API_BASE: &'static str = "https://api.github.com";

    pub fn new(token: Option<SecretString>) -> Self {
        Self::with_api_base(Self::DEFAULT_API_BASE, token)
    }

    /// Point the resolver at a different base URL. Tests use this to target
    /// a local stub server.
    pub fn with_api_base(api_base: impl Into<String>, token: Option<SecretString>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into(),
            token,
        }
    }
}

#[async_trait]
impl HandleResolver for GithubResolver {
    async fn resolve_handle(&self, author: &str) -> Result<Option<String>> {
        if author.is_empty() {
            return Ok(None);
        }

        let mut request = self
            .client
            .get(format!("{}/users/{author}", self.api_base))
            // GitHub rejects requests without a User-Agent.
            .header(reqwest::header::USER_AGENT, "commitcast");
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::ResolutionUnavailable(e.to_string()))?;

        // Unknown login: the directory simply has nothing on file.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::ResolutionUnavailable(format!(
                "identity directory returned {}",
                response.status()
            )));
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(|e| Error::ResolutionUnavailable(e.to_string()))?;
        Ok(user.twitter_username)
    }
}
