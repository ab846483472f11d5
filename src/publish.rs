//! Publishing sinks.
//!
//! The production/dry-run split is decided once at startup by constructing
//! the right [`Sink`] variant; the dispatch path never branches on mode.

use crate::error::{Error, Result};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

/// One-way broadcast of a bounded-length message.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, text: &str) -> Result<()>;
}

/// HTTP client for the real broadcast endpoint.
pub struct BroadcastClient {
    client: reqwest::Client,
    url: String,
    token: SecretString,
}

impl BroadcastClient {
    pub fn new(url: impl Into<String>, token: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            token,
        }
    }
}

/// Publishing sink chosen at startup.
pub enum Sink {
    /// Post to the broadcast endpoint.
    Broadcast(BroadcastClient),
    /// Write the message to stdout, no side effects.
    DryRun,
}

#[async_trait]
impl Publisher for Sink {
    async fn publish(&self, text: &str) -> Result<()> {
        match self {
            Sink::Broadcast(client) => {
                let response = client
                    .client
                    .post(&client.url)
                    .bearer_auth(client.token.expose_secret())
                    .json(&serde_json::json!({ "text": text }))
                    .send()
                    .await
                    .map_err(|e| Error::PublishRejected(e.to_string()))?;

                if !response.status().is_success() {
                    return Err(Error::PublishRejected(format!(
                        "broadcast endpoint returned {}",
                        response.status()
                    )));
                }
                info!(chars = text.chars().count(), "message broadcast");
                Ok(())
            }
            Sink::DryRun => {
                println!("{text}");
                Ok(())
            }
        }
    }
}
