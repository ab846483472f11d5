//! Error types for commitcast.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("claimed record {sha} violates schema: missing {field}")]
    SchemaInvariant { sha: String, field: &'static str },

    #[error("handle resolution unavailable: {0}")]
    ResolutionUnavailable(String),

    #[error("publish rejected: {0}")]
    PublishRejected(String),
}

pub type Result<T> = std::result::Result<T, Error>;
