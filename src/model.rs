//! Core data model.
//!
//! A commit record is a unit of announcement work. It enters the pending set
//! via upstream ingestion, is claimed exactly once, and ends up archived.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit awaiting (or having completed) announcement.
///
/// Immutable once created. `sha` is the identity key: unique across the
/// union of the pending and archived sets at any instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Unique content identifier.
    pub sha: String,

    /// Author's login in the identity directory. None when the commit
    /// carries no attributable author.
    pub author: Option<String>,

    /// Free-text commit description, unbounded length.
    pub message: String,

    /// Canonical permalink to the commit.
    pub url: String,

    /// Recency ordering key; the claim operation always takes the maximum.
    pub date: DateTime<Utc>,
}
