//! Pending/archive queue operations.
//!
//! The claim is a single-statement atomic delete-and-return over the pending
//! set; archiving is an idempotent upsert keyed by sha. The two steps are
//! deliberately not joined in one transaction (claim succeeds even when the
//! archive write fails), matching the two-step protocol of the deployment
//! this store replaces.

use crate::error::{Error, Result};
use crate::model::CommitRecord;
use tracing::warn;

impl super::Db {
    /// Atomically remove and return the newest pending commit.
    ///
    /// Newest means maximum `date`; identical dates break ties by `sha`
    /// descending. `FOR UPDATE SKIP LOCKED` keeps concurrent claimers from
    /// ever selecting the same row, so each pending record is claimed at
    /// most once across processes. Returns `None` on an empty pending set.
    pub async fn claim_pending(&self) -> Result<Option<CommitRecord>> {
        let row: Option<PendingRow> = sqlx::query_as(
            "DELETE FROM pending_commits
             WHERE sha = (
                 SELECT sha FROM pending_commits
                 ORDER BY date DESC, sha DESC
                 LIMIT 1
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING sha, author, message, url, date",
        )
        .fetch_optional(&self.pool)
        .await?;

        row.map(PendingRow::try_into_record).transpose()
    }

    /// Upsert a record into the archived set, keyed by sha.
    ///
    /// Idempotent: re-archiving the same sha overwrites the existing row
    /// rather than duplicating it.
    pub async fn archive(&self, record: &CommitRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO archived_commits (sha, author, message, url, date, archived_at)
             VALUES ($1, $2, $3, $4, $5, now())
             ON CONFLICT (sha) DO UPDATE
             SET author = $2, message = $3, url = $4, date = $5, archived_at = now()",
        )
        .bind(&record.sha)
        .bind(&record.author)
        .bind(&record.message)
        .bind(&record.url)
        .bind(record.date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Claim the newest pending commit and move it to the archive.
    ///
    /// The archive write is best-effort relative to the claim: if it fails,
    /// the claim stands and the record is returned anyway. A failure here
    /// (or a crash between the two steps) drops the record from both the
    /// live queue and the archive — an accepted, documented loss window.
    pub async fn claim_next(&self) -> Result<Option<CommitRecord>> {
        let Some(record) = self.claim_pending().await? else {
            return Ok(None);
        };

        if let Err(e) = self.archive(&record).await {
            warn!(sha = %record.sha, error = %e, "archive write failed after claim; record will not appear in the archive");
        }

        Ok(Some(record))
    }

    /// Insert a record into the pending set. Upstream-ingestion shim, used
    /// by the seed command and tests.
    pub async fn insert_pending(&self, record: &CommitRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO pending_commits (sha, author, message, url, date)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&record.sha)
        .bind(&record.author)
        .bind(&record.message)
        .bind(&record.url)
        .bind(record.date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// List pending commits, newest first.
    pub async fn list_pending(&self, limit: i64) -> Result<Vec<CommitRecord>> {
        let rows: Vec<PendingRow> = sqlx::query_as(
            "SELECT sha, author, message, url, date
             FROM pending_commits
             ORDER BY date DESC, sha DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PendingRow::try_into_record).collect()
    }

    /// Number of records in the archived set.
    pub async fn archived_count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT count(*) FROM archived_commits")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.0)
    }
}

/// Internal row type for sqlx::FromRow.
///
/// `message` and `url` are nullable at the schema level; the store makes no
/// shape assumptions beyond the sha key, so validation happens here.
#[derive(sqlx::FromRow)]
struct PendingRow {
    sha: String,
    author: Option<String>,
    message: Option<String>,
    url: Option<String>,
    date: chrono::DateTime<chrono::Utc>,
}

impl PendingRow {
    fn try_into_record(self) -> Result<CommitRecord> {
        let message = self.message.ok_or_else(|| Error::SchemaInvariant {
            sha: self.sha.clone(),
            field: "message",
        })?;
        let url = self.url.ok_or_else(|| Error::SchemaInvariant {
            sha: self.sha.clone(),
            field: "url",
        })?;

        Ok(CommitRecord {
            sha: self.sha,
            author: self.author,
            message,
            url,
            date: self.date,
        })
    }
}
