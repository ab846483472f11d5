//! One-shot dispatch: claim → resolve → render → publish.

use crate::error::{Error, Result};
use crate::format;
use crate::model::CommitRecord;
use crate::publish::Publisher;
use crate::resolve::HandleResolver;
use async_trait::async_trait;
use tracing::{info, warn};

/// Source of claimable commit records.
///
/// Implemented by [`crate::db::Db`] over the durable pending set; tests
/// substitute an in-memory double.
#[async_trait]
pub trait ClaimQueue: Send + Sync {
    /// Atomically claim the newest pending record, moving it to the
    /// archive. `None` on an empty pending set.
    async fn claim(&self) -> Result<Option<CommitRecord>>;
}

#[async_trait]
impl ClaimQueue for crate::db::Db {
    async fn claim(&self) -> Result<Option<CommitRecord>> {
        self.claim_next().await
    }
}

#[async_trait]
impl<T: ClaimQueue> ClaimQueue for &T {
    async fn claim(&self) -> Result<Option<CommitRecord>> {
        (**self).claim().await
    }
}

/// Orchestrates one announcement cycle over injected collaborators.
pub struct Dispatcher<S, R, P> {
    queue: S,
    resolver: R,
    publisher: P,
}

impl<S, R, P> Dispatcher<S, R, P>
where
    S: ClaimQueue,
    R: HandleResolver,
    P: Publisher,
{
    pub fn new(queue: S, resolver: R, publisher: P) -> Self {
        Self {
            queue,
            resolver,
            publisher,
        }
    }

    /// Run one announcement cycle. Returns the claimed sha, or `None` for
    /// an empty-queue no-op.
    ///
    /// Takes `&mut self` so no two cycles can overlap on the same
    /// dispatcher. Resolver failures degrade to bare attribution; store and
    /// publish failures propagate.
    pub async fn run_once(&mut self) -> Result<Option<String>> {
        let Some(commit) = self.queue.claim().await? else {
            info!("pending set empty, nothing to announce");
            return Ok(None);
        };
        info!(sha = %commit.sha, "claimed commit");

        let handle = match commit.author.as_deref() {
            None | Some("") => None,
            Some(author) => match self.resolver.resolve_handle(author).await {
                Ok(handle) => handle,
                Err(Error::ResolutionUnavailable(reason)) => {
                    warn!(author, %reason, "handle lookup failed, attributing without handle");
                    None
                }
                Err(e) => return Err(e),
            },
        };

        let text = format::render(&commit, handle.as_deref());
        self.publisher.publish(&text).await?;

        Ok(Some(commit.sha))
    }
}
