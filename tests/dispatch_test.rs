use async_trait::async_trait;
use chrono::{Duration, Utc};
use commitcast::dispatch::{ClaimQueue, Dispatcher};
use commitcast::error::{Error, Result};
use commitcast::format;
use commitcast::model::CommitRecord;
use commitcast::publish::Publisher;
use commitcast::resolve::{GithubResolver, HandleResolver};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

fn commit(sha: &str, author: Option<&str>, offset_secs: i64) -> CommitRecord {
    CommitRecord {
        sha: sha.to_string(),
        author: author.map(str::to_string),
        message: format!("commit {sha}"),
        url: format!("http://x/{sha}"),
        date: Utc::now() + Duration::seconds(offset_secs),
    }
}

/// In-memory stand-in for the durable queue.
#[derive(Clone, Default)]
struct MemQueue {
    pending: Arc<Mutex<Vec<CommitRecord>>>,
}

impl MemQueue {
    fn with(records: Vec<CommitRecord>) -> Self {
        Self {
            pending: Arc::new(Mutex::new(records)),
        }
    }

    fn remaining(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

#[async_trait]
impl ClaimQueue for MemQueue {
    async fn claim(&self) -> Result<Option<CommitRecord>> {
        let mut pending = self.pending.lock().unwrap();
        let newest = pending
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.date.cmp(&b.date).then(a.sha.cmp(&b.sha)))
            .map(|(i, _)| i);
        Ok(newest.map(|i| pending.remove(i)))
    }
}

/// Resolver double that counts calls and can be told to fail.
#[derive(Clone)]
struct StubResolver {
    handle: Option<String>,
    fail: bool,
    calls: Arc<AtomicUsize>,
}

impl StubResolver {
    fn with_handle(handle: &str) -> Self {
        Self {
            handle: Some(handle.to_string()),
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn empty() -> Self {
        Self {
            handle: None,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing() -> Self {
        Self {
            handle: None,
            fail: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HandleResolver for StubResolver {
    async fn resolve_handle(&self, _author: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::ResolutionUnavailable("directory down".to_string()));
        }
        Ok(self.handle.clone())
    }
}

/// Publisher double that records everything it is handed.
#[derive(Clone, Default)]
struct RecordingPublisher {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingPublisher {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for RecordingPublisher {
    async fn publish(&self, text: &str) -> Result<()> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn empty_queue_is_a_noop_cycle() {
    let queue = MemQueue::default();
    let resolver = StubResolver::with_handle("alice_tw");
    let publisher = RecordingPublisher::default();
    let mut dispatcher = Dispatcher::new(queue, resolver.clone(), publisher.clone());

    let outcome = dispatcher.run_once().await.unwrap();

    assert!(outcome.is_none());
    assert_eq!(resolver.calls(), 0);
    assert!(publisher.messages().is_empty());
}

#[tokio::test]
async fn happy_path_publishes_rendered_message() {
    let rec = commit("abc", Some("alice"), 0);
    let queue = MemQueue::with(vec![rec.clone()]);
    let resolver = StubResolver::with_handle("alice_tw");
    let publisher = RecordingPublisher::default();
    let mut dispatcher = Dispatcher::new(queue, resolver.clone(), publisher.clone());

    let outcome = dispatcher.run_once().await.unwrap();

    assert_eq!(outcome.as_deref(), Some("abc"));
    assert_eq!(resolver.calls(), 1);
    assert_eq!(
        publisher.messages(),
        vec![format::render(&rec, Some("alice_tw"))]
    );
}

#[tokio::test]
async fn one_cycle_claims_only_the_newest() {
    let queue = MemQueue::with(vec![
        commit("older", None, -60),
        commit("newer", None, 0),
    ]);
    let resolver = StubResolver::empty();
    let publisher = RecordingPublisher::default();
    let mut dispatcher = Dispatcher::new(queue.clone(), resolver, publisher.clone());

    let outcome = dispatcher.run_once().await.unwrap();

    assert_eq!(outcome.as_deref(), Some("newer"));
    assert_eq!(queue.remaining(), 1);
    assert_eq!(publisher.messages().len(), 1);
}

#[tokio::test]
async fn authorless_commit_skips_resolution() {
    let queue = MemQueue::with(vec![commit("noauthor", None, 0)]);
    let resolver = StubResolver::with_handle("unused");
    let publisher = RecordingPublisher::default();
    let mut dispatcher = Dispatcher::new(queue, resolver.clone(), publisher.clone());

    dispatcher.run_once().await.unwrap();

    assert_eq!(resolver.calls(), 0);
    assert_eq!(
        publisher.messages(),
        vec!["commit noauthor\n\nhttp://x/noauthor".to_string()]
    );
}

#[tokio::test]
async fn resolver_failure_degrades_to_bare_attribution() {
    let queue = MemQueue::with(vec![commit("deg", Some("alice"), 0)]);
    let resolver = StubResolver::failing();
    let publisher = RecordingPublisher::default();
    let mut dispatcher = Dispatcher::new(queue, resolver.clone(), publisher.clone());

    let outcome = dispatcher.run_once().await.unwrap();

    assert_eq!(outcome.as_deref(), Some("deg"));
    assert_eq!(resolver.calls(), 1);
    assert_eq!(
        publisher.messages(),
        vec!["commit deg\n\nby alice\n\nhttp://x/deg".to_string()]
    );
}

#[tokio::test]
async fn no_handle_on_file_uses_bare_attribution() {
    let queue = MemQueue::with(vec![commit("bare", Some("bob"), 0)]);
    let resolver = StubResolver::empty();
    let publisher = RecordingPublisher::default();
    let mut dispatcher = Dispatcher::new(queue, resolver, publisher.clone());

    dispatcher.run_once().await.unwrap();

    assert_eq!(
        publisher.messages(),
        vec!["commit bare\n\nby bob\n\nhttp://x/bare".to_string()]
    );
}

#[tokio::test]
async fn github_resolver_short_circuits_on_empty_author() {
    // Unroutable base URL: any network attempt would error, so a clean None
    // proves no call was made.
    let resolver = GithubResolver::with_api_base("http://invalid.localdomain:1", None);
    let handle = resolver.resolve_handle("").await.unwrap();
    assert!(handle.is_none());
}
