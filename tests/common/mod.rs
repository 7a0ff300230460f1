//! Deterministic fake providers shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use concurrent_search::{
    Provider, ProviderError, ProviderId, ProviderRegistry, Search, SearchOptions, SearchResult,
    Submission,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound for any single submit in tests
pub const SUBMIT_GUARD: Duration = Duration::from_secs(5);

pub fn result(engine: &str, n: usize) -> SearchResult {
    SearchResult::new(
        engine,
        format!("{engine} result {n}"),
        format!("https://{engine}.example/{n}"),
        format!("content {n} from {engine}"),
    )
}

/// Provider returning a fixed batch after a delay
pub struct Fake {
    id: ProviderId,
    results: Vec<SearchResult>,
    delay: Duration,
    fail: bool,
    calls: Arc<AtomicUsize>,
    finished: Arc<AtomicUsize>,
}

impl Fake {
    pub fn new(id: &str, count: usize) -> Self {
        Self {
            id: id.into(),
            results: (0..count).map(|n| result(id, n)).collect(),
            delay: Duration::ZERO,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
            finished: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(id: &str) -> Self {
        Self {
            fail: true,
            ..Self::new(id, 0)
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn results(&self) -> Vec<SearchResult> {
        self.results.clone()
    }

    /// Counter of calls that ran to the end instead of being cancelled
    pub fn finished(&self) -> Arc<AtomicUsize> {
        self.finished.clone()
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl Provider for Fake {
    fn id(&self) -> ProviderId {
        self.id.clone()
    }

    async fn search(&self, _term: &str) -> Result<Vec<SearchResult>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.finished.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            Err(ProviderError::Transport("simulated connection refused".to_string()))
        } else {
            Ok(self.results.clone())
        }
    }
}

pub fn search_with(providers: Vec<Fake>) -> Search {
    let registry = providers
        .into_iter()
        .fold(ProviderRegistry::new(), |registry, fake| {
            registry.with(Arc::new(fake))
        });
    Search::new(Arc::new(registry))
}

/// Submit, failing the test instead of hanging if completion never fires
pub async fn submit_guarded(search: &Search, options: &SearchOptions) -> Submission {
    tokio::time::timeout(SUBMIT_GUARD, search.submit_tracked(options))
        .await
        .expect("submit did not complete in time")
}
