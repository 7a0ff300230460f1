//! Search execution and orchestration

use super::aggregator::{Aggregator, DrainReport, Policy};
use super::models::SearchOptions;
use super::spawner::spawn_providers;
use crate::metrics::Metrics;
use crate::providers::ProviderRegistry;
use crate::results::SearchResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, Instrument, Span};
use uuid::Uuid;

/// Outcome of one submission
pub struct Submission {
    /// Results captured when the completion signal fired
    pub results: Vec<SearchResult>,
    /// The aggregator task, still draining late batches under first-only.
    /// `None` when no provider was enabled.
    pub drain: Option<JoinHandle<DrainReport>>,
}

impl Submission {
    /// Wait for the aggregator to receive every outstanding batch
    pub async fn drained(self) -> Option<DrainReport> {
        match self.drain {
            Some(handle) => match handle.await {
                Ok(report) => Some(report),
                Err(e) => {
                    error!("Aggregator task failed: {}", e);
                    None
                }
            },
            None => None,
        }
    }
}

/// Search executor that fans a query out across providers
pub struct Search {
    /// Provider registry
    registry: Arc<ProviderRegistry>,
    /// Upper bound on any provider deadline
    max_timeout: Duration,
    /// Provider statistics
    metrics: Arc<Metrics>,
}

impl Search {
    /// Create a new search executor
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            max_timeout: Duration::from_secs(crate::MAX_TIMEOUT),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Set maximum provider deadline
    pub fn with_max_timeout(mut self, timeout: Duration) -> Self {
        self.max_timeout = timeout;
        self
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Search every enabled provider and return the aggregated results.
    ///
    /// With `first_only` the call returns as soon as one provider answers;
    /// the remaining providers still run to completion in the background.
    pub async fn submit(&self, options: &SearchOptions) -> Vec<SearchResult> {
        self.submit_tracked(options).await.results
    }

    /// Like [`submit`](Self::submit), also handing back the aggregator task
    pub async fn submit_tracked(&self, options: &SearchOptions) -> Submission {
        let span = info_span!("submit", search_id = %Uuid::new_v4());
        self.run(options).instrument(span).await
    }

    async fn run(&self, options: &SearchOptions) -> Submission {
        info!(
            term = %options.search_term,
            providers = options.providers.len(),
            first_only = options.first_only,
            "Search started"
        );
        self.metrics.inc_search();

        let providers = self.registry.select(&options.providers);
        if providers.is_empty() {
            info!("No providers enabled, nothing to search");
            return Submission {
                results: Vec::new(),
                drain: None,
            };
        }

        let expected = providers.len();
        let (tx, rx) = mpsc::channel(1);
        let (done_tx, done_rx) = oneshot::channel();

        let aggregator = Aggregator::new(
            expected,
            Policy::from_first_only(options.first_only),
            done_tx,
        );
        let drain = tokio::spawn(aggregator.run(rx).instrument(Span::current()));

        spawn_providers(
            providers,
            &options.search_term,
            tx,
            self.max_timeout,
            &self.metrics,
        );

        let results = match done_rx.await {
            Ok(results) => results,
            Err(_) => {
                error!("Aggregator exited without signalling completion");
                Vec::new()
            }
        };

        info!(count = results.len(), "Search completed");
        Submission {
            results,
            drain: Some(drain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_search_executor_creation() {
        let registry = Arc::new(ProviderRegistry::new());
        let search = Search::new(registry);

        let options = SearchOptions::new("test").with_provider("google");
        let submission = search.submit_tracked(&options).await;

        // No providers registered
        assert!(submission.results.is_empty());
        assert!(submission.drain.is_none());
        assert_eq!(search.metrics().get_total_searches(), 1);
    }
}
