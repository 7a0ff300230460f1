//! Provider task spawning
//!
//! One detached task per provider. Each task sends exactly one batch, even
//! when the provider errors, times out, or panics.

use crate::metrics::Metrics;
use crate::providers::{Provider, ProviderSet};
use crate::results::{ProviderError, ResultBatch};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, error, warn, Instrument, Span};

/// Run one provider call under its deadline and turn the outcome into a batch.
///
/// This is the failure boundary: errors are logged here and never leave it.
pub async fn run_provider(provider: &dyn Provider, term: &str, deadline: Duration) -> ResultBatch {
    let id = provider.id();
    debug!(provider = %id, "Provider search started");

    let call = AssertUnwindSafe(provider.search(term)).catch_unwind();
    let outcome = match timeout(deadline, call).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(ProviderError::Panicked),
        Err(_) => Err(ProviderError::Timeout(deadline)),
    };

    match outcome {
        Ok(results) => {
            debug!(provider = %id, count = results.len(), "Provider search completed");
            ResultBatch::ok(id, results)
        }
        Err(e) => {
            warn!(provider = %id, error = %e, "Provider search failed");
            ResultBatch::failed(id, e)
        }
    }
}

/// Spawn one task per provider, each sending its batch on `tx`.
///
/// Returns the number of tasks spawned.
pub(crate) fn spawn_providers(
    providers: ProviderSet,
    term: &str,
    tx: mpsc::Sender<ResultBatch>,
    max_timeout: Duration,
    metrics: &Arc<Metrics>,
) -> usize {
    let count = providers.len();

    for (id, provider) in providers {
        let tx = tx.clone();
        let term = term.to_string();
        let metrics = metrics.clone();
        let deadline = provider.timeout().min(max_timeout);

        tokio::spawn(
            async move {
                let start = Instant::now();
                let batch = run_provider(provider.as_ref(), &term, deadline).await;
                metrics.record_provider(
                    id.as_str(),
                    start.elapsed().as_millis() as u64,
                    !batch.is_failure(),
                );

                if tx.send(batch).await.is_err() {
                    error!(provider = %id, "Aggregator gone before batch was delivered");
                }
            }
            .instrument(Span::current()),
        );
    }

    count
}
