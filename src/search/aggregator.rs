//! Result aggregation
//!
//! The [`Aggregator`] is the single consumer of the result channel and the
//! only writer of [`AggregationState`]. It fires the one-shot completion
//! signal exactly once, and always receives one batch from every provider
//! task before it exits, including after an early return.

use crate::results::{ResultBatch, SearchResult};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

/// Aggregation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Complete once every provider has answered
    WaitAll,
    /// Complete with the first batch that arrives, drain the rest
    FirstOnly,
}

impl Policy {
    pub fn from_first_only(first_only: bool) -> Self {
        if first_only {
            Self::FirstOnly
        } else {
            Self::WaitAll
        }
    }
}

/// Aggregator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Collecting,
    EarlyReturned,
    Done,
}

/// State owned by the aggregator task
#[derive(Debug)]
pub struct AggregationState {
    pub collected: Vec<SearchResult>,
    pub remaining: usize,
    pub phase: Phase,
}

impl AggregationState {
    fn new(expected: usize) -> Self {
        Self {
            collected: Vec::new(),
            remaining: expected,
            phase: Phase::Collecting,
        }
    }
}

/// What the aggregator saw by the time it exited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Number of provider tasks spawned
    pub expected: usize,
    /// Batches received
    pub received: usize,
    /// Batches received after the early return and dropped
    pub discarded: usize,
    /// Batches that carried a provider failure
    pub failed: usize,
}

impl DrainReport {
    /// Every provider task got its batch through
    pub fn is_complete(&self) -> bool {
        self.received == self.expected
    }
}

/// Consumer side of the result channel
pub struct Aggregator {
    policy: Policy,
    state: AggregationState,
    completion: Option<oneshot::Sender<Vec<SearchResult>>>,
    report: DrainReport,
}

impl Aggregator {
    pub fn new(
        expected: usize,
        policy: Policy,
        completion: oneshot::Sender<Vec<SearchResult>>,
    ) -> Self {
        Self {
            policy,
            state: AggregationState::new(expected),
            completion: Some(completion),
            report: DrainReport {
                expected,
                ..Default::default()
            },
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining(&self) -> usize {
        self.state.remaining
    }

    pub fn report(&self) -> DrainReport {
        self.report
    }

    /// Apply one arriving batch to the state machine
    pub fn on_batch(&mut self, batch: ResultBatch) {
        self.report.received += 1;
        if batch.is_failure() {
            self.report.failed += 1;
        }

        match self.state.remaining.checked_sub(1) {
            Some(remaining) => self.state.remaining = remaining,
            None => error!(provider = %batch.provider, "Received more batches than providers"),
        }

        match self.state.phase {
            Phase::Collecting => {
                debug!(
                    provider = %batch.provider,
                    count = batch.len(),
                    remaining = self.state.remaining,
                    "Results returned"
                );
                self.state.collected.extend(batch.results);
                if self.policy == Policy::FirstOnly {
                    self.state.phase = Phase::EarlyReturned;
                    self.fire();
                }
            }
            Phase::EarlyReturned | Phase::Done => {
                debug!(
                    provider = %batch.provider,
                    count = batch.len(),
                    remaining = self.state.remaining,
                    "Discarding late results"
                );
                self.report.discarded += 1;
            }
        }

        if self.state.remaining == 0 && self.state.phase != Phase::Done {
            self.finish();
        }
    }

    /// Drain the channel until every provider has reported.
    ///
    /// Returns once the state reaches [`Phase::Done`]. If every sender is
    /// dropped before that, the aggregator still completes so the caller is
    /// never left waiting.
    pub async fn run(mut self, mut rx: mpsc::Receiver<ResultBatch>) -> DrainReport {
        while self.state.phase != Phase::Done {
            match rx.recv().await {
                Some(batch) => self.on_batch(batch),
                None => {
                    error!(
                        remaining = self.state.remaining,
                        "Result channel closed before every provider reported"
                    );
                    self.finish();
                }
            }
        }

        debug!(
            received = self.report.received,
            discarded = self.report.discarded,
            "All results are in"
        );
        self.report
    }

    fn finish(&mut self) {
        self.state.phase = Phase::Done;
        self.fire();
    }

    fn fire(&mut self) {
        if let Some(completion) = self.completion.take() {
            let results = std::mem::take(&mut self.state.collected);
            if completion.send(results).is_err() {
                debug!("Caller stopped waiting before completion");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{ProviderError, SearchResult};

    fn batch(provider: &str, n: usize) -> ResultBatch {
        let results = (0..n)
            .map(|i| {
                SearchResult::new(
                    provider,
                    format!("{provider} {i}"),
                    format!("https://{provider}.example/{i}"),
                    "",
                )
            })
            .collect();
        ResultBatch::ok(provider.into(), results)
    }

    #[test]
    fn test_wait_all_fires_after_last_batch() {
        let (tx, mut rx) = oneshot::channel();
        let mut aggregator = Aggregator::new(2, Policy::WaitAll, tx);

        aggregator.on_batch(batch("a", 2));
        assert_eq!(aggregator.phase(), Phase::Collecting);
        assert_eq!(aggregator.remaining(), 1);
        assert!(rx.try_recv().is_err());

        aggregator.on_batch(batch("b", 1));
        assert_eq!(aggregator.phase(), Phase::Done);
        assert_eq!(rx.try_recv().unwrap().len(), 3);
    }

    #[test]
    fn test_first_only_fires_on_first_batch() {
        let (tx, mut rx) = oneshot::channel();
        let mut aggregator = Aggregator::new(3, Policy::FirstOnly, tx);

        aggregator.on_batch(batch("a", 1));
        assert_eq!(aggregator.phase(), Phase::EarlyReturned);
        let results = rx.try_recv().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].engine.as_str(), "a");

        aggregator.on_batch(batch("b", 4));
        assert_eq!(aggregator.phase(), Phase::EarlyReturned);
        aggregator.on_batch(batch("c", 4));
        assert_eq!(aggregator.phase(), Phase::Done);

        let report = aggregator.report();
        assert_eq!(report.received, 3);
        assert_eq!(report.discarded, 2);
        assert!(report.is_complete());
    }

    #[test]
    fn test_first_only_empty_first_batch_still_returns() {
        let (tx, mut rx) = oneshot::channel();
        let mut aggregator = Aggregator::new(2, Policy::FirstOnly, tx);

        aggregator.on_batch(ResultBatch::failed(
            "a".into(),
            ProviderError::Decode("bad xml".into()),
        ));

        assert_eq!(aggregator.phase(), Phase::EarlyReturned);
        assert!(rx.try_recv().unwrap().is_empty());
        assert_eq!(aggregator.report().failed, 1);
    }

    #[test]
    fn test_first_only_single_provider_goes_straight_to_done() {
        let (tx, mut rx) = oneshot::channel();
        let mut aggregator = Aggregator::new(1, Policy::FirstOnly, tx);

        aggregator.on_batch(batch("a", 2));

        assert_eq!(aggregator.phase(), Phase::Done);
        assert_eq!(rx.try_recv().unwrap().len(), 2);
        assert_eq!(aggregator.report().discarded, 0);
    }

    #[tokio::test]
    async fn test_run_drains_every_batch() {
        let (done_tx, done_rx) = oneshot::channel();
        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::spawn(Aggregator::new(3, Policy::FirstOnly, done_tx).run(rx));

        for name in ["a", "b", "c"] {
            tx.send(batch(name, 1)).await.unwrap();
        }

        assert_eq!(done_rx.await.unwrap().len(), 1);
        let report = handle.await.unwrap();
        assert_eq!(report.received, 3);
        assert_eq!(report.discarded, 2);
    }

    #[tokio::test]
    async fn test_run_completes_when_senders_vanish() {
        let (done_tx, done_rx) = oneshot::channel();
        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::spawn(Aggregator::new(2, Policy::WaitAll, done_tx).run(rx));

        tx.send(batch("a", 2)).await.unwrap();
        drop(tx);

        assert_eq!(done_rx.await.unwrap().len(), 2);
        let report = handle.await.unwrap();
        assert!(!report.is_complete());
    }
}
