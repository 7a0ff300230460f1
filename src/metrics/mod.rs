//! Metrics collection module
//!
//! Tracks provider response times, error rates, and usage statistics.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

const RESPONSE_TIME_WINDOW: usize = 100;

#[derive(Debug, Default)]
struct ProviderCounters {
    searches: u64,
    successes: u64,
    errors: u64,
    response_times: Vec<u64>,
}

/// In-process metrics collector
#[derive(Debug, Default)]
pub struct Metrics {
    total_searches: AtomicU64,
    providers: RwLock<HashMap<String, ProviderCounters>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment total search count
    pub fn inc_search(&self) {
        self.total_searches.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finished provider call
    pub fn record_provider(&self, provider: &str, time_ms: u64, success: bool) {
        let mut providers = self.write();
        let counters = providers.entry(provider.to_string()).or_default();

        counters.searches += 1;
        if success {
            counters.successes += 1;
        } else {
            counters.errors += 1;
        }

        if counters.response_times.len() >= RESPONSE_TIME_WINDOW {
            counters.response_times.remove(0);
        }
        counters.response_times.push(time_ms);
    }

    /// Get total searches
    pub fn get_total_searches(&self) -> u64 {
        self.total_searches.load(Ordering::Relaxed)
    }

    /// Get average response time for a provider
    pub fn get_avg_response_time(&self, provider: &str) -> Option<u64> {
        self.read().get(provider).and_then(avg_response_time)
    }

    /// Get reliability percentage for a provider
    pub fn get_reliability(&self, provider: &str) -> f64 {
        self.read().get(provider).map(reliability).unwrap_or(100.0)
    }

    /// Get all provider statistics
    pub fn get_provider_stats(&self) -> HashMap<String, ProviderStats> {
        self.read()
            .iter()
            .map(|(name, counters)| {
                (
                    name.clone(),
                    ProviderStats {
                        searches: counters.searches,
                        avg_response_time: avg_response_time(counters),
                        reliability: reliability(counters),
                    },
                )
            })
            .collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, ProviderCounters>> {
        self.providers.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, ProviderCounters>> {
        self.providers.write().unwrap_or_else(|e| e.into_inner())
    }
}

fn avg_response_time(counters: &ProviderCounters) -> Option<u64> {
    let times = &counters.response_times;
    if times.is_empty() {
        None
    } else {
        Some(times.iter().sum::<u64>() / times.len() as u64)
    }
}

fn reliability(counters: &ProviderCounters) -> f64 {
    let total = counters.successes + counters.errors;
    if total == 0 {
        100.0
    } else {
        (counters.successes as f64 / total as f64) * 100.0
    }
}

/// Statistics for a single provider
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStats {
    pub searches: u64,
    pub avg_response_time: Option<u64>,
    pub reliability: f64,
}
