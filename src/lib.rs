//! Concurrent Search: fans one query out to several search providers
//!
//! The core is [`search::Search::submit`], which runs every enabled provider
//! concurrently and aggregates their batches either after all of them answer
//! or as soon as the first one does.

pub mod config;
pub mod metrics;
pub mod network;
pub mod providers;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use providers::{Provider, ProviderRegistry};
pub use results::{ProviderError, ProviderId, ResultBatch, SearchResult};
pub use search::{Search, SearchOptions, Submission};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for provider requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Maximum timeout that can be set
pub const MAX_TIMEOUT: u64 = 30;
