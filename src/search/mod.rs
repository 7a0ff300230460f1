//! Search orchestration module
//!
//! Fans a query out to every enabled provider concurrently and aggregates
//! the batches they send back under the wait-all or first-only policy.

mod aggregator;
mod executor;
mod models;
mod spawner;

pub use aggregator::{AggregationState, Aggregator, DrainReport, Phase, Policy};
pub use executor::{Search, Submission};
pub use models::*;
pub use spawner::run_provider;
