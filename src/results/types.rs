//! Result type definitions

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::time::Duration;

/// Identifier of a search provider (e.g. "google", "bing")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProviderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProviderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ProviderId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A single search result
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchResult {
    /// Provider that returned this result
    pub engine: ProviderId,
    /// The title of the result
    pub title: String,
    /// The URL of the result
    pub link: String,
    /// Content snippet/description
    pub content: String,
}

impl SearchResult {
    /// Create a new result
    pub fn new(
        engine: impl Into<ProviderId>,
        title: impl Into<String>,
        link: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            engine: engine.into(),
            title: title.into(),
            link: link.into(),
            content: content.into(),
        }
    }
}

/// Provider-local failure, degraded to an empty batch at the task boundary
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("failed to build request: {0}")]
    Request(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("provider task panicked")]
    Panicked,
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Everything one provider invocation produced
#[derive(Debug)]
pub struct ResultBatch {
    /// Provider that produced the batch
    pub provider: ProviderId,
    /// Results, possibly empty
    pub results: Vec<SearchResult>,
    /// Why the batch is empty, when the provider failed
    pub failure: Option<ProviderError>,
}

impl ResultBatch {
    pub fn ok(provider: ProviderId, results: Vec<SearchResult>) -> Self {
        Self {
            provider,
            results,
            failure: None,
        }
    }

    pub fn failed(provider: ProviderId, error: ProviderError) -> Self {
        Self {
            provider,
            results: Vec::new(),
            failure: Some(error),
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }
}
