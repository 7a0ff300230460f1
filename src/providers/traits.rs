//! Provider traits and types

use crate::results::{ProviderError, ProviderId, SearchResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Default deadline applied to a provider call
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(crate::DEFAULT_TIMEOUT);

/// HTTP request to be made by a provider
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// URL to request
    pub url: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters, in order
    pub params: Vec<(String, String)>,
}

impl ProviderRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            params: Vec::new(),
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Look up a query parameter
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response from a provider request
#[derive(Debug)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl ProviderResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ProviderError> {
        Ok(serde_json::from_str(&self.text)?)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Fail with a transport error on non-2xx responses
    pub fn error_for_status(self) -> Result<Self, ProviderError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ProviderError::Transport(format!("HTTP error: {}", self.status)))
        }
    }
}

/// Search capability implemented once per search engine.
///
/// Implementations report failures through [`ProviderError`]; the task that
/// drives a provider turns any error into an empty batch, so nothing here
/// ever reaches the caller of a search.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider identifier
    fn id(&self) -> ProviderId;

    /// Human readable name
    fn display_name(&self) -> String {
        self.id().to_string()
    }

    /// Deadline for one search call
    fn timeout(&self) -> Duration {
        DEFAULT_PROVIDER_TIMEOUT
    }

    /// Run a search for `term`
    async fn search(&self, term: &str) -> Result<Vec<SearchResult>, ProviderError>;
}

/// Collapse whitespace runs and trim
pub(crate) fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
