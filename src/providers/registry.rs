//! Provider registry for managing available search providers

use super::traits::Provider;
use crate::results::ProviderId;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::warn;

/// Providers selected for one search, keyed by id.
///
/// Iteration order carries no meaning.
pub type ProviderSet = HashMap<ProviderId, Arc<dyn Provider>>;

/// Registry of all available search providers
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider, replacing any provider with the same id
    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        let id = provider.id();
        if self.providers.insert(id.clone(), provider).is_some() {
            warn!("Provider {} registered twice, keeping the latest", id);
        }
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, provider: Arc<dyn Provider>) -> Self {
        self.register(provider);
        self
    }

    /// Get a provider by id
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Provider>> {
        self.providers.get(id)
    }

    /// Build the provider set for the enabled ids.
    ///
    /// Ids with no registered provider are logged and skipped.
    pub fn select(&self, enabled: &BTreeSet<ProviderId>) -> ProviderSet {
        enabled
            .iter()
            .filter_map(|id| match self.providers.get(id) {
                Some(provider) => Some((id.clone(), provider.clone())),
                None => {
                    warn!("Unknown provider requested: {}", id);
                    None
                }
            })
            .collect()
    }

    /// All provider ids, sorted
    pub fn ids(&self) -> Vec<ProviderId> {
        let mut ids: Vec<_> = self.providers.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Check if a provider exists
    pub fn contains(&self, id: &str) -> bool {
        self.providers.contains_key(id)
    }

    /// Get number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
