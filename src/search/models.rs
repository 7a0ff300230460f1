//! Search options and related data models

use crate::results::ProviderId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything a caller specifies for one search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// The search term, passed to every provider unchanged
    pub search_term: String,
    /// Providers to query
    #[serde(default)]
    pub providers: BTreeSet<ProviderId>,
    /// Return as soon as the first provider answers
    #[serde(default)]
    pub first_only: bool,
}

impl SearchOptions {
    /// Create options for a term with no providers enabled
    pub fn new(search_term: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            providers: BTreeSet::new(),
            first_only: false,
        }
    }

    /// Enable a provider
    pub fn with_provider(mut self, id: impl Into<ProviderId>) -> Self {
        self.providers.insert(id.into());
        self
    }

    /// Enable several providers
    pub fn with_providers<I, P>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ProviderId>,
    {
        self.providers.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Set the first-only policy
    pub fn first_only(mut self, first_only: bool) -> Self {
        self.first_only = first_only;
        self
    }
}
