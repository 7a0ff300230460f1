//! Application state shared across handlers

use crate::config::Settings;
use crate::providers::ProviderRegistry;
use crate::search::Search;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Provider registry
    pub registry: Arc<ProviderRegistry>,
    /// Search executor
    pub search: Arc<Search>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, registry: ProviderRegistry) -> anyhow::Result<Self> {
        let settings = Arc::new(settings);
        let registry = Arc::new(registry);
        let search = Arc::new(
            Search::new(registry.clone())
                .with_max_timeout(settings.outgoing.max_request_timeout()?),
        );
        let templates = Arc::new(super::Templates::new()?);

        Ok(Self {
            settings,
            registry,
            search,
            templates,
        })
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
