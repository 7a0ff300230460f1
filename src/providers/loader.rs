//! Provider loader for initializing providers from configuration

use super::registry::ProviderRegistry;
use super::traits::Provider;
use super::{bing, blekko, google};
use crate::config::{ProviderConfig, Settings};
use crate::network::HttpClient;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Loader for initializing providers from configuration
pub struct ProviderLoader;

impl ProviderLoader {
    /// Load all enabled providers from settings
    pub fn load(settings: &Settings, client: &HttpClient) -> Result<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();
        let max_timeout = settings.outgoing.max_request_timeout()?;

        for config in &settings.providers {
            if config.disabled {
                info!("Skipping disabled provider: {}", config.name);
                continue;
            }

            match Self::create_provider(config, client, max_timeout) {
                Ok(provider) => {
                    info!("Loaded provider: {} ({})", config.name, config.provider);
                    registry.register(provider);
                }
                Err(e) => {
                    warn!("Failed to load provider {}: {}", config.name, e);
                }
            }
        }

        info!("Loaded {} providers", registry.len());
        Ok(registry)
    }

    /// Create a provider instance from its configuration
    fn create_provider(
        config: &ProviderConfig,
        client: &HttpClient,
        max_timeout: Duration,
    ) -> Result<Arc<dyn Provider>> {
        let timeout = config
            .timeout
            .filter(|t| *t > 0.0)
            .and_then(|t| Duration::try_from_secs_f64(t).ok())
            .unwrap_or_else(|| client.default_timeout())
            .min(max_timeout);

        let provider: Arc<dyn Provider> = match config.provider.as_str() {
            "google" => {
                let mut p = google::Google::new(client.clone()).with_id(config.name.as_str());
                if let Some(ref name) = config.display_name {
                    p = p.with_display_name(name.as_str());
                }
                if let Some(ref url) = config.base_url {
                    p = p.with_base_url(url.as_str());
                }
                Arc::new(p.with_timeout(timeout))
            }
            "bing" => {
                let mut p = bing::Bing::new(client.clone()).with_id(config.name.as_str());
                if let Some(ref name) = config.display_name {
                    p = p.with_display_name(name.as_str());
                }
                if let Some(ref url) = config.base_url {
                    p = p.with_base_url(url.as_str());
                }
                Arc::new(p.with_timeout(timeout))
            }
            "blekko" => {
                let mut p = blekko::Blekko::new(client.clone()).with_id(config.name.as_str());
                if let Some(ref name) = config.display_name {
                    p = p.with_display_name(name.as_str());
                }
                if let Some(ref url) = config.base_url {
                    p = p.with_base_url(url.as_str());
                }
                Arc::new(p.with_timeout(timeout))
            }
            other => {
                return Err(anyhow::anyhow!(
                    "Unknown provider type: {} (available: {})",
                    other,
                    Self::available_providers().join(", ")
                ));
            }
        };

        Ok(provider)
    }

    /// Get list of available provider types
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google", "bing", "blekko"]
    }
}
