//! Settings structures for the service configuration

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub providers: Vec<ProviderConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            search: SearchSettings::default(),
            outgoing: OutgoingSettings::default(),
            providers: default_providers(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject timeouts that cannot become a `Duration`
    pub fn validate(&self) -> Result<()> {
        self.outgoing.request_timeout()?;
        self.outgoing.max_request_timeout()?;
        for provider in &self.providers {
            if let Some(timeout) = provider.timeout {
                seconds(&format!("providers.{}.timeout", provider.name), timeout)?;
            }
        }
        Ok(())
    }

    /// Merge with environment variables (CSEARCH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("CSEARCH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("CSEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("CSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
    }

}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name displayed in UI
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "Concurrent Search".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 9999,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Providers pre-selected on the search form
    pub default_providers: Vec<String>,
    /// Pre-select "first result only" on the search form
    pub first_only: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_providers: vec!["google".to_string(), "bing".to_string()],
            first_only: false,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Upper bound for any provider deadline, in seconds
    pub max_request_timeout: f64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
            max_request_timeout: 30.0,
            pool_maxsize: 20,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

impl OutgoingSettings {
    /// Default request timeout
    pub fn request_timeout(&self) -> Result<Duration> {
        seconds("outgoing.request_timeout", self.request_timeout)
    }

    /// Upper bound for any provider deadline
    pub fn max_request_timeout(&self) -> Result<Duration> {
        seconds("outgoing.max_request_timeout", self.max_request_timeout)
    }
}

fn seconds(key: &str, value: f64) -> Result<Duration> {
    if value <= 0.0 {
        return Err(anyhow!("{} must be positive, got {}", key, value));
    }
    Duration::try_from_secs_f64(value).map_err(|e| anyhow!("invalid {} ({}): {}", key, value, e))
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Individual provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name (unique identifier)
    pub name: String,
    /// Provider implementation to use
    pub provider: String,
    /// Override for the provider's endpoint base URL
    pub base_url: Option<String>,
    /// Custom deadline for this provider, in seconds
    pub timeout: Option<f64>,
    /// Whether provider is disabled
    pub disabled: bool,
    /// Display name
    pub display_name: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            provider: String::new(),
            base_url: None,
            timeout: None,
            disabled: false,
            display_name: None,
        }
    }
}

/// Default provider configurations
fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            name: "google".to_string(),
            provider: "google".to_string(),
            display_name: Some("Google".to_string()),
            ..Default::default()
        },
        ProviderConfig {
            name: "bing".to_string(),
            provider: "bing".to_string(),
            display_name: Some("Bing".to_string()),
            ..Default::default()
        },
        ProviderConfig {
            name: "blekko".to_string(),
            provider: "blekko".to_string(),
            display_name: Some("Blekko".to_string()),
            ..Default::default()
        },
    ]
}
