//! HTTP client for making requests to search providers

use super::user_agent::generate_user_agent;
use crate::config::OutgoingSettings;
use crate::providers::{ProviderRequest, ProviderResponse};
use crate::results::ProviderError;
use anyhow::Result;
use reqwest::{Client, Response};
use std::time::Duration;

/// HTTP client wrapper shared by all providers
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let default_timeout = settings.request_timeout()?;
        let mut builder = Client::builder()
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            default_timeout,
            user_agent: generate_user_agent(),
        })
    }

    /// Execute a provider request with the provider's own deadline
    pub async fn execute_with_timeout(
        &self,
        request: ProviderRequest,
        timeout: Duration,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let mut req_builder = self
            .client
            .get(&request.url)
            .timeout(timeout)
            .header("User-Agent", &self.user_agent)
            .header("DNT", "1");

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| Self::map_error(e, timeout))?;

        Self::parse_response(response, timeout).await
    }

    async fn parse_response(
        response: Response,
        timeout: Duration,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let text = response
            .text()
            .await
            .map_err(|e| Self::map_error(e, timeout))?;

        Ok(ProviderResponse { status, text, url })
    }

    fn map_error(err: reqwest::Error, timeout: Duration) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(timeout)
        } else {
            ProviderError::Transport(err.to_string())
        }
    }

    /// Deadline for providers without one of their own
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}
