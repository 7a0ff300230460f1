//! Blekko search provider implementation

use super::traits::*;
use crate::network::{accept_json, HttpClient};
use crate::results::{ProviderError, ProviderId, SearchResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://blekko.com";

#[derive(Debug, Deserialize)]
struct BlekkoResponse {
    #[serde(rename = "RESULT", default)]
    result: Vec<BlekkoItem>,
}

#[derive(Debug, Deserialize)]
struct BlekkoItem {
    #[serde(default)]
    url: String,
    #[serde(default)]
    url_title: String,
    #[serde(default)]
    snippet: String,
}

/// Blekko web search provider
pub struct Blekko {
    id: ProviderId,
    display_name: String,
    base_url: String,
    timeout: Duration,
    client: HttpClient,
}

impl Blekko {
    pub fn new(client: HttpClient) -> Self {
        Self {
            id: ProviderId::from("blekko"),
            display_name: "Blekko".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_PROVIDER_TIMEOUT,
            client,
        }
    }

    pub fn with_id(mut self, id: impl Into<ProviderId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the HTTP request for a search.
    ///
    /// The `/json` slashtag asks for the JSON rendering of the result page.
    pub fn request(&self, term: &str) -> ProviderRequest {
        ProviderRequest::get(format!("{}/ws/", self.base_url))
            .param("q", format!("{} /json", term))
            .header("Accept", accept_json())
    }

    /// Parse the HTTP response into results
    pub fn response(&self, response: ProviderResponse) -> Result<Vec<SearchResult>, ProviderError> {
        let response = response.error_for_status()?;
        let decoded: BlekkoResponse = response.json()?;

        Ok(decoded
            .result
            .into_iter()
            .filter(|item| !item.url.is_empty())
            .map(|item| {
                SearchResult::new(
                    self.id.clone(),
                    clean_text(&html_escape::decode_html_entities(&item.url_title)),
                    item.url,
                    clean_text(&html_escape::decode_html_entities(&item.snippet)),
                )
            })
            .collect())
    }
}

#[async_trait]
impl Provider for Blekko {
    fn id(&self) -> ProviderId {
        self.id.clone()
    }

    fn display_name(&self) -> String {
        self.display_name.clone()
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn search(&self, term: &str) -> Result<Vec<SearchResult>, ProviderError> {
        let response = self
            .client
            .execute_with_timeout(self.request(term), self.timeout)
            .await?;
        self.response(response)
    }
}
