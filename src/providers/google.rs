//! Google search provider implementation
//!
//! Talks to the AJAX web search API, which answers with a JSON envelope:
//!
//! ```text
//! {"responseData": {"results": [{"url": "...", "title": "<b>..</b>", "content": "..."}]}}
//! ```

use super::traits::*;
use crate::network::{accept_json, HttpClient};
use crate::results::{ProviderError, ProviderId, SearchResult};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://ajax.googleapis.com";

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    #[serde(rename = "responseData")]
    response_data: Option<GoogleResponseData>,
}

#[derive(Debug, Deserialize)]
struct GoogleResponseData {
    #[serde(default)]
    results: Vec<GoogleItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleItem {
    #[serde(default)]
    url: String,
    #[serde(rename = "unescapedUrl")]
    unescaped_url: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(rename = "titleNoFormatting")]
    title_no_formatting: Option<String>,
    #[serde(default)]
    content: String,
}

/// Google web search provider
pub struct Google {
    id: ProviderId,
    display_name: String,
    base_url: String,
    timeout: Duration,
    client: HttpClient,
}

impl Google {
    pub fn new(client: HttpClient) -> Self {
        Self {
            id: ProviderId::from("google"),
            display_name: "Google".to_string(),
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

    /// Build the HTTP request for a search
    pub fn request(&self, term: &str) -> ProviderRequest {
        ProviderRequest::get(format!("{}/ajax/services/search/web", self.base_url))
            .param("v", "1.0")
            .param("rsz", "8")
            .param("q", term)
            .header("Accept", accept_json())
    }

    /// Parse the HTTP response into results
    pub fn response(&self, response: ProviderResponse) -> Result<Vec<SearchResult>, ProviderError> {
        let response = response.error_for_status()?;
        let decoded: GoogleResponse = response.json()?;

        let items = match decoded.response_data {
            Some(data) => data.results,
            None => return Ok(Vec::new()),
        };

        Ok(items
            .into_iter()
            .filter_map(|item| {
                let link = item
                    .unescaped_url
                    .filter(|u| !u.is_empty())
                    .unwrap_or(item.url);
                if link.is_empty() {
                    return None;
                }
                let title = item
                    .title_no_formatting
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| strip_markup(&item.title));
                Some(SearchResult::new(
                    self.id.clone(),
                    title,
                    link,
                    strip_markup(&item.content),
                ))
            })
            .collect())
    }
}

/// Remove inline markup such as `<b>` and decode entities
fn strip_markup(text: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    let tags = TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));
    let without_tags = tags.replace_all(text, "");
    clean_text(&html_escape::decode_html_entities(&without_tags))
}

#[async_trait]
impl Provider for Google {
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
