//! Bing search provider implementation
//!
//! Requests the RSS rendering of the result page and reads each
//! `rss/channel/item` entry.

use super::traits::*;
use crate::network::{accept_xml, HttpClient};
use crate::results::{ProviderError, ProviderId, SearchResult};
use async_trait::async_trait;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://www.bing.com";

/// Bing web search provider
pub struct Bing {
    id: ProviderId,
    display_name: String,
    base_url: String,
    timeout: Duration,
    client: HttpClient,
}

impl Bing {
    pub fn new(client: HttpClient) -> Self {
        Self {
            id: ProviderId::from("bing"),
            display_name: "Bing".to_string(),
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
        ProviderRequest::get(format!("{}/search", self.base_url))
            .param("q", term)
            .param("format", "rss")
            .header("Accept", accept_xml())
    }

    /// Parse the HTTP response into results
    pub fn response(&self, response: ProviderResponse) -> Result<Vec<SearchResult>, ProviderError> {
        let response = response.error_for_status()?;
        self.parse_rss(&response.text)
    }

    fn parse_rss(&self, xml: &str) -> Result<Vec<SearchResult>, ProviderError> {
        let channel = extract_tag(xml, "rss")
            .and_then(|rss| extract_tag(rss, "channel"))
            .ok_or_else(|| ProviderError::Decode("missing rss/channel element".to_string()))?;

        let mut results = Vec::new();

        for item in extract_all(channel, "item") {
            let title = extract_tag(item, "title").map(decode_text).unwrap_or_default();
            let link = extract_tag(item, "link").map(decode_text).unwrap_or_default();
            if link.is_empty() {
                continue;
            }
            let description = extract_tag(item, "description")
                .map(decode_text)
                .unwrap_or_default();

            results.push(SearchResult::new(self.id.clone(), title, link, description));
        }

        Ok(results)
    }
}

/// Locate the first `<tag>` element, returning its inner text and the
/// offset just past the element
fn find_element<'a>(xml: &'a str, tag: &str) -> Option<(&'a str, usize)> {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);

    let mut search_from = 0;
    let start = loop {
        let found = xml[search_from..].find(&open)? + search_from;
        let after_name = found + open.len();
        // Reject longer names sharing the prefix, e.g. <item> vs <itemList>.
        match xml[after_name..].chars().next() {
            Some('>') | Some(' ') | Some('\t') | Some('\n') | Some('\r') => break found,
            Some('/') => return Some(("", xml[after_name..].find('>')? + after_name + 1)),
            _ => search_from = after_name,
        }
    };

    let content_start = xml[start..].find('>')? + start + 1;
    // <tag attr="x"/> carries no content.
    if xml[..content_start].ends_with("/>") {
        return Some(("", content_start));
    }
    let end = xml[content_start..].find(&close)? + content_start;

    Some((&xml[content_start..end], end + close.len()))
}

/// Extract the inner text of the first `<tag>` element
fn extract_tag<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    find_element(xml, tag).map(|(inner, _)| inner)
}

/// Extract the inner text of every `<tag>` element, in document order
fn extract_all<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
    let mut found = Vec::new();
    let mut rest = xml;
    while let Some((inner, next)) = find_element(rest, tag) {
        found.push(inner);
        rest = &rest[next..];
    }
    found
}

/// Unwrap CDATA and decode XML entities
fn decode_text(raw: &str) -> String {
    let raw = raw.trim();
    let inner = raw
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"));
    match inner {
        Some(cdata) => clean_text(cdata),
        None => clean_text(&html_escape::decode_html_entities(raw)),
    }
}

#[async_trait]
impl Provider for Bing {
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
