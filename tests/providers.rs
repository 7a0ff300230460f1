//! Provider adapters against a local mock HTTP server.

use concurrent_search::config::{ProviderConfig, Settings};
use concurrent_search::network::HttpClient;
use concurrent_search::providers::{bing::Bing, blekko::Blekko, google::Google, ProviderLoader};
use concurrent_search::search::run_provider;
use concurrent_search::{Provider, ProviderError, Search, SearchOptions};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BING_RSS: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<rss version="2.0">
  <channel>
    <title>Bing: news iraq</title>
    <item>
      <title>Iraq news</title>
      <link>https://news.example/iraq</link>
      <description>Latest headlines</description>
    </item>
  </channel>
</rss>"#;

async fn mount_google(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/ajax/services/search/web"))
        .and(query_param("q", "news iraq"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "responseData": {
                "results": [
                    {"url": "https://a.example/", "titleNoFormatting": "A", "content": "first"},
                    {"url": "https://b.example/", "titleNoFormatting": "B", "content": "second"}
                ]
            }
        })))
        .mount(server)
        .await;
}

async fn mount_bing(server: &MockServer, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("format", "rss"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(BING_RSS)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn google_decodes_json_envelope() {
    let server = MockServer::start().await;
    mount_google(&server).await;

    let google = Google::new(HttpClient::new().unwrap()).with_base_url(server.uri());
    let results = google.search("news iraq").await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "A");
    assert_eq!(results[1].link, "https://b.example/");
}

#[tokio::test]
async fn bing_decodes_rss() {
    let server = MockServer::start().await;
    mount_bing(&server, Duration::ZERO).await;

    let bing = Bing::new(HttpClient::new().unwrap()).with_base_url(server.uri());
    let results = bing.search("news iraq").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "Iraq news");
    assert_eq!(results[0].engine.as_str(), "bing");
}

#[tokio::test]
async fn blekko_http_error_is_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let blekko = Blekko::new(HttpClient::new().unwrap()).with_base_url(server.uri());
    let err = blekko.search("rust").await.unwrap_err();

    assert!(matches!(err, ProviderError::Transport(_)));
}

#[tokio::test]
async fn loader_wires_configured_endpoints_into_search() {
    let server = MockServer::start().await;
    mount_google(&server).await;
    mount_bing(&server, Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(path("/ws/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let mut settings = Settings::default();
    for config in settings.providers.iter_mut() {
        config.base_url = Some(server.uri());
    }

    let client = HttpClient::with_settings(&settings.outgoing).unwrap();
    let registry = ProviderLoader::load(&settings, &client).unwrap();
    let search = Search::new(Arc::new(registry));
    let options = SearchOptions::new("news iraq").with_providers(["google", "bing", "blekko"]);

    let results = tokio::time::timeout(Duration::from_secs(10), search.submit(&options))
        .await
        .unwrap();

    // Blekko's undecodable body contributes nothing.
    assert_eq!(results.len(), 3);
    assert_eq!(search.metrics().get_reliability("blekko"), 0.0);
}

#[tokio::test]
async fn first_only_prefers_faster_endpoint() {
    let server = MockServer::start().await;
    mount_google(&server).await;
    mount_bing(&server, Duration::from_millis(300)).await;

    let mut settings = Settings::default();
    settings.providers = vec![
        ProviderConfig {
            name: "google".to_string(),
            provider: "google".to_string(),
            base_url: Some(server.uri()),
            ..Default::default()
        },
        ProviderConfig {
            name: "bing".to_string(),
            provider: "bing".to_string(),
            base_url: Some(server.uri()),
            ..Default::default()
        },
    ];

    let client = HttpClient::with_settings(&settings.outgoing).unwrap();
    let search = Search::new(Arc::new(ProviderLoader::load(&settings, &client).unwrap()));
    let options = SearchOptions::new("news iraq")
        .with_providers(["google", "bing"])
        .first_only(true);

    let submission = search.submit_tracked(&options).await;

    assert_eq!(submission.results.len(), 2);
    assert!(submission.results.iter().all(|r| r.engine.as_str() == "google"));

    let report = submission.drained().await.unwrap();
    assert_eq!(report.received, 2);
    assert_eq!(report.discarded, 1);
}

#[tokio::test]
async fn slow_endpoint_hits_provider_deadline() {
    let server = MockServer::start().await;
    mount_bing(&server, Duration::from_secs(3)).await;

    let bing = Bing::new(HttpClient::new().unwrap())
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(100));
    let registry = concurrent_search::ProviderRegistry::new().with(Arc::new(bing));
    let search = Search::new(Arc::new(registry));
    let options = SearchOptions::new("rust").with_provider("bing");

    let submission = tokio::time::timeout(Duration::from_secs(2), search.submit_tracked(&options))
        .await
        .unwrap();

    assert!(submission.results.is_empty());
    assert_eq!(submission.drained().await.unwrap().failed, 1);
}

#[tokio::test]
async fn provider_deadline_outlives_default_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ws/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "RESULT": [{"url": "https://www.rust-lang.org/", "url_title": "Rust", "snippet": ""}]
                }))
                .set_delay(Duration::from_millis(600)),
        )
        .mount(&server)
        .await;

    let mut settings = Settings::default();
    settings.outgoing.request_timeout = 0.2;
    settings.providers = vec![ProviderConfig {
        name: "blekko".to_string(),
        provider: "blekko".to_string(),
        base_url: Some(server.uri()),
        timeout: Some(3.0),
        ..Default::default()
    }];

    let client = HttpClient::with_settings(&settings.outgoing).unwrap();
    let registry = ProviderLoader::load(&settings, &client).unwrap();
    let blekko = registry.get("blekko").unwrap();
    assert_eq!(blekko.timeout(), Duration::from_secs(3));

    let batch = run_provider(&**blekko, "rust", blekko.timeout()).await;

    assert!(batch.failure.is_none(), "failed: {:?}", batch.failure);
    assert_eq!(batch.len(), 1);
}

#[tokio::test]
async fn request_expiry_is_reported_as_timeout() {
    let server = MockServer::start().await;
    mount_bing(&server, Duration::from_millis(600)).await;

    let bing = Bing::new(HttpClient::new().unwrap())
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(150));

    let err = bing.search("rust").await.unwrap_err();

    assert!(matches!(err, ProviderError::Timeout(t) if t == Duration::from_millis(150)));
}
