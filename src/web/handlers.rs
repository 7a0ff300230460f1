//! HTTP request handlers

use super::state::AppState;
use crate::results::SearchResult;
use crate::search::SearchOptions;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tera::Context;

/// Search parameters, from the query string or a posted form.
///
/// Providers are enabled either by a checkbox named after the provider
/// (`bing=on`) or by a comma-separated `providers` list.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Search term
    pub q: Option<String>,
    /// "First result only" checkbox
    pub first: Option<String>,
    /// Output format
    pub format: Option<String>,
    /// Providers (comma-separated)
    pub providers: Option<String>,
    /// Remaining fields, checked against provider ids
    #[serde(flatten)]
    pub toggles: HashMap<String, String>,
}

impl SearchParams {
    /// Build search options, keeping only providers known to `known`
    pub fn to_options(&self, known: &[crate::results::ProviderId]) -> SearchOptions {
        let mut enabled = BTreeSet::new();

        if let Some(ref list) = self.providers {
            enabled.extend(
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(Into::into),
            );
        }

        for id in known {
            if self.toggles.get(id.as_str()).is_some_and(|v| is_checked(v)) {
                enabled.insert(id.clone());
            }
        }

        SearchOptions {
            search_term: self.q.clone().unwrap_or_default(),
            providers: enabled,
            first_only: self.first.as_deref().is_some_and(is_checked),
        }
    }
}

fn is_checked(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes"
    )
}

/// Search results response for JSON format
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub first_only: bool,
    pub number_of_results: usize,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Serialize)]
struct ProviderOption {
    id: String,
    name: String,
    checked: bool,
}

fn form_context(state: &AppState, enabled: Option<&SearchOptions>) -> Context {
    let providers: Vec<ProviderOption> = state
        .registry
        .ids()
        .into_iter()
        .filter_map(|id| {
            let provider = state.registry.get(id.as_str())?;
            let checked = match enabled {
                Some(options) => options.providers.contains(&id),
                None => state
                    .settings
                    .search
                    .default_providers
                    .iter()
                    .any(|p| p == id.as_str()),
            };
            Some(ProviderOption {
                id: id.to_string(),
                name: provider.display_name(),
                checked,
            })
        })
        .collect();

    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("providers", &providers);
    ctx.insert(
        "first_only",
        &enabled.map_or(state.settings.search.first_only, |o| o.first_only),
    );
    ctx
}

fn render(state: &AppState, template: &str, ctx: &Context) -> Response {
    match state.templates.render_with_context(template, ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Home page handler
pub async fn index(State(state): State<AppState>) -> Response {
    let ctx = form_context(&state, None);
    render(&state, "index.html", &ctx)
}

/// Search handler for GET requests
pub async fn search_get(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    search(state, params).await
}

/// Search handler for form posts
pub async fn search_post(
    State(state): State<AppState>,
    Form(params): Form<SearchParams>,
) -> Response {
    search(state, params).await
}

async fn search(state: AppState, params: SearchParams) -> Response {
    if params.q.as_deref().map_or(true, |q| q.trim().is_empty()) {
        return Redirect::to("/").into_response();
    }

    let options = params.to_options(&state.registry.ids());
    let results = state.search.submit(&options).await;

    match params.format.as_deref() {
        Some("json") => Json(SearchResponse {
            query: options.search_term,
            first_only: options.first_only,
            number_of_results: results.len(),
            results,
        })
        .into_response(),
        _ => {
            let mut ctx = form_context(&state, Some(&options));
            ctx.insert("query", &options.search_term);
            ctx.insert("result_count", &results.len());
            ctx.insert("results", &results);
            render(&state, "results.html", &ctx)
        }
    }
}

/// Provider statistics handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    let metrics = state.search.metrics();
    Json(serde_json::json!({
        "total_searches": metrics.get_total_searches(),
        "providers": metrics.get_provider_stats(),
    }))
}

/// Health check handler
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::ProviderId;

    fn known() -> Vec<ProviderId> {
        vec!["bing".into(), "blekko".into(), "google".into()]
    }

    #[test]
    fn test_checkbox_toggles() {
        let mut params = SearchParams {
            q: Some("news iraq".to_string()),
            first: Some("on".to_string()),
            ..Default::default()
        };
        params.toggles.insert("google".to_string(), "on".to_string());
        params.toggles.insert("bing".to_string(), "off".to_string());
        params.toggles.insert("unrelated".to_string(), "on".to_string());

        let options = params.to_options(&known());

        assert_eq!(options.search_term, "news iraq");
        assert!(options.first_only);
        assert_eq!(options.providers.len(), 1);
        assert!(options.providers.contains("google"));
    }

    #[test]
    fn test_provider_list() {
        let params = SearchParams {
            q: Some("rust".to_string()),
            providers: Some("bing, blekko,".to_string()),
            ..Default::default()
        };

        let options = params.to_options(&known());

        assert!(!options.first_only);
        assert_eq!(
            options.providers.into_iter().collect::<Vec<_>>(),
            vec![ProviderId::from("bing"), ProviderId::from("blekko")]
        );
    }
}
