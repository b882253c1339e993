//! News-search client and the per-category fetch loop.
//!
//! Each [`QueryPlan`] becomes one `GET /v2/everything` call. Calls run one
//! after another; a failure in one category is logged and skipped so the
//! remaining categories still contribute articles.

use crate::config::SearchConfig;
use crate::error::{ApiError, ApiResult};
use crate::models::Article;
use crate::query::QueryPlan;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Anything that can run a news search query.
pub trait NewsSearch {
    fn search(&self, query: &str) -> impl Future<Output = ApiResult<Vec<SearchHit>>> + Send;
}

/// One entry of the search API's `articles` array.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(default)]
    pub source: Option<HitSource>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitSource {
    #[serde(default)]
    pub name: Option<String>,
}

impl SearchHit {
    /// Stamp the hit with the category it was fetched under.
    pub fn into_article(self, category: &str) -> Article {
        Article {
            title: self.title,
            description: self.description,
            url: self.url,
            published_at: self.published_at,
            category: category.to_string(),
            source_name: self.source.and_then(|s| s.name),
            author: self.author,
            image_url: self.url_to_image,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<SearchHit>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a search API body, turning `"status": "error"` payloads into errors.
pub fn parse_search_response(body: &str) -> ApiResult<Vec<SearchHit>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    if response.status.as_deref() == Some("error") {
        let code = response.code.unwrap_or_else(|| "unknown".to_string());
        let message = response.message.unwrap_or_default();
        return Err(ApiError::Provider(format!("{}: {}", code, message)));
    }
    Ok(response.articles)
}

/// Client for a NewsAPI-compatible `/v2/everything` endpoint.
#[derive(Clone)]
pub struct NewsApiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    language: String,
    sort_by: String,
    page_size: u32,
}

impl std::fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("endpoint", &self.endpoint)
            .field("language", &self.language)
            .field("sort_by", &self.sort_by)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl NewsApiClient {
    pub fn new(config: &SearchConfig, api_key: String) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            language: config.language.clone(),
            sort_by: config.sort_by.clone(),
            page_size: config.page_size,
        })
    }
}

impl NewsSearch for NewsApiClient {
    #[instrument(level = "info", skip_all, fields(query = %truncate_for_log(query, 120)))]
    async fn search(&self, query: &str) -> ApiResult<Vec<SearchHit>> {
        let page_size = self.page_size.to_string();
        // The request URL carries the API key; errors must not echo it.
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("apiKey", self.api_key.as_str()),
                ("language", self.language.as_str()),
                ("sortBy", self.sort_by.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Http(e.without_url()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Http(e.without_url()))?;
        if !status.is_success() {
            warn!(%status, body = %truncate_for_log(&body, 300), "Search API returned an error status");
            return Err(ApiError::from_status(status, truncate_for_log(&body, 300)));
        }

        let hits = parse_search_response(&body)?;
        debug!(count = hits.len(), "Parsed search response");
        Ok(hits)
    }
}

/// Run every plan in order and collect the stamped articles.
///
/// A failing plan contributes nothing; the rest still run. The returned
/// list is in fetch order and may be empty.
#[instrument(level = "info", skip_all, fields(plans = plans.len()))]
pub async fn fetch_articles<S>(searcher: &S, plans: &[QueryPlan]) -> Vec<Article>
where
    S: NewsSearch + Sync,
{
    let mut articles = Vec::new();
    for plan in plans {
        debug!(category = %plan.category, query = %plan.query, "Fetching category");
        match searcher.search(&plan.query).await {
            Ok(hits) => {
                info!(category = %plan.category, count = hits.len(), "Fetched articles");
                articles.extend(hits.into_iter().map(|hit| hit.into_article(&plan.category)));
            }
            Err(e) => {
                error!(category = %plan.category, error = %e, "Failed to fetch category; skipping");
            }
        }
    }

    info!(count = articles.len(), "Total articles fetched");
    articles
}
