//! The dashboard request handler: selection in, articles and summary out.
//!
//! [`Dashboard::handle`] runs the whole pipeline for one request:
//! query planning, sequential per-category fetches, newest-first ranking,
//! summarization, and summary segmentation. It never returns an error;
//! every failure is already folded into the [`DashboardResponse`].

use crate::api::{AskAsync, OpenAiClient};
use crate::config::{Credentials, DashboardConfig};
use crate::error::ApiResult;
use crate::models::{DashboardRequest, DashboardResponse};
use crate::outputs::segment::segment_summary;
use crate::query::QueryBuilder;
use crate::ranking::rank_articles;
use crate::search::{NewsApiClient, NewsSearch, fetch_articles};
use crate::summarizer::Summarizer;
use tracing::{debug, info, instrument};

pub const NO_SELECTION_MESSAGE: &str =
    "Please select at least one category or enter a search term.";

/// The request handler, generic over its search backend and chat model.
///
/// Immutable after construction, so one instance can be shared across
/// concurrent HTTP requests behind an `Arc`.
pub struct Dashboard<S, M> {
    config: DashboardConfig,
    searcher: S,
    summarizer: Summarizer<M>,
}

/// The production wiring: NewsAPI for search, OpenAI for completions.
pub type LiveDashboard = Dashboard<NewsApiClient, OpenAiClient>;

impl LiveDashboard {
    /// Build the real clients from config and the startup credentials.
    pub fn from_credentials(config: DashboardConfig, credentials: Credentials) -> ApiResult<Self> {
        let searcher = NewsApiClient::new(&config.search, credentials.news_api_key)?;
        let model = OpenAiClient::new(&config.completion, credentials.openai_api_key);
        Ok(Dashboard::new(config, searcher, model))
    }
}

impl<S, M> Dashboard<S, M>
where
    S: NewsSearch + Sync,
    M: AskAsync + Sync,
{
    /// Wire a dashboard from its parts.
    ///
    /// # Arguments
    /// * `config` - Category table plus search and summary settings
    /// * `searcher` - Backend used for every per-category search call
    /// * `model` - Chat model the summarizer asks once per request
    pub fn new(config: DashboardConfig, searcher: S, model: M) -> Self {
        let per_category = config.summary.max_articles_per_category;
        Self {
            config,
            searcher,
            summarizer: Summarizer::new(model, per_category),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Run one request through the pipeline.
    ///
    /// # Returns
    /// A [`DashboardResponse`] with `error` set when nothing was selected, or
    /// with the ranked articles, the summary and its segments otherwise.
    #[instrument(level = "info", skip_all, fields(categories = request.categories.len(), search = request.search_term().is_some()))]
    pub async fn handle(&self, request: &DashboardRequest) -> DashboardResponse {
        let builder = QueryBuilder::new(&self.config);
        let plans = builder.plan(&request.categories, request.search_term());
        if plans.is_empty() {
            info!("Nothing selected; skipping fetch");
            return DashboardResponse::rejected(NO_SELECTION_MESSAGE);
        }

        debug!(
            combined = ?builder.build(&request.categories, request.search_term()),
            calls = plans.len(),
            "Planned search"
        );
        let mut articles = fetch_articles(&self.searcher, &plans).await;
        rank_articles(&mut articles);

        let summary = self.summarizer.summarize(&articles).await;
        let segments = segment_summary(&summary);
        info!(
            articles = articles.len(),
            segments = segments.len(),
            "Request complete"
        );

        DashboardResponse {
            articles,
            summary: Some(summary),
            segments,
            error: None,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::tests::FakeModel;
    use crate::error::ApiError;
    use crate::query::{DOMAIN_CONTEXT, RELEVANCE_FILTER};
    use crate::search::tests::{FakeSearch, hit};
    use crate::summarizer::{NO_NEWS_MESSAGE, SUMMARY_FAILED_MESSAGE};
    use reqwest::StatusCode;

    fn query_for(config: &DashboardConfig, label: &str) -> String {
        format!("({}) AND {}", config.category(label).unwrap().query, RELEVANCE_FILTER)
    }

    fn request(categories: &[&str], search: &str) -> DashboardRequest {
        DashboardRequest::new(
            categories.iter().map(|s| s.to_string()).collect(),
            Some(search.to_string()),
        )
    }

    #[tokio::test]
    async fn test_empty_selection_makes_no_calls() {
        let dashboard = Dashboard::new(
            DashboardConfig::default(),
            FakeSearch::default(),
            FakeModel::replying("unused"),
        );
        let response = dashboard.handle(&request(&[], "  ")).await;

        assert_eq!(response.error.as_deref(), Some(NO_SELECTION_MESSAGE));
        assert!(response.articles.is_empty());
        assert!(response.summary.is_none());
        assert_eq!(dashboard.searcher.call_count(), 0);
        assert_eq!(dashboard.summarizer_model().call_count(), 0);
    }

    #[tokio::test]
    async fn test_category_request_sends_category_query() {
        let config = DashboardConfig::default();
        let query = query_for(&config, "EHR News");
        let search = FakeSearch::default().with(
            &query,
            Ok(vec![
                hit("Older", Some("2025-01-01T00:00:00Z")),
                hit("Newer", Some("2025-02-01T00:00:00Z")),
            ]),
        );
        let dashboard = Dashboard::new(config, search, FakeModel::replying("Point one\nPoint two"));

        let response = dashboard.handle(&request(&["EHR News"], "")).await;

        assert_eq!(*dashboard.searcher.calls.lock().unwrap(), vec![query]);
        let titles: Vec<_> = response.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
        assert!(response.articles.iter().all(|a| a.category == "EHR News"));
        assert_eq!(response.summary.as_deref(), Some("• Point one\n• Point two"));
        assert_eq!(response.segments.len(), 1);
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_search_term_only_uses_search_results_label() {
        let query = format!("Epic EHR AND {}", DOMAIN_CONTEXT);
        let search = FakeSearch::default().with(&query, Ok(vec![hit("Epic", None)]));
        let dashboard = Dashboard::new(DashboardConfig::default(), search, FakeModel::replying("- ok"));

        let response = dashboard.handle(&request(&[], "Epic EHR")).await;

        assert_eq!(response.articles.len(), 1);
        assert_eq!(response.articles[0].category, "Search Results");
        let prompts = dashboard.summarizer_model().prompts.lock().unwrap();
        assert!(prompts[0].1.contains("## Search Results\n"));
    }

    #[tokio::test]
    async fn test_one_failing_category_keeps_the_other() {
        let config = DashboardConfig::default();
        let search = FakeSearch::default()
            .with(&query_for(&config, "EHR News"), Err(StatusCode::INTERNAL_SERVER_ERROR))
            .with(&query_for(&config, "Market Trends"), Ok(vec![hit("Deal", None)]));
        let dashboard = Dashboard::new(config, search, FakeModel::replying("- ok"));

        let response = dashboard
            .handle(&request(&["EHR News", "Market Trends"], ""))
            .await;

        assert_eq!(dashboard.searcher.call_count(), 2);
        assert_eq!(response.articles.len(), 1);
        assert_eq!(response.articles[0].category, "Market Trends");
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn test_no_articles_skips_completion() {
        let dashboard = Dashboard::new(
            DashboardConfig::default(),
            FakeSearch::default(),
            FakeModel::replying("unused"),
        );
        let response = dashboard.handle(&request(&["AI in Healthcare"], "")).await;

        assert_eq!(response.summary.as_deref(), Some(NO_NEWS_MESSAGE));
        assert_eq!(dashboard.summarizer_model().call_count(), 0);
    }

    #[tokio::test]
    async fn test_completion_auth_error_is_displayable() {
        let query = format!("Epic AND {}", DOMAIN_CONTEXT);
        let search = FakeSearch::default().with(&query, Ok(vec![hit("Epic", None)]));
        let dashboard = Dashboard::new(
            DashboardConfig::default(),
            search,
            FakeModel::failing(|| ApiError::Unauthorized),
        );

        let response = dashboard.handle(&request(&[], "Epic")).await;

        assert_eq!(response.summary.as_deref(), Some(SUMMARY_FAILED_MESSAGE));
        assert_eq!(response.articles.len(), 1);
        assert_eq!(
            response.segments,
            vec![crate::outputs::segment::Segment::Paragraph(SUMMARY_FAILED_MESSAGE.into())]
        );
    }

    impl<S> Dashboard<S, FakeModel> {
        pub(crate) fn summarizer_model(&self) -> &FakeModel {
            self.summarizer.model()
        }
    }
}
