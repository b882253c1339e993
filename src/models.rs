//! Data models shared by the fetch, rank, and summarize stages.
//!
//! - [`Article`]: one search hit, stamped with the category it was fetched under
//! - [`DashboardRequest`]: what the user picked (categories and/or a search term)
//! - [`DashboardResponse`]: everything the presentation layer needs to render
//!
//! Nothing here is persisted. An article lives for exactly one request.

use crate::outputs::segment::Segment;
use serde::{Deserialize, Serialize};

/// A news article returned by the search API.
///
/// Field names serialize in camelCase so the JSON handed to the browser
/// matches the search API's own shape (`publishedAt`, `imageUrl`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// The headline. Empty when the API returned `null`.
    pub title: String,
    /// The short teaser text, if the API supplied one.
    pub description: Option<String>,
    /// Link to the full story.
    pub url: String,
    /// ISO-8601 timestamp. Lexicographic order equals chronological order.
    pub published_at: Option<String>,
    /// The category label this article was fetched under.
    pub category: String,
    /// Publisher name (`source.name` in the search API).
    pub source_name: Option<String>,
    /// Byline, when the publisher provides one.
    pub author: Option<String>,
    /// Lead image (`urlToImage` in the search API).
    pub image_url: Option<String>,
}

impl Article {
    /// Sort key used by the ranker: missing timestamps compare as `""`.
    pub fn published_key(&self) -> &str {
        self.published_at.as_deref().unwrap_or("")
    }

    /// Description for prompts and listings, with a fixed placeholder.
    pub fn description_or_placeholder(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => "No description available",
        }
    }
}

/// A typed dashboard request: the selected categories and the free-text term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardRequest {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl DashboardRequest {
    pub fn new(categories: Vec<String>, search: Option<String>) -> Self {
        Self { categories, search }
    }

    /// The search term with surrounding whitespace removed, or `None` if blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// The outcome of one dashboard request.
///
/// Every failure path still produces a response: either `error` is set and
/// the payload is empty, or `summary` holds displayable text (which may be
/// a fixed "no news" or "summary unavailable" message).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DashboardResponse {
    /// Articles sorted newest first.
    pub articles: Vec<Article>,
    /// The bullet summary, or a fixed user-facing message.
    pub summary: Option<String>,
    /// The summary split into renderable blocks.
    #[serde(default)]
    pub segments: Vec<Segment>,
    /// Set when the request was rejected before any network call.
    pub error: Option<String>,
}

impl DashboardResponse {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }
}
