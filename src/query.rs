//! Search-query construction.
//!
//! Turns the user's selection into boolean query strings for the news-search
//! API. Rules:
//!
//! - no known category and a blank term: no query at all
//! - a term is ANDed in front: `<term> AND ...`
//! - selected category fragments are ORed inside one group, then the
//!   healthcare relevance filter is ANDed on
//! - with no category the broader domain context stands in for both
//!
//! Unknown labels are skipped, never an error.

use crate::config::{Category, DashboardConfig};
use itertools::Itertools;
use tracing::debug;

/// ANDed onto every category-scoped query to cut false positives.
pub const RELEVANCE_FILTER: &str = "(healthcare OR health OR medical OR EHR OR EMR)";

/// Used instead of category fragments when only a search term was given.
pub const DOMAIN_CONTEXT: &str =
    "(healthcare OR health OR medical OR EHR OR EMR OR technology OR business)";

/// The pseudo-category for term-only searches.
pub const SEARCH_RESULTS_LABEL: &str = "Search Results";

/// One search call: the label stamped on its results and the query to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub category: String,
    pub query: String,
}

/// Builds search queries against a borrowed category table.
///
/// Cheap to construct per request; it only holds a slice reference.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    categories: &'a [Category],
}

impl<'a> QueryBuilder<'a> {
    pub fn new(config: &'a DashboardConfig) -> Self {
        Self::from_categories(&config.categories)
    }

    pub fn from_categories(categories: &'a [Category]) -> Self {
        Self { categories }
    }

    /// Selected categories that exist in the table, in selection order,
    /// without duplicates.
    pub fn resolve<S: AsRef<str>>(&self, selected: &[S]) -> Vec<&'a Category> {
        selected
            .iter()
            .map(|s| s.as_ref())
            .unique()
            .filter_map(|label| {
                let found = self.categories.iter().find(|c| c.label == label);
                if found.is_none() {
                    debug!(%label, "Skipping unknown category");
                }
                found
            })
            .collect()
    }

    /// Build the single combined query, or `None` when there is nothing to
    /// search for.
    pub fn build<S: AsRef<str>>(&self, selected: &[S], term: Option<&str>) -> Option<String> {
        compose(&self.resolve(selected), term)
    }

    /// Build one query per selected category (or one "Search Results"
    /// query for a term-only search). Empty means "make no calls".
    pub fn plan<S: AsRef<str>>(&self, selected: &[S], term: Option<&str>) -> Vec<QueryPlan> {
        let resolved = self.resolve(selected);
        if resolved.is_empty() {
            return compose(&[], term)
                .map(|query| QueryPlan {
                    category: SEARCH_RESULTS_LABEL.to_string(),
                    query,
                })
                .into_iter()
                .collect();
        }

        resolved
            .into_iter()
            .filter_map(|category| {
                compose(&[category], term).map(|query| QueryPlan {
                    category: category.label.clone(),
                    query,
                })
            })
            .collect()
    }
}

fn compose(categories: &[&Category], term: Option<&str>) -> Option<String> {
    let term = term.map(str::trim).filter(|t| !t.is_empty());
    if categories.is_empty() && term.is_none() {
        return None;
    }

    let mut parts: Vec<String> = Vec::with_capacity(3);
    if let Some(term) = term {
        parts.push(term.to_string());
    }
    if categories.is_empty() {
        parts.push(DOMAIN_CONTEXT.to_string());
    } else {
        let fragments = categories.iter().map(|c| c.query.trim()).join(" OR ");
        parts.push(format!("({})", fragments));
        parts.push(RELEVANCE_FILTER.to_string());
    }
    Some(parts.join(" AND "))
}
