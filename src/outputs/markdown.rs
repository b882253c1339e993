//! Markdown rendering of a dashboard response.
//!
//! Produces a standalone report: the summary first, then the article list
//! grouped under one heading per category.

use crate::models::DashboardResponse;
use crate::summarizer::group_by_category;
use std::fmt::Write;

/// Render `response` as Markdown. `generated_at` is printed verbatim.
pub fn response_to_markdown(response: &DashboardResponse, generated_at: &str) -> String {
    let mut md = String::new();
    writeln!(md, "# Healthcare IT News Summary\n").ok();
    writeln!(md, "_Generated {}_\n", generated_at).ok();

    if let Some(error) = &response.error {
        writeln!(md, "> {}", error).ok();
        return md;
    }

    writeln!(md, "## Summary\n").ok();
    match &response.summary {
        Some(summary) => writeln!(md, "{}\n", summary.trim_end()).ok(),
        None => writeln!(md, "_No summary available._\n").ok(),
    };

    if response.articles.is_empty() {
        return md;
    }

    writeln!(md, "## Articles\n").ok();
    for group in group_by_category(&response.articles) {
        writeln!(md, "### {}\n", group.category).ok();
        for article in group.articles {
            let mut meta = Vec::new();
            if let Some(source) = &article.source_name {
                meta.push(source.as_str());
            }
            if let Some(published) = &article.published_at {
                meta.push(published.as_str());
            }

            if article.url.is_empty() {
                write!(md, "- {}", article.title).ok();
            } else {
                write!(md, "- [{}]({})", article.title, article.url).ok();
            }
            if !meta.is_empty() {
                write!(md, " ({})", meta.join(", ")).ok();
            }
            md.push('\n');
            if let Some(description) = article.description.as_deref().filter(|d| !d.trim().is_empty()) {
                writeln!(md, "  {}", description.trim()).ok();
            }
        }
        md.push('\n');
    }
    md
}
