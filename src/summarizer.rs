//! Category-grouped prompt construction and bullet summary formatting.

use crate::api::AskAsync;
use crate::models::Article;
use crate::outputs::segment::starts_with_bullet_marker;
use tracing::{error, info, instrument};

pub const NO_NEWS_MESSAGE: &str = "No recent news found.";

pub const SUMMARY_FAILED_MESSAGE: &str =
    "Unable to generate a summary at this time. Please try again later.";

pub const SYSTEM_PROMPT: &str = "You are an expert in healthcare IT, EHR systems, and regulatory compliance. \
Summarize ONLY healthcare IT related news in a concise, informative manner for EHR developers and \
healthcare IT professionals. Ignore any news not directly related to healthcare IT, EHR systems, or health technology.";

const PROMPT_HEADER: &str = "Please summarize the following healthcare IT news by category as a list of bullet points. \
Focus ONLY on healthcare IT, EHR systems, and health technology news. \
Ignore any news not directly related to healthcare:\n\n";

pub const BULLET: &str = "• ";

/// Articles of one category, in the order they were seen.
#[derive(Debug)]
pub struct CategoryGroup<'a> {
    pub category: &'a str,
    pub articles: Vec<&'a Article>,
}

/// Group by category label, keeping first-seen category order.
///
/// Every input article ends up in exactly one group.
pub fn group_by_category(articles: &[Article]) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();
    for article in articles {
        match groups.iter_mut().find(|g| g.category == article.category) {
            Some(group) => group.articles.push(article),
            None => groups.push(CategoryGroup {
                category: &article.category,
                articles: vec![article],
            }),
        }
    }
    groups
}

/// The user message: fixed header, then a `## <category>` section per group
/// listing at most `per_category` articles.
pub fn build_prompt(groups: &[CategoryGroup<'_>], per_category: usize) -> String {
    let mut prompt = String::from(PROMPT_HEADER);
    for group in groups {
        prompt.push_str("## ");
        prompt.push_str(group.category);
        prompt.push('\n');
        for article in group.articles.iter().take(per_category) {
            prompt.push_str(&format!(
                "- {}: {}\n",
                article.title,
                article.description_or_placeholder()
            ));
        }
        prompt.push('\n');
    }
    prompt
}

/// Normalize model output to bullets.
///
/// Text already starting with a bullet marker (`-`, `*` or `•` followed by
/// whitespace) is returned trimmed. Otherwise every non-empty line becomes
/// one `• ` bullet, markdown headings included; the segmenter's heading rule
/// therefore only fires on replies that were already bulleted.
pub fn format_bullets(text: &str) -> String {
    let trimmed = text.trim();
    if starts_with_bullet_marker(trimmed) {
        return trimmed.to_string();
    }
    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("{}{}", BULLET, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turns an article set into one bullet summary through a chat model.
///
/// Holds the model client and the per-category article cap for the prompt.
pub struct Summarizer<M> {
    model: M,
    per_category: usize,
}

impl<M> Summarizer<M> {
    #[cfg(test)]
    pub(crate) fn model(&self) -> &M {
        &self.model
    }
}

impl<M: AskAsync + Sync> Summarizer<M> {
    pub fn new(model: M, per_category: usize) -> Self {
        Self {
            model,
            per_category,
        }
    }

    /// Summarize an article set. Never fails: empty input and completion
    /// errors both come back as fixed messages.
    #[instrument(level = "info", skip_all, fields(articles = articles.len()))]
    pub async fn summarize(&self, articles: &[Article]) -> String {
        if articles.is_empty() {
            return NO_NEWS_MESSAGE.to_string();
        }

        let groups = group_by_category(articles);
        let prompt = build_prompt(&groups, self.per_category);
        info!(
            categories = groups.len(),
            prompt_bytes = prompt.len(),
            "Requesting summary"
        );

        match self.model.ask(SYSTEM_PROMPT, &prompt).await {
            Ok(text) => format_bullets(&text),
            Err(e) => {
                error!(error = %e, "Summary generation failed");
                SUMMARY_FAILED_MESSAGE.to_string()
            }
        }
    }
}
