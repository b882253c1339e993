//! Newest-first ordering of the fetched article set.

use crate::models::Article;

/// Sort articles by `publishedAt`, newest first.
///
/// The sort is stable, so ties keep their fetch order. Articles without a
/// timestamp use the empty key and therefore land at the end.
pub fn rank_articles(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.published_key().cmp(a.published_key()));
}
