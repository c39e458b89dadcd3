use super::rss::{FeedScope, FeedWriter};
use crate::domain::CategorySummary;
use crate::error::UpstreamError;
use crate::port::{ArticleSource, RecentQuery};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Items per channel, newest first.
pub const FEED_ITEM_LIMIT: u32 = 50;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("category not found: {0}")]
    CategoryNotFound(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Builds RSS channels on demand from the article source.
pub struct FeedService {
    source: Arc<dyn ArticleSource>,
    writer: FeedWriter,
}

impl FeedService {
    pub fn new(source: Arc<dyn ArticleSource>, writer: FeedWriter) -> Self {
        Self { source, writer }
    }

    /// RSS document for the category with `slug`.
    ///
    /// # Errors
    /// [`FeedError::CategoryNotFound`] when no category has that slug, and
    /// [`FeedError::Upstream`] when the category or article fetch fails.
    pub async fn category_feed(&self, slug: &str) -> Result<String, FeedError> {
        let categories = self.source.fetch_categories().await?;
        let Some(category) = find_by_slug(&categories, slug) else {
            info!(slug, "feed requested for unknown category");
            return Err(FeedError::CategoryNotFound(slug.to_string()));
        };

        let articles = self
            .source
            .fetch_recent(RecentQuery {
                category_id: Some(category.id.clone()),
                limit: FEED_ITEM_LIMIT,
            })
            .await?;

        info!(
            slug,
            items = articles.len(),
            "category feed generated"
        );
        Ok(self.writer.render(
            FeedScope::Category(category),
            &articles,
            &categories,
            Utc::now(),
        ))
    }

    /// RSS document across all categories.
    ///
    /// Categories only feed item tagging here, so a failed category fetch
    /// degrades to untagged-by-mention items.
    ///
    /// # Errors
    /// [`FeedError::Upstream`] when the article fetch fails.
    pub async fn site_feed(&self) -> Result<String, FeedError> {
        let categories = match self.source.fetch_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                warn!(error = %e, "category fetch failed, site feed items will not be cross-tagged");
                Vec::new()
            }
        };

        let articles = self
            .source
            .fetch_recent(RecentQuery {
                category_id: None,
                limit: FEED_ITEM_LIMIT,
            })
            .await?;

        info!(items = articles.len(), "site feed generated");
        Ok(self
            .writer
            .render(FeedScope::Site, &articles, &categories, Utc::now()))
    }
}

fn find_by_slug<'a>(categories: &'a [CategorySummary], slug: &str) -> Option<&'a CategorySummary> {
    categories
        .iter()
        .find(|c| c.slug.eq_ignore_ascii_case(slug.trim()))
}
