//! ArticleSource trait: read-only access to published article metadata.
//!
//! Handlers and builders depend on this trait instead of the HTTP client,
//! so tests can swap in an in-memory source.

use crate::domain::{ArticleSummary, CategorySummary};
use crate::error::UpstreamError;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::warn;

/// Page request against the sitemap listing (`/api/articles/sitemap`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArticleQuery {
    pub page: u32,
    pub limit: u32,
    pub timeout: Duration,
}

/// Newest-first request against the general listing (`/api/articles`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentQuery {
    /// `None` lists every category.
    pub category_id: Option<String>,
    pub limit: u32,
}

/// One page of published articles. `success` mirrors the backend flag and
/// is `false` for the empty page produced after a failed fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticlePage {
    pub docs: Vec<ArticleSummary>,
    pub success: bool,
}

impl ArticlePage {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Trait for reading published articles and categories from the backend.
///
/// This trait is dyn-compatible by using boxed futures.
pub trait ArticleSource: Send + Sync {
    /// Fetch one page of published article metadata.
    fn fetch_published(
        &self,
        query: ArticleQuery,
    ) -> Pin<Box<dyn Future<Output = Result<ArticlePage, UpstreamError>> + Send + '_>>;

    /// Fetch the full category list.
    fn fetch_categories(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<CategorySummary>, UpstreamError>> + Send + '_>>;

    /// Fetch the newest published articles, optionally within one category.
    fn fetch_recent(
        &self,
        query: RecentQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ArticleSummary>, UpstreamError>> + Send + '_>>;
}

/// Single attempt that never fails: any upstream error is logged and
/// turned into an empty, unsuccessful page.
pub async fn published_or_empty(source: &dyn ArticleSource, query: ArticleQuery) -> ArticlePage {
    match source.fetch_published(query).await {
        Ok(page) => page,
        Err(e) => {
            warn!(
                page = query.page,
                limit = query.limit,
                error = %e,
                "published article fetch failed, continuing without articles"
            );
            ArticlePage::empty()
        }
    }
}
