//! Sitemap assembly.
//!
//! One builder serves every sitemap route; a [`SitemapPlan`] selects the
//! route groups, the article page, and what happens when the article fetch
//! fails.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/article/test-1</loc>
//!     <lastmod>2024-01-01T00:00:00.000Z</lastmod>
//!     <changefreq>weekly</changefreq>
//!     <priority>0.6</priority>
//!   </url>
//! </urlset>
//! ```

use super::routes::{article_route, category_routes, feed_routes, static_routes};
use crate::domain::SiteRoute;
use crate::error::UpstreamError;
use crate::port::{ArticleQuery, ArticleSource, published_or_empty};
use crate::xml::escape_xml;
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Upper bound on URLs in one sitemap document (sitemaps.org protocol).
pub const MAX_URLS_PER_SITEMAP: u32 = 50_000;

pub const FULL_ARTICLE_LIMIT: u32 = 10_000;
pub const COMPACT_ARTICLE_LIMIT: u32 = 100;
pub const DEFAULT_ARTICLES_PAGE_LIMIT: u32 = 500;

/// What to do when the article fetch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Emit the remaining groups without articles.
    Degrade,
    /// Report the failure to the caller.
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SitemapPlan {
    pub include_static: bool,
    pub include_feeds: bool,
    pub include_categories: bool,
    pub page: u32,
    pub article_limit: u32,
    pub timeout: Duration,
    pub on_failure: FailurePolicy,
}

impl SitemapPlan {
    /// Every group plus up to 10000 articles (`/sitemap.xml`).
    #[must_use]
    pub fn full(crawl_timeout: Duration) -> Self {
        Self {
            include_static: true,
            include_feeds: true,
            include_categories: true,
            page: 1,
            article_limit: FULL_ARTICLE_LIMIT,
            timeout: crawl_timeout,
            on_failure: FailurePolicy::Degrade,
        }
    }

    /// Every group plus the 100 newest articles (`/sitemap-compact.xml`).
    #[must_use]
    pub fn compact(timeout: Duration) -> Self {
        Self {
            article_limit: COMPACT_ARTICLE_LIMIT,
            timeout,
            ..Self::full(timeout)
        }
    }

    /// One page of article routes only (`/api/sitemap/articles`).
    #[must_use]
    pub fn articles(page: u32, limit: u32, timeout: Duration) -> Self {
        Self {
            include_static: false,
            include_feeds: false,
            include_categories: false,
            page: page.max(1),
            article_limit: limit.clamp(1, MAX_URLS_PER_SITEMAP),
            timeout,
            on_failure: FailurePolicy::Fail,
        }
    }
}

/// Ordered list of routes ready for serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sitemap {
    pub routes: Vec<SiteRoute>,
}

impl Sitemap {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn article_count(&self) -> usize {
        self.routes
            .iter()
            .filter(|r| r.url.contains("/article/"))
            .count()
    }

    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.routes.len() * 160);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for route in &self.routes {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&route.url));
            xml.push_str("</loc>\n    <lastmod>");
            xml.push_str(&iso_timestamp(route.last_modified));
            xml.push_str("</lastmod>\n    <changefreq>");
            xml.push_str(route.change_frequency.as_str());
            xml.push_str("</changefreq>\n    <priority>");
            xml.push_str(&route.priority.to_string());
            xml.push_str("</priority>\n  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Millisecond-precision UTC timestamp, e.g. `2024-01-01T00:00:00.000Z`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct SitemapBuilder {
    source: Arc<dyn ArticleSource>,
    base_url: String,
    category_slugs: Vec<String>,
    started_at: DateTime<Utc>,
}

impl SitemapBuilder {
    pub fn new(
        source: Arc<dyn ArticleSource>,
        base_url: impl Into<String>,
        category_slugs: Vec<String>,
    ) -> Self {
        Self::with_start_time(source, base_url, category_slugs, Utc::now())
    }

    /// `started_at` is the `lastmod` of non-article routes when no article
    /// timestamp is available.
    pub fn with_start_time(
        source: Arc<dyn ArticleSource>,
        base_url: impl Into<String>,
        category_slugs: Vec<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            source,
            base_url,
            category_slugs,
            started_at,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch articles once and assemble the groups `plan` asks for.
    ///
    /// # Errors
    /// Only with [`FailurePolicy::Fail`], when the article fetch fails.
    pub async fn build(&self, plan: &SitemapPlan) -> Result<Sitemap, UpstreamError> {
        let query = ArticleQuery {
            page: plan.page,
            limit: plan.article_limit,
            timeout: plan.timeout,
        };

        let articles = match plan.on_failure {
            FailurePolicy::Degrade => {
                let page = published_or_empty(self.source.as_ref(), query).await;
                if !page.success {
                    warn!(
                        limit = plan.article_limit,
                        "emitting sitemap without article routes"
                    );
                }
                page.docs
            }
            FailurePolicy::Fail => {
                self.source
                    .fetch_published(query)
                    .await
                    .inspect_err(|e| {
                        warn!(
                            error = %e,
                            page = plan.page,
                            "article fetch failed for article sitemap"
                        );
                    })?
                    .docs
            }
        };

        let mut article_routes: Vec<SiteRoute> = articles
            .iter()
            .take(plan.article_limit as usize)
            .map(|a| article_route(&self.base_url, a))
            .collect();

        let last_modified = article_routes
            .iter()
            .map(|r| r.last_modified)
            .max()
            .unwrap_or(self.started_at);

        let mut routes = Vec::new();
        if plan.include_static {
            routes.extend(static_routes(&self.base_url, last_modified));
        }
        if plan.include_feeds {
            routes.extend(feed_routes(
                &self.base_url,
                &self.category_slugs,
                last_modified,
            ));
        }
        if plan.include_categories {
            routes.extend(category_routes(
                &self.base_url,
                &self.category_slugs,
                last_modified,
            ));
        }
        let article_count = article_routes.len();
        routes.append(&mut article_routes);

        info!(
            total = routes.len(),
            articles = article_count,
            "sitemap assembled"
        );
        Ok(Sitemap { routes })
    }
}
