use crate::sitemap::{DEFAULT_ARTICLES_PAGE_LIMIT, Sitemap, SitemapBuilder, SitemapPlan};
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const XML_CONTENT_TYPE: &str = "application/xml";
const FULL_CACHE_CONTROL: &str = "public, max-age=300";
const COMPACT_CACHE_CONTROL: &str = "public, max-age=3600";
const ARTICLES_CACHE_CONTROL: &str = "public, max-age=3600";

#[derive(Clone)]
pub struct SitemapState {
    pub builder: Arc<SitemapBuilder>,
    /// Timeout of the 10000-article fetch behind `/sitemap.xml`.
    pub crawl_timeout: Duration,
    pub fetch_timeout: Duration,
}

/// `page`/`limit` arrive as raw strings so a malformed value falls back to
/// its default instead of rejecting the crawl.
#[derive(Debug, Default, Deserialize)]
pub struct ArticleSitemapParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ArticleSitemapParams {
    fn page(&self) -> u32 {
        parse_positive(self.page.as_deref()).unwrap_or(1)
    }

    fn limit(&self) -> u32 {
        parse_positive(self.limit.as_deref()).unwrap_or(DEFAULT_ARTICLES_PAGE_LIMIT)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
}

/// Handler for GET /sitemap.xml
pub async fn full_sitemap_handler(State(state): State<SitemapState>) -> Response {
    let plan = SitemapPlan::full(state.crawl_timeout);
    degrading_sitemap(&state.builder, &plan, FULL_CACHE_CONTROL).await
}

/// Handler for GET /sitemap-compact.xml
pub async fn compact_sitemap_handler(State(state): State<SitemapState>) -> Response {
    let plan = SitemapPlan::compact(state.fetch_timeout);
    degrading_sitemap(&state.builder, &plan, COMPACT_CACHE_CONTROL).await
}

/// Handler for GET /api/sitemap/articles
pub async fn article_sitemap_handler(
    State(state): State<SitemapState>,
    Query(params): Query<ArticleSitemapParams>,
) -> Response {
    let plan = SitemapPlan::articles(params.page(), params.limit(), state.fetch_timeout);
    match state.builder.build(&plan).await {
        Ok(sitemap) => {
            info!(
                page = plan.page,
                limit = plan.article_limit,
                articles = sitemap.article_count(),
                "article sitemap served"
            );
            xml_response(StatusCode::OK, Some(ARTICLES_CACHE_CONTROL), sitemap.to_xml())
        }
        Err(e) => {
            error!(error = %e, page = plan.page, "article sitemap generation failed");
            // Failed shards must never be cached.
            xml_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
                Sitemap::empty().to_xml(),
            )
        }
    }
}

async fn degrading_sitemap(
    builder: &SitemapBuilder,
    plan: &SitemapPlan,
    cache_control: &'static str,
) -> Response {
    // Degrade plans only fail on article fetch, which they absorb.
    let sitemap = builder.build(plan).await.unwrap_or_else(|e| {
        error!(error = %e, "sitemap generation failed");
        Sitemap::empty()
    });
    xml_response(StatusCode::OK, Some(cache_control), sitemap.to_xml())
}

fn xml_response(status: StatusCode, cache_control: Option<&'static str>, body: String) -> Response {
    match cache_control {
        Some(cache) => (
            status,
            [
                (header::CONTENT_TYPE, XML_CONTENT_TYPE),
                (header::CACHE_CONTROL, cache),
            ],
            body,
        )
            .into_response(),
        None => (status, [(header::CONTENT_TYPE, XML_CONTENT_TYPE)], body).into_response(),
    }
}
