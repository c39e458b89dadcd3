use crate::feed::{FeedError, FeedService};
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tracing::error;

const RSS_CONTENT_TYPE: &str = "application/rss+xml; charset=utf-8";
const FEED_CACHE_CONTROL: &str = "public, max-age=300, s-maxage=600";

/// Handler for GET /feed/category/{category}
pub async fn category_feed_handler(
    State(feeds): State<Arc<FeedService>>,
    Path(category): Path<String>,
) -> Response {
    match feeds.category_feed(&category).await {
        Ok(rss) => rss_response(rss),
        Err(FeedError::CategoryNotFound(_)) => {
            (StatusCode::NOT_FOUND, "Category not found").into_response()
        }
        Err(FeedError::Upstream(e)) => {
            error!(category = %category, error = %e, "category feed generation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error generating RSS feed").into_response()
        }
    }
}

/// Handler for GET /feed
pub async fn site_feed_handler(State(feeds): State<Arc<FeedService>>) -> Response {
    match feeds.site_feed().await {
        Ok(rss) => rss_response(rss),
        Err(e) => {
            error!(error = %e, "site feed generation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error generating RSS feed").into_response()
        }
    }
}

fn rss_response(rss: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, RSS_CONTENT_TYPE),
            (header::CACHE_CONTROL, FEED_CACHE_CONTROL),
        ],
        rss,
    )
        .into_response()
}
