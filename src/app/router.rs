use super::state::AppState;
use crate::handler::feed::{category_feed_handler, site_feed_handler};
use crate::handler::health::health_handler;
use crate::handler::queue::queue_status_handler;
use crate::handler::refresh::{force_refresh_handler, notify_handler, sitemap_status_handler};
use crate::handler::sitemap::{
    article_sitemap_handler, compact_sitemap_handler, full_sitemap_handler,
};
use axum::Router;
use axum::routing::{get, post};

/// Build the HTTP router: health, sitemaps, feeds, refresh and queue status.
pub fn main_router(state: AppState) -> Router {
    let v1_health_router = Router::new().route("/v1/health", get(health_handler));

    let sitemap_router = Router::new()
        .route("/sitemap.xml", get(full_sitemap_handler))
        .route("/sitemap-compact.xml", get(compact_sitemap_handler))
        .route("/api/sitemap/articles", get(article_sitemap_handler))
        .with_state(state.sitemap);

    let feed_router = Router::new()
        .route("/feed", get(site_feed_handler))
        .route("/feed/category/{category}", get(category_feed_handler))
        .with_state(state.feeds);

    let refresh_router = Router::new()
        .route(
            "/api/sitemap/refresh",
            post(force_refresh_handler).get(sitemap_status_handler),
        )
        .route("/api/sitemap/notify", post(notify_handler))
        .with_state(state.refresh);

    let queue_router = Router::new()
        .route("/api/indexing/queue", get(queue_status_handler))
        .with_state(state.queue);

    Router::new()
        .merge(v1_health_router)
        .merge(sitemap_router)
        .merge(feed_router)
        .merge(refresh_router)
        .merge(queue_router)
}
