use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Utc;
use herald::app::router::main_router;
use herald::app::state::{AppState, Upstreams};
use herald::config::Settings;
use herald::domain::{QueueItem, QueueStatus};
use herald::error::UpstreamError;
use herald::port::CacheMode;
use herald::test_support::{
    MockArticleSource, MockQueueSource, MockSiteFetcher, article, category, category_ref,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

const SITE: &str = "https://news.example.com";

fn settings() -> Settings {
    Settings::from_lookup(|name| match name {
        "NEXT_PUBLIC_SITE_URL" => Some(format!("{SITE}/")),
        "SITE_NAME" => Some("Daily Planet".to_string()),
        "SITEMAP_CATEGORIES" => Some("politics,sports".to_string()),
        _ => None,
    })
    .unwrap()
}

struct Harness {
    server: TestServer,
    articles: Arc<MockArticleSource>,
    site: Arc<MockSiteFetcher>,
}

fn harness_with_queue(queue: MockQueueSource) -> Harness {
    let articles = Arc::new(MockArticleSource::new());
    let site = Arc::new(MockSiteFetcher::new());
    let state = AppState::with_upstreams(
        &settings(),
        Upstreams {
            articles: articles.clone(),
            site: site.clone(),
            queue: Arc::new(queue),
        },
    );
    Harness {
        server: TestServer::new(main_router(state)).unwrap(),
        articles,
        site,
    }
}

fn harness() -> Harness {
    harness_with_queue(MockQueueSource::with_items(Vec::new()))
}

fn header(response: &axum_test::TestResponse, name: &str) -> String {
    response.header(name).to_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint_returns_healthy() {
    let h = harness();
    let response = h.server.get("/v1/health").await;
    response.assert_status_ok();
    response.assert_text("Healthy");
}

#[tokio::test]
async fn full_sitemap_lists_every_group_with_cache_headers() {
    let h = harness();
    h.articles.set_articles(vec![
        article("first-story", "2024-03-01T08:00:00Z"),
        article("second-story", "2024-03-02T08:00:00Z"),
    ]);

    let response = h.server.get("/sitemap.xml").await;
    response.assert_status_ok();
    assert_eq!(header(&response, "content-type"), "application/xml");
    assert_eq!(header(&response, "cache-control"), "public, max-age=300");

    let body = response.text();
    assert!(body.starts_with("<?xml"));
    assert!(body.contains(&format!("<loc>{SITE}</loc>")));
    assert!(body.contains(&format!("<loc>{SITE}/feed</loc>")));
    assert!(body.contains(&format!("<loc>{SITE}/feed/category/sports</loc>")));
    assert!(body.contains(&format!("<loc>{SITE}/category/politics</loc>")));
    assert!(body.contains(&format!("<loc>{SITE}/article/second-story</loc>")));
    assert!(!body.contains("news.example.com//"));

    let calls = h.articles.published_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].limit, 10_000);
    assert_eq!(calls[0].timeout, Duration::from_millis(60_000));
}

#[tokio::test]
async fn full_sitemap_degrades_when_backend_times_out() {
    let h = harness();
    h.articles.fail_with(UpstreamError::Timeout);

    let response = h.server.get("/sitemap.xml").await;
    response.assert_status_ok();

    let body = response.text();
    assert!(body.contains("</urlset>"));
    assert!(body.contains(&format!("<loc>{SITE}/about</loc>")));
    assert!(body.contains(&format!("<loc>{SITE}/feed/category/politics</loc>")));
    assert!(body.contains(&format!("<loc>{SITE}/category/sports</loc>")));
    assert!(!body.contains("/article/"));
}

#[tokio::test]
async fn repeated_sitemap_requests_are_byte_identical() {
    let h = harness();
    h.articles
        .set_articles(vec![article("stable", "2024-01-05T00:00:00Z")]);

    let first = h.server.get("/sitemap.xml").await.text();
    let second = h.server.get("/sitemap.xml").await.text();
    assert_eq!(first, second);
}

#[tokio::test]
async fn compact_sitemap_caps_articles_and_caches_longer() {
    let h = harness();
    h.articles.set_articles(
        (0..150)
            .map(|i| article(&format!("story-{i}"), "2024-02-01T00:00:00Z"))
            .collect(),
    );

    let response = h.server.get("/sitemap-compact.xml").await;
    response.assert_status_ok();
    assert_eq!(header(&response, "cache-control"), "public, max-age=3600");
    assert_eq!(response.text().matches("/article/").count(), 100);
    assert_eq!(h.articles.published_calls()[0].limit, 100);
}

#[tokio::test]
async fn article_sitemap_pages_through_articles() {
    let h = harness();
    h.articles.set_articles(vec![
        article("a", "2024-01-01T00:00:00Z"),
        article("b", "2024-01-02T00:00:00Z"),
        article("c", "2024-01-03T00:00:00Z"),
    ]);

    let response = h
        .server
        .get("/api/sitemap/articles")
        .add_query_param("page", "2")
        .add_query_param("limit", "1")
        .await;
    response.assert_status_ok();
    assert_eq!(header(&response, "cache-control"), "public, max-age=3600");

    let body = response.text();
    assert!(body.contains(&format!("<loc>{SITE}/article/b</loc>")));
    assert_eq!(body.matches("<url>").count(), 1);
    assert!(!body.contains("/about"));
}

#[tokio::test]
async fn article_sitemap_uses_default_limit() {
    let h = harness();
    h.server.get("/api/sitemap/articles").await.assert_status_ok();

    let calls = h.articles.published_calls();
    assert_eq!(calls[0].page, 1);
    assert_eq!(calls[0].limit, 500);
}

#[tokio::test]
async fn article_sitemap_failure_is_500_with_empty_urlset() {
    let h = harness();
    h.articles
        .fail_with(UpstreamError::Unavailable("connection refused".into()));

    let response = h.server.get("/api/sitemap/articles").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header(&response, "content-type"), "application/xml");

    let body = response.text();
    assert!(body.starts_with("<?xml"));
    assert!(body.contains("<urlset"));
    assert!(!body.contains("<url>"));
}

#[tokio::test]
async fn category_feed_renders_rss() {
    let h = harness();
    let politics = category("c1", "Politics", "politics");
    h.articles.set_categories(vec![politics.clone()]);
    let mut story = article("vote", "2024-04-01T12:00:00Z");
    story.category = Some(category_ref(&politics));
    h.articles.set_articles(vec![story]);

    let response = h.server.get("/feed/category/politics").await;
    response.assert_status_ok();
    assert_eq!(
        header(&response, "content-type"),
        "application/rss+xml; charset=utf-8"
    );
    assert_eq!(
        header(&response, "cache-control"),
        "public, max-age=300, s-maxage=600"
    );

    let body = response.text();
    assert!(body.contains("<title>Daily Planet - Politics News</title>"));
    assert!(body.contains(&format!("<link>{SITE}/article/vote</link>")));
    assert!(body.contains("<pubDate>Mon, 01 Apr 2024 12:00:00 GMT</pubDate>"));
}

#[tokio::test]
async fn unknown_category_feed_is_404() {
    let h = harness();
    h.articles
        .set_categories(vec![category("c1", "Politics", "politics")]);

    let response = h.server.get("/feed/category/astrology").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn category_feed_upstream_failure_is_plain_500() {
    let h = harness();
    h.articles
        .set_categories(vec![category("c1", "Politics", "politics")]);
    h.articles.fail_with(UpstreamError::Status(502));

    let response = h.server.get("/feed/category/politics").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.text().contains("<rss"));
}

#[tokio::test]
async fn site_feed_lists_latest_articles() {
    let h = harness();
    h.articles.set_articles(vec![
        article("older", "2024-01-01T00:00:00Z"),
        article("newer", "2024-02-01T00:00:00Z"),
    ]);

    let response = h.server.get("/feed").await;
    response.assert_status_ok();

    let body = response.text();
    assert!(body.contains("<title>Daily Planet - Latest News</title>"));
    let newer = body.find("/article/newer").unwrap();
    let older = body.find("/article/older").unwrap();
    assert!(newer < older);
}

fn sitemap_body(slugs: &[&str]) -> String {
    let urls: String = slugs
        .iter()
        .map(|s| format!("<url><loc>{SITE}/article/{s}</loc></url>"))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><urlset><url><loc>{SITE}</loc></url>{urls}</urlset>"
    )
}

#[tokio::test]
async fn sitemap_status_reports_article_count_and_size() {
    let h = harness();
    let body = sitemap_body(&["a", "b", "c"]);
    h.site
        .respond(&format!("{SITE}/sitemap.xml"), 200, &body);

    let response = h.server.get("/api/sitemap/refresh").await;
    response.assert_status_ok();
    response.assert_json(&json!({
        "success": true,
        "accessible": true,
        "articleCount": 3,
        "size": body.len(),
    }));
}

#[tokio::test]
async fn force_refresh_succeeds_when_both_sitemaps_answer() {
    let h = harness();
    h.site
        .respond(&format!("{SITE}/sitemap.xml"), 200, &sitemap_body(&["a"]));
    h.site.respond(
        &format!("{SITE}/api/sitemap/articles"),
        200,
        &sitemap_body(&["a"]),
    );

    let response = h.server.post("/api/sitemap/refresh").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["success"], true);
    assert!(json["message"].is_string());
    assert!(json["timestamp"].is_string());

    let calls = h.site.calls();
    assert_eq!(
        calls[0],
        (format!("{SITE}/sitemap.xml"), CacheMode::Bypass)
    );
}

#[tokio::test]
async fn force_refresh_failure_is_500_with_error() {
    let h = harness();
    h.site.fail(
        &format!("{SITE}/sitemap.xml"),
        UpstreamError::Unavailable("dns".into()),
    );

    let response = h.server.post("/api/sitemap/refresh").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("dns"));
}

#[tokio::test]
async fn notify_is_accepted_immediately() {
    let h = harness();
    let response = h
        .server
        .post("/api/sitemap/notify")
        .json(&json!({"slug": "new-story", "action": "publish"}))
        .await;
    response.assert_status(StatusCode::ACCEPTED);
    response.assert_json(&json!({"accepted": true}));
}

#[tokio::test]
async fn notify_rejects_unknown_action() {
    let h = harness();
    let response = h
        .server
        .post("/api/sitemap/notify")
        .json(&json!({"slug": "new-story", "action": "archive"}))
        .expect_failure()
        .await;
    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn queue_status_includes_summary() {
    let item = |id: &str, status| QueueItem {
        id: id.into(),
        url: format!("{SITE}/article/{id}"),
        kind: "URL_UPDATED".into(),
        status,
        retries: 0,
        added_at: Utc::now(),
    };
    let h = harness_with_queue(MockQueueSource::with_items(vec![
        item("a", QueueStatus::Pending),
        item("b", QueueStatus::Processing),
        item("c", QueueStatus::Pending),
    ]));

    let response = h.server.get("/api/indexing/queue").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["success"], true);
    assert_eq!(json["pollIntervalSecs"], 5);
    assert_eq!(json["summary"]["total"], 3);
    assert_eq!(json["summary"]["pending"], 2);
    assert_eq!(json["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn queue_status_upstream_failure_is_502() {
    let h = harness_with_queue(MockQueueSource::failing(UpstreamError::Status(503)));

    let response = h.server.get("/api/indexing/queue").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    let json: Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "upstream returned status 503");
}
