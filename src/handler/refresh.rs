use crate::refresh::{ForceRefreshReport, RefreshCoordinator, RefreshOutcome, SitemapAction};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub slug: String,
    pub action: SitemapAction,
}

/// Handler for POST /api/sitemap/refresh
pub async fn force_refresh_handler(
    State(coordinator): State<Arc<RefreshCoordinator>>,
) -> Response {
    let report = coordinator.force_refresh_sitemaps().await;
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    if report.is_success() {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Sitemaps refreshed successfully",
                "timestamp": timestamp,
            })),
        )
            .into_response()
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": failure_reason(&report),
                "timestamp": timestamp,
            })),
        )
            .into_response()
    }
}

/// Handler for GET /api/sitemap/refresh
pub async fn sitemap_status_handler(
    State(coordinator): State<Arc<RefreshCoordinator>>,
) -> Response {
    Json(coordinator.status().await).into_response()
}

/// Handler for POST /api/sitemap/notify
///
/// Accepts immediately; the refresh runs detached so the caller's mutation
/// never waits on it.
pub async fn notify_handler(
    State(coordinator): State<Arc<RefreshCoordinator>>,
    Json(request): Json<NotifyRequest>,
) -> Response {
    info!(
        slug = %request.slug,
        action = request.action.as_str(),
        "sitemap update notification received"
    );
    tokio::spawn(async move {
        coordinator
            .trigger_sitemap_update(&request.slug, request.action)
            .await;
    });
    (StatusCode::ACCEPTED, Json(json!({ "accepted": true }))).into_response()
}

fn failure_reason(report: &ForceRefreshReport) -> String {
    let mut reasons = Vec::new();
    if let RefreshOutcome::Failed {
        primary_error,
        fallback_error,
    } = &report.refresh
    {
        reasons.push(format!(
            "main sitemap refresh failed ({primary_error}; fallback: {fallback_error})"
        ));
    }
    if !report.article_sitemap_updated {
        reasons.push("article sitemap refresh failed".to_string());
    }
    if !report.valid {
        reasons.push("sitemap validation failed".to_string());
    }
    reasons.join(", ")
}
