use crate::queue::{POLL_INTERVAL, QueueMonitor};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::sync::Arc;

/// Handler for GET /api/indexing/queue
pub async fn queue_status_handler(State(monitor): State<Arc<QueueMonitor>>) -> Response {
    match monitor.snapshot().await {
        Ok(snapshot) => Json(json!({
            "success": true,
            "items": snapshot.items,
            "summary": snapshot.summary,
            "pollIntervalSecs": POLL_INTERVAL.as_secs(),
        }))
        .into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(json!({
                "success": false,
                "error": e.to_string(),
            })),
        )
            .into_response(),
    }
}
