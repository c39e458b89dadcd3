//! Read-only view of the external indexing queue.

use crate::domain::{QueueItem, QueueSummary};
use crate::error::UpstreamError;
use crate::port::QueueSource;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Refresh interval of the status display.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSnapshot {
    pub items: Vec<QueueItem>,
    pub summary: QueueSummary,
}

impl QueueSnapshot {
    #[must_use]
    pub fn new(items: Vec<QueueItem>) -> Self {
        let summary = QueueSummary::from_items(&items);
        Self { items, summary }
    }
}

pub struct QueueMonitor {
    source: Arc<dyn QueueSource>,
}

impl QueueMonitor {
    pub fn new(source: Arc<dyn QueueSource>) -> Self {
        Self { source }
    }

    /// # Errors
    /// Returns the upstream error when the queue cannot be read.
    pub async fn snapshot(&self) -> Result<QueueSnapshot, UpstreamError> {
        let items = self
            .source
            .fetch_queue()
            .await
            .inspect_err(|e| warn!(error = %e, "indexing queue fetch failed"))?;
        let snapshot = QueueSnapshot::new(items);
        info!(
            total = snapshot.summary.total,
            pending = snapshot.summary.pending,
            processing = snapshot.summary.processing,
            completed = snapshot.summary.completed,
            failed = snapshot.summary.failed,
            "indexing queue status"
        );
        Ok(snapshot)
    }
}
