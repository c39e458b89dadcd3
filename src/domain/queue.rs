use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One URL waiting in (or processed by) the external indexing service.
/// Read-only here: the indexing service owns its lifecycle.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub id: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: QueueStatus,
    #[serde(default)]
    pub retries: u32,
    pub added_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// Per-status counts of a queue listing.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueSummary {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

impl QueueSummary {
    #[must_use]
    pub fn from_items(items: &[QueueItem]) -> Self {
        items.iter().fold(Self::default(), |mut acc, item| {
            acc.total += 1;
            match item.status {
                QueueStatus::Pending => acc.pending += 1,
                QueueStatus::Processing => acc.processing += 1,
                QueueStatus::Completed => acc.completed += 1,
                QueueStatus::Failed => acc.failed += 1,
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn queue_item_decodes_camel_case_with_type_field() {
        let item: QueueItem = serde_json::from_value(json!({
            "id": "q1",
            "url": "https://news.example.com/article/a",
            "type": "URL_UPDATED",
            "status": "processing",
            "retries": 2,
            "addedAt": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(item.kind, "URL_UPDATED");
        assert_eq!(item.status, QueueStatus::Processing);
        assert_eq!(item.retries, 2);
    }

    #[test]
    fn summary_counts_each_status() {
        let item = |status| QueueItem {
            id: "x".into(),
            url: "u".into(),
            kind: "URL_UPDATED".into(),
            status,
            retries: 0,
            added_at: Utc::now(),
        };
        let items = vec![
            item(QueueStatus::Pending),
            item(QueueStatus::Pending),
            item(QueueStatus::Failed),
            item(QueueStatus::Completed),
        ];
        let summary = QueueSummary::from_items(&items);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.pending, 2);
        assert_eq!(summary.processing, 0);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.completed, 1);
    }
}
