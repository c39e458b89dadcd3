use super::envelope::{decode_records, extract_records};
use crate::domain::QueueItem;
use crate::error::{HeraldError, UpstreamError};
use crate::port::QueueSource;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::warn;

const QUEUE_KEYS: &[&str] = &["items", "queue", "data"];

/// Reads the indexing service's queue listing.
#[derive(Debug, Clone)]
pub struct IndexingClient {
    client: Client,
    queue_url: String,
}

impl IndexingClient {
    /// # Errors
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(queue_url: impl Into<String>, timeout: Duration) -> Result<Self, HeraldError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HeraldError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            queue_url: queue_url.into(),
        })
    }
}

impl QueueSource for IndexingClient {
    fn fetch_queue(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<QueueItem>, UpstreamError>> + Send + '_>> {
        Box::pin(async move {
            let response = self
                .client
                .get(&self.queue_url)
                .header(ACCEPT, "application/json")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                warn!(url = %self.queue_url, status = status.as_u16(), "indexing queue request failed");
                return Err(UpstreamError::Status(status.as_u16()));
            }

            let body: Value = response
                .json()
                .await
                .map_err(|e| UpstreamError::Malformed(e.to_string()))?;
            let records = extract_records(body, QUEUE_KEYS)?;
            Ok(decode_records(records, "queue item"))
        })
    }
}
