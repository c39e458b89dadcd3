use crate::domain::QueueItem;
use crate::error::UpstreamError;
use std::future::Future;
use std::pin::Pin;

/// Trait for reading the indexing service's queue.
pub trait QueueSource: Send + Sync {
    fn fetch_queue(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<QueueItem>, UpstreamError>> + Send + '_>>;
}
