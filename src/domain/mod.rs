mod article;
mod queue;
mod route;

pub use article::{ArticleSummary, CategorySummary, NamedDocument, NamedRef};
pub use queue::{QueueItem, QueueStatus, QueueSummary};
pub use route::{ChangeFrequency, Priority, SiteRoute};
