pub mod article_source;
pub mod queue_source;
pub mod site_fetcher;

pub use article_source::{ArticlePage, ArticleQuery, ArticleSource, RecentQuery, published_or_empty};
pub use queue_source::QueueSource;
pub use site_fetcher::{CacheMode, FetchedPage, SiteFetcher};
