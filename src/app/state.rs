use crate::adapter::{BackendClient, BackendConfig, HttpSiteFetcher, IndexingClient};
use crate::config::Settings;
use crate::error::HeraldError;
use crate::feed::{FeedService, FeedWriter};
use crate::handler::sitemap::SitemapState;
use crate::port::{ArticleSource, QueueSource, SiteFetcher};
use crate::queue::QueueMonitor;
use crate::refresh::RefreshCoordinator;
use crate::sitemap::SitemapBuilder;
use std::sync::Arc;

/// Services shared by the route families.
pub struct AppState {
    pub sitemap: SitemapState,
    pub feeds: Arc<FeedService>,
    pub refresh: Arc<RefreshCoordinator>,
    pub queue: Arc<QueueMonitor>,
}

/// The three upstreams the service reads from.
pub struct Upstreams {
    pub articles: Arc<dyn ArticleSource>,
    pub site: Arc<dyn SiteFetcher>,
    pub queue: Arc<dyn QueueSource>,
}

impl Upstreams {
    /// reqwest clients for the backend, the public site and the indexing
    /// service.
    ///
    /// # Errors
    /// Returns an error when a client cannot be built.
    pub fn from_settings(settings: &Settings) -> Result<Self, HeraldError> {
        let articles = BackendClient::new(BackendConfig {
            base_url: settings.api_url.clone(),
            timeout: settings.article_fetch_timeout,
        })?;
        let site = HttpSiteFetcher::new(settings.refresh_timeout)?;
        let queue = IndexingClient::new(
            settings.indexing_queue_url.clone(),
            settings.article_fetch_timeout,
        )?;

        Ok(Self {
            articles: Arc::new(articles),
            site: Arc::new(site),
            queue: Arc::new(queue),
        })
    }
}

impl AppState {
    /// Create `AppState` backed by real HTTP clients.
    ///
    /// # Errors
    /// Returns an error when an upstream client cannot be built.
    pub fn from_settings(settings: &Settings) -> Result<Self, HeraldError> {
        Ok(Self::with_upstreams(
            settings,
            Upstreams::from_settings(settings)?,
        ))
    }

    #[must_use]
    pub fn with_upstreams(settings: &Settings, upstreams: Upstreams) -> Self {
        let builder = SitemapBuilder::new(
            Arc::clone(&upstreams.articles),
            settings.site_url.clone(),
            settings.category_slugs.clone(),
        );
        let sitemap = SitemapState {
            builder: Arc::new(builder),
            crawl_timeout: settings.sitemap_crawl_timeout,
            fetch_timeout: settings.article_fetch_timeout,
        };

        let writer = FeedWriter::new(settings.site_url.clone(), settings.site_name.clone());
        let feeds = FeedService::new(upstreams.articles, writer);
        let refresh = RefreshCoordinator::new(upstreams.site, &settings.refresh_url);
        let queue = QueueMonitor::new(upstreams.queue);

        Self {
            sitemap,
            feeds: Arc::new(feeds),
            refresh: Arc::new(refresh),
            queue: Arc::new(queue),
        }
    }
}
