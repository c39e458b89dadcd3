//! Shared test support utilities
//!
//! In-memory implementations of the ports for unit and integration tests.

use crate::domain::{ArticleSummary, CategorySummary, NamedDocument, NamedRef, QueueItem};
use crate::error::UpstreamError;
use crate::port::{
    ArticlePage, ArticleQuery, ArticleSource, CacheMode, FetchedPage, QueueSource, RecentQuery,
    SiteFetcher,
};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

/// Minimal article with the given slug and RFC 3339 publish time.
pub fn article(slug: &str, published_at: &str) -> ArticleSummary {
    ArticleSummary {
        slug: slug.to_string(),
        published_at: published_at.parse().unwrap(),
        updated_at: None,
        title: format!("Title of {slug}"),
        excerpt: String::new(),
        content: String::new(),
        author: None,
        category: None,
        tags: Vec::new(),
    }
}

pub fn category(id: &str, name: &str, slug: &str) -> CategorySummary {
    CategorySummary {
        id: id.to_string(),
        name: name.to_string(),
        slug: slug.to_string(),
        description: None,
    }
}

/// Reference to `category` as the backend embeds it in populated articles.
pub fn category_ref(category: &CategorySummary) -> NamedRef {
    NamedRef::Ref(NamedDocument {
        id: Some(category.id.clone()),
        name: category.name.clone(),
        slug: Some(category.slug.clone()),
    })
}

/// Article source backed by vectors, with switchable failures.
pub struct MockArticleSource {
    articles: Mutex<Vec<ArticleSummary>>,
    categories: Mutex<Vec<CategorySummary>>,
    article_failure: Mutex<Option<UpstreamError>>,
    category_failure: Mutex<Option<UpstreamError>>,
    published_calls: Mutex<Vec<ArticleQuery>>,
    recent_calls: Mutex<Vec<RecentQuery>>,
}

impl MockArticleSource {
    pub fn new() -> Self {
        Self {
            articles: Mutex::new(Vec::new()),
            categories: Mutex::new(Vec::new()),
            article_failure: Mutex::new(None),
            category_failure: Mutex::new(None),
            published_calls: Mutex::new(Vec::new()),
            recent_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_articles(articles: Vec<ArticleSummary>) -> Self {
        let source = Self::new();
        source.set_articles(articles);
        source
    }

    pub fn set_articles(&self, articles: Vec<ArticleSummary>) {
        *self.articles.lock().unwrap() = articles;
    }

    pub fn set_categories(&self, categories: Vec<CategorySummary>) {
        *self.categories.lock().unwrap() = categories;
    }

    /// Make every article fetch fail with `error`.
    pub fn fail_with(&self, error: UpstreamError) {
        *self.article_failure.lock().unwrap() = Some(error);
    }

    pub fn fail_categories_with(&self, error: UpstreamError) {
        *self.category_failure.lock().unwrap() = Some(error);
    }

    pub fn published_calls(&self) -> Vec<ArticleQuery> {
        self.published_calls.lock().unwrap().clone()
    }

    pub fn recent_calls(&self) -> Vec<RecentQuery> {
        self.recent_calls.lock().unwrap().clone()
    }
}

impl Default for MockArticleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleSource for MockArticleSource {
    fn fetch_published(
        &self,
        query: ArticleQuery,
    ) -> Pin<Box<dyn Future<Output = Result<ArticlePage, UpstreamError>> + Send + '_>> {
        Box::pin(async move {
            self.published_calls.lock().unwrap().push(query);
            if let Some(err) = self.article_failure.lock().unwrap().clone() {
                return Err(err);
            }
            let skip = (query.page.saturating_sub(1) as usize) * query.limit as usize;
            let docs = self
                .articles
                .lock()
                .unwrap()
                .iter()
                .skip(skip)
                .take(query.limit as usize)
                .cloned()
                .collect();
            Ok(ArticlePage {
                docs,
                success: true,
            })
        })
    }

    fn fetch_categories(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<CategorySummary>, UpstreamError>> + Send + '_>>
    {
        Box::pin(async move {
            if let Some(err) = self.category_failure.lock().unwrap().clone() {
                return Err(err);
            }
            Ok(self.categories.lock().unwrap().clone())
        })
    }

    fn fetch_recent(
        &self,
        query: RecentQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ArticleSummary>, UpstreamError>> + Send + '_>>
    {
        Box::pin(async move {
            self.recent_calls.lock().unwrap().push(query.clone());
            if let Some(err) = self.article_failure.lock().unwrap().clone() {
                return Err(err);
            }
            let mut docs: Vec<ArticleSummary> = self
                .articles
                .lock()
                .unwrap()
                .iter()
                .filter(|a| match (&query.category_id, &a.category) {
                    (None, _) => true,
                    (Some(id), Some(NamedRef::Ref(doc))) => doc.id.as_deref() == Some(id),
                    (Some(id), Some(NamedRef::Name(name))) => name == id,
                    (Some(_), None) => false,
                })
                .cloned()
                .collect();
            docs.sort_by(|a, b| b.published_at.cmp(&a.published_at));
            docs.truncate(query.limit as usize);
            Ok(docs)
        })
    }
}

type CannedResponse = Result<FetchedPage, UpstreamError>;

/// Site fetcher answering from canned responses keyed by URL.
///
/// Unknown URLs answer 404 with an empty body.
pub struct MockSiteFetcher {
    responses: Mutex<HashMap<(String, Option<CacheMode>), CannedResponse>>,
    calls: Mutex<Vec<(String, CacheMode)>>,
}

impl MockSiteFetcher {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer `url` with `status`/`body` regardless of cache mode.
    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.responses.lock().unwrap().insert(
            (url.to_string(), None),
            Ok(FetchedPage {
                status,
                body: body.to_string(),
            }),
        );
    }

    /// Answer `url` with `response` only when requested with `mode`.
    pub fn respond_for(&self, url: &str, mode: CacheMode, response: CannedResponse) {
        self.responses
            .lock()
            .unwrap()
            .insert((url.to_string(), Some(mode)), response);
    }

    pub fn fail(&self, url: &str, error: UpstreamError) {
        self.responses
            .lock()
            .unwrap()
            .insert((url.to_string(), None), Err(error));
    }

    pub fn calls(&self) -> Vec<(String, CacheMode)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockSiteFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteFetcher for MockSiteFetcher {
    fn get(
        &self,
        url: String,
        cache: CacheMode,
    ) -> Pin<Box<dyn Future<Output = Result<FetchedPage, UpstreamError>> + Send + '_>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push((url.clone(), cache));
            let responses = self.responses.lock().unwrap();
            responses
                .get(&(url.clone(), Some(cache)))
                .or_else(|| responses.get(&(url, None)))
                .cloned()
                .unwrap_or(Ok(FetchedPage {
                    status: 404,
                    body: String::new(),
                }))
        })
    }
}

/// Queue source returning a fixed listing or a fixed error.
pub struct MockQueueSource {
    result: Mutex<Result<Vec<QueueItem>, UpstreamError>>,
}

impl MockQueueSource {
    pub fn with_items(items: Vec<QueueItem>) -> Self {
        Self {
            result: Mutex::new(Ok(items)),
        }
    }

    pub fn failing(error: UpstreamError) -> Self {
        Self {
            result: Mutex::new(Err(error)),
        }
    }
}

impl QueueSource for MockQueueSource {
    fn fetch_queue(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<QueueItem>, UpstreamError>> + Send + '_>> {
        Box::pin(async move { self.result.lock().unwrap().clone() })
    }
}
