//! Backend API client: published articles and categories.

use super::envelope::{decode_records, extract_records};
use crate::domain::{ArticleSummary, CategorySummary};
use crate::error::{HeraldError, UpstreamError};
use crate::port::{ArticlePage, ArticleQuery, ArticleSource, RecentQuery};
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const ARTICLE_KEYS: &[&str] = &["docs", "articles", "data"];
const CATEGORY_KEYS: &[&str] = &["categories", "data", "docs"];

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    /// Default per-request timeout; [`ArticleQuery::timeout`] overrides it.
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl BackendClient {
    /// # Errors
    /// Returns an error when the base URL does not parse or the HTTP
    /// client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, HeraldError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| HeraldError::HttpClient(e.to_string()))?;

        // Trailing slash so joins keep any path prefix of the base.
        let base_url = Url::parse(&format!("{}/", config.base_url.trim_end_matches('/')))
            .map_err(|e| HeraldError::Config(format!("invalid backend URL: {e}")))?;

        Ok(Self {
            client,
            base_url,
            timeout: config.timeout,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, UpstreamError> {
        self.base_url
            .join(path)
            .map_err(|e| UpstreamError::Malformed(format!("cannot build URL for {path}: {e}")))
    }

    async fn get_json(&self, url: Url, timeout: Duration) -> Result<Value, UpstreamError> {
        debug!(url = %url, "backend request");
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await
            .inspect_err(|e| warn!(url = %url, error = %e, "backend request failed"))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "backend returned error status");
            return Err(UpstreamError::Status(status.as_u16()));
        }

        response.json::<Value>().await.map_err(|e| {
            warn!(url = %url, error = %e, "backend response is not JSON");
            UpstreamError::Malformed(e.to_string())
        })
    }
}

impl ArticleSource for BackendClient {
    fn fetch_published(
        &self,
        query: ArticleQuery,
    ) -> Pin<Box<dyn Future<Output = Result<ArticlePage, UpstreamError>> + Send + '_>> {
        Box::pin(async move {
            let mut url = self.endpoint("api/articles/sitemap")?;
            url.query_pairs_mut()
                .append_pair("page", &query.page.to_string())
                .append_pair("limit", &query.limit.to_string());

            let body = self.get_json(url, query.timeout).await?;
            let records = extract_records(body, ARTICLE_KEYS)?;
            let docs: Vec<ArticleSummary> = decode_records(records, "article");
            debug!(page = query.page, count = docs.len(), "published articles fetched");
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
            let url = self.endpoint("api/categories")?;
            let body = self.get_json(url, self.timeout).await?;
            let records = extract_records(body, CATEGORY_KEYS)?;
            Ok(decode_records(records, "category"))
        })
    }

    fn fetch_recent(
        &self,
        query: RecentQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<ArticleSummary>, UpstreamError>> + Send + '_>>
    {
        Box::pin(async move {
            let mut url = self.endpoint("api/articles")?;
            {
                let mut pairs = url.query_pairs_mut();
                pairs.append_pair("status", "published");
                if let Some(category_id) = &query.category_id {
                    pairs.append_pair("category", category_id);
                }
                pairs
                    .append_pair("limit", &query.limit.to_string())
                    .append_pair("sort", "-publishedAt");
            }

            let body = self.get_json(url, self.timeout).await?;
            let records = extract_records(body, ARTICLE_KEYS)?;
            Ok(decode_records(records, "article"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path_prefix() {
        let client = BackendClient::new(BackendConfig {
            base_url: "http://backend:5000/v2".into(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(
            client.endpoint("api/categories").unwrap().as_str(),
            "http://backend:5000/v2/api/categories"
        );
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = BackendClient::new(BackendConfig {
            base_url: "not a url".into(),
            timeout: Duration::from_secs(1),
        })
        .unwrap_err();
        assert!(matches!(err, HeraldError::Config(_)));
    }
}
