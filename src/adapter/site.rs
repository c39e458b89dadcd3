use crate::error::{HeraldError, UpstreamError};
use crate::port::{CacheMode, FetchedPage, SiteFetcher};
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// reqwest-backed [`SiteFetcher`] for the public site.
#[derive(Debug, Clone)]
pub struct HttpSiteFetcher {
    client: Client,
}

impl HttpSiteFetcher {
    /// # Errors
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, HeraldError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HeraldError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

impl SiteFetcher for HttpSiteFetcher {
    fn get(
        &self,
        url: String,
        cache: CacheMode,
    ) -> Pin<Box<dyn Future<Output = Result<FetchedPage, UpstreamError>> + Send + '_>> {
        Box::pin(async move {
            let mut request = self.client.get(&url);
            if cache == CacheMode::Bypass {
                request = request
                    .header(CACHE_CONTROL, "no-cache")
                    .header(PRAGMA, "no-cache");
            }

            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(FetchedPage { status, body })
        })
    }
}
