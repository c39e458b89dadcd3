use crate::error::UpstreamError;
use std::future::Future;
use std::pin::Pin;

/// Raw response of a GET against the public site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// How a GET should treat intermediate caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheMode {
    /// Plain request.
    Default,
    /// `Cache-Control: no-cache` + `Pragma: no-cache`, forcing regeneration.
    Bypass,
}

/// Trait for reading pages of the public site.
///
/// Non-2xx responses are returned as a [`FetchedPage`]; only transport
/// failures are errors.
pub trait SiteFetcher: Send + Sync {
    fn get(
        &self,
        url: String,
        cache: CacheMode,
    ) -> Pin<Box<dyn Future<Output = Result<FetchedPage, UpstreamError>> + Send + '_>>;
}
