//! Best-effort sitemap maintenance.
//!
//! Every public operation here logs failures and returns a report instead
//! of an error: refreshes run as side effects of article mutations and
//! must never fail them.

use crate::error::UpstreamError;
use crate::port::{CacheMode, SiteFetcher};
use crate::xml::{count_locs_containing, has_xml_declaration};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const SITEMAP_PATH: &str = "/sitemap.xml";
pub const ARTICLE_SITEMAP_PATH: &str = "/api/sitemap/articles";

/// Article mutation that makes the sitemap stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SitemapAction {
    Create,
    Publish,
    Update,
    Delete,
}

impl SitemapAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Publish => "publish",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// Result of [`RefreshCoordinator::refresh_sitemap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The no-cache primary request succeeded.
    Refreshed,
    /// The primary request failed; the plain fallback GET succeeded.
    RecoveredViaFallback { primary_error: String },
    /// Both attempts failed.
    Failed {
        primary_error: String,
        fallback_error: String,
    },
}

impl RefreshOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceRefreshReport {
    pub refresh: RefreshOutcome,
    pub article_sitemap_updated: bool,
    pub valid: bool,
}

impl ForceRefreshReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.refresh.is_success() && self.article_sitemap_updated && self.valid
    }
}

/// Reachability probe of the live sitemap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapStatus {
    pub success: bool,
    pub accessible: bool,
    pub article_count: usize,
    pub size: usize,
}

pub struct RefreshCoordinator {
    fetcher: Arc<dyn SiteFetcher>,
    sitemap_url: String,
    article_sitemap_url: String,
}

impl RefreshCoordinator {
    /// `base_url` is where `/sitemap.xml` and the article sitemap are served.
    pub fn new(fetcher: Arc<dyn SiteFetcher>, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            fetcher,
            sitemap_url: format!("{base}{SITEMAP_PATH}"),
            article_sitemap_url: format!("{base}{ARTICLE_SITEMAP_PATH}"),
        }
    }

    /// Entry point for article mutation handlers.
    pub async fn trigger_sitemap_update(&self, slug: &str, action: SitemapAction) {
        info!(slug, action = action.as_str(), "sitemap update triggered");
        match self.refresh_sitemap().await {
            RefreshOutcome::Failed {
                primary_error,
                fallback_error,
            } => error!(
                slug,
                action = action.as_str(),
                primary_error = %primary_error,
                fallback_error = %fallback_error,
                "sitemap update failed"
            ),
            _ => info!(slug, action = action.as_str(), "sitemap update completed"),
        }
    }

    /// Force regeneration of the main sitemap: a no-cache GET, falling back
    /// to a plain GET when that fails.
    pub async fn refresh_sitemap(&self) -> RefreshOutcome {
        let primary_error = match self.expect_success(CacheMode::Bypass).await {
            Ok(()) => {
                info!(url = %self.sitemap_url, "sitemap refreshed");
                return RefreshOutcome::Refreshed;
            }
            Err(e) => e,
        };

        warn!(
            url = %self.sitemap_url,
            error = %primary_error,
            "sitemap refresh failed, falling back to plain fetch"
        );
        match self.update_main_sitemap().await {
            Ok(()) => RefreshOutcome::RecoveredViaFallback {
                primary_error: primary_error.to_string(),
            },
            Err(fallback_error) => {
                error!(
                    url = %self.sitemap_url,
                    error = %fallback_error,
                    "sitemap fallback fetch failed"
                );
                RefreshOutcome::Failed {
                    primary_error: primary_error.to_string(),
                    fallback_error: fallback_error.to_string(),
                }
            }
        }
    }

    /// Plain GET of the main sitemap.
    ///
    /// # Errors
    /// Transport failure or a non-2xx status.
    pub async fn update_main_sitemap(&self) -> Result<(), UpstreamError> {
        self.expect_success(CacheMode::Default).await
    }

    /// No-cache GET of the article sitemap.
    ///
    /// # Errors
    /// Transport failure or a non-2xx status.
    pub async fn update_article_sitemap(&self) -> Result<(), UpstreamError> {
        let page = self
            .fetcher
            .get(self.article_sitemap_url.clone(), CacheMode::Bypass)
            .await?;
        if !page.is_success() {
            return Err(UpstreamError::Status(page.status));
        }
        info!(url = %self.article_sitemap_url, "article sitemap refreshed");
        Ok(())
    }

    /// Both sitemaps answer 2xx and the article sitemap is an XML document.
    /// A main sitemap without article URLs only warns.
    pub async fn validate_sitemap(&self) -> bool {
        let main = self
            .fetcher
            .get(self.sitemap_url.clone(), CacheMode::Default)
            .await;
        let articles = self
            .fetcher
            .get(self.article_sitemap_url.clone(), CacheMode::Default)
            .await;

        let (main, articles) = match (main, articles) {
            (Ok(main), Ok(articles)) => (main, articles),
            (Err(e), _) | (_, Err(e)) => {
                error!(error = %e, "sitemap validation could not fetch sitemaps");
                return false;
            }
        };

        if !main.is_success() || !articles.is_success() {
            error!(
                main_status = main.status,
                article_status = articles.status,
                "sitemap validation failed on status"
            );
            return false;
        }

        if !main.body.contains("/article/") {
            warn!(url = %self.sitemap_url, "main sitemap contains no article URLs");
        }

        if !has_xml_declaration(&articles.body) {
            error!(url = %self.article_sitemap_url, "article sitemap is not an XML document");
            return false;
        }

        info!("sitemaps validated");
        true
    }

    /// Refresh both sitemaps and validate the result, logging each step.
    pub async fn force_refresh_sitemaps(&self) -> ForceRefreshReport {
        info!("forced sitemap refresh started");

        let refresh = self.refresh_sitemap().await;
        let article_sitemap_updated = match self.update_article_sitemap().await {
            Ok(()) => true,
            Err(e) => {
                error!(url = %self.article_sitemap_url, error = %e, "article sitemap refresh failed");
                false
            }
        };
        let valid = self.validate_sitemap().await;

        let report = ForceRefreshReport {
            refresh,
            article_sitemap_updated,
            valid,
        };
        info!(
            success = report.is_success(),
            article_sitemap_updated,
            valid,
            "forced sitemap refresh finished"
        );
        report
    }

    /// Fetch the main sitemap and report reachability, article URL count
    /// and body size.
    pub async fn status(&self) -> SitemapStatus {
        match self
            .fetcher
            .get(self.sitemap_url.clone(), CacheMode::Default)
            .await
        {
            Ok(page) if page.is_success() => SitemapStatus {
                success: true,
                accessible: true,
                article_count: count_locs_containing(&page.body, "/article/"),
                size: page.body.len(),
            },
            Ok(page) => {
                warn!(url = %self.sitemap_url, status = page.status, "sitemap not accessible");
                SitemapStatus {
                    success: true,
                    accessible: false,
                    article_count: 0,
                    size: 0,
                }
            }
            Err(e) => {
                error!(url = %self.sitemap_url, error = %e, "sitemap status check failed");
                SitemapStatus {
                    success: false,
                    accessible: false,
                    article_count: 0,
                    size: 0,
                }
            }
        }
    }

    async fn expect_success(&self, cache: CacheMode) -> Result<(), UpstreamError> {
        let page = self.fetcher.get(self.sitemap_url.clone(), cache).await?;
        if page.is_success() {
            Ok(())
        } else {
            Err(UpstreamError::Status(page.status))
        }
    }
}
