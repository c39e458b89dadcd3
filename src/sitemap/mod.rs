mod builder;
pub mod routes;

pub use builder::{
    COMPACT_ARTICLE_LIMIT, DEFAULT_ARTICLES_PAGE_LIMIT, FULL_ARTICLE_LIMIT, FailurePolicy,
    MAX_URLS_PER_SITEMAP, Sitemap, SitemapBuilder, SitemapPlan, iso_timestamp,
};
