//! Route groups that make up the sitemap, in emission order:
//! static pages, RSS feeds, category pages, articles.

use crate::domain::{ArticleSummary, ChangeFrequency, Priority, SiteRoute};
use chrono::{DateTime, Utc};

struct StaticPage {
    path: &'static str,
    change_frequency: ChangeFrequency,
    priority: f32,
}

const STATIC_PAGES: &[StaticPage] = &[
    StaticPage {
        path: "",
        change_frequency: ChangeFrequency::Daily,
        priority: 1.0,
    },
    StaticPage {
        path: "/about",
        change_frequency: ChangeFrequency::Monthly,
        priority: 0.5,
    },
    StaticPage {
        path: "/contact",
        change_frequency: ChangeFrequency::Monthly,
        priority: 0.5,
    },
];

const AGGREGATE_FEED_PRIORITY: f32 = 0.9;
const CATEGORY_FEED_PRIORITY: f32 = 0.8;
const CATEGORY_PAGE_PRIORITY: f32 = 0.7;
const ARTICLE_PRIORITY: f32 = 0.6;

pub fn static_routes(base_url: &str, last_modified: DateTime<Utc>) -> Vec<SiteRoute> {
    STATIC_PAGES
        .iter()
        .map(|page| SiteRoute {
            url: format!("{base_url}{}", page.path),
            last_modified,
            change_frequency: page.change_frequency,
            priority: Priority::new(page.priority),
        })
        .collect()
}

/// The aggregate feed followed by one feed per category.
pub fn feed_routes(
    base_url: &str,
    category_slugs: &[String],
    last_modified: DateTime<Utc>,
) -> Vec<SiteRoute> {
    let aggregate = SiteRoute {
        url: format!("{base_url}/feed"),
        last_modified,
        change_frequency: ChangeFrequency::Hourly,
        priority: Priority::new(AGGREGATE_FEED_PRIORITY),
    };
    std::iter::once(aggregate)
        .chain(category_slugs.iter().map(|slug| SiteRoute {
            url: format!("{base_url}/feed/category/{slug}"),
            last_modified,
            change_frequency: ChangeFrequency::Hourly,
            priority: Priority::new(CATEGORY_FEED_PRIORITY),
        }))
        .collect()
}

pub fn category_routes(
    base_url: &str,
    category_slugs: &[String],
    last_modified: DateTime<Utc>,
) -> Vec<SiteRoute> {
    category_slugs
        .iter()
        .map(|slug| SiteRoute {
            url: format!("{base_url}/category/{slug}"),
            last_modified,
            change_frequency: ChangeFrequency::Daily,
            priority: Priority::new(CATEGORY_PAGE_PRIORITY),
        })
        .collect()
}

pub fn article_route(base_url: &str, article: &ArticleSummary) -> SiteRoute {
    SiteRoute {
        url: format!("{base_url}/article/{}", article.slug),
        last_modified: article.last_modified(),
        change_frequency: ChangeFrequency::Weekly,
        priority: Priority::new(ARTICLE_PRIORITY),
    }
}
