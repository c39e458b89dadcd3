//! RSS 2.0 document writer.
//!
//! Channels carry the content, wfw, dc, atom, sy and slash namespaces.

use super::tagging::item_categories;
use super::text::{rfc1123, strip_html, truncate_words};
use crate::domain::{ArticleSummary, CategorySummary};
use crate::xml::{cdata, escape_xml};
use chrono::{DateTime, Utc};

const GENERATOR: &str = concat!("herald ", env!("CARGO_PKG_VERSION"));
const DEFAULT_AUTHOR: &str = "Editorial Team";
const DESCRIPTION_FALLBACK_CHARS: usize = 300;

const NAMESPACES: &[(&str, &str)] = &[
    ("content", "http://purl.org/rss/1.0/modules/content/"),
    ("wfw", "http://wellformedweb.org/CommentAPI/"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("atom", "http://www.w3.org/2005/Atom"),
    ("sy", "http://purl.org/rss/1.0/modules/syndication/"),
    ("slash", "http://purl.org/rss/1.0/modules/slash/"),
];

/// Which articles a channel covers.
#[derive(Debug, Clone, Copy)]
pub enum FeedScope<'a> {
    Site,
    Category(&'a CategorySummary),
}

/// Site identity shared by every channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedWriter {
    site_url: String,
    site_name: String,
}

impl FeedWriter {
    pub fn new(site_url: impl Into<String>, site_name: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into().trim_end_matches('/').to_string(),
            site_name: site_name.into(),
        }
    }

    /// Render a complete RSS document. `known` feeds the cross-category
    /// tagging of items; `built_at` becomes `lastBuildDate`.
    pub fn render(
        &self,
        scope: FeedScope<'_>,
        articles: &[ArticleSummary],
        known: &[CategorySummary],
        built_at: DateTime<Utc>,
    ) -> String {
        let base = &self.site_url;
        let (title, link, self_link, description) = match scope {
            FeedScope::Site => (
                format!("{} - Latest News", self.site_name),
                base.clone(),
                format!("{base}/feed"),
                format!("The latest news from {}", self.site_name),
            ),
            FeedScope::Category(category) => (
                format!("{} - {} News", self.site_name, category.name),
                format!("{base}/category/{}", category.slug),
                format!("{base}/feed/category/{}", category.slug),
                category
                    .description
                    .clone()
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| {
                        format!("Latest {} news from {}", category.name, self.site_name)
                    }),
            ),
        };

        let mut xml = String::with_capacity(2048 + articles.len() * 1024);
        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\"");
        for (prefix, uri) in NAMESPACES {
            xml.push_str(&format!("\n  xmlns:{prefix}=\"{uri}\""));
        }
        xml.push_str(">\n<channel>\n");

        push_element(&mut xml, 1, "title", &escape_xml(&title));
        xml.push_str(&format!(
            "  <atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\" />\n",
            escape_xml(&self_link)
        ));
        push_element(&mut xml, 1, "link", &escape_xml(&link));
        push_element(&mut xml, 1, "description", &escape_xml(&description));
        push_element(&mut xml, 1, "lastBuildDate", &rfc1123(built_at));
        push_element(&mut xml, 1, "language", "en-US");
        push_element(&mut xml, 1, "sy:updatePeriod", "hourly");
        push_element(&mut xml, 1, "sy:updateFrequency", "1");
        push_element(&mut xml, 1, "generator", GENERATOR);

        xml.push_str("  <image>\n");
        push_element(&mut xml, 2, "url", &escape_xml(&format!("{base}/logo.png")));
        push_element(&mut xml, 2, "title", &escape_xml(&title));
        push_element(&mut xml, 2, "link", &escape_xml(&link));
        push_element(&mut xml, 2, "width", "144");
        push_element(&mut xml, 2, "height", "144");
        xml.push_str("  </image>\n");

        for article in articles {
            self.push_item(&mut xml, article, known);
        }

        xml.push_str("</channel>\n</rss>\n");
        xml
    }

    fn push_item(&self, xml: &mut String, article: &ArticleSummary, known: &[CategorySummary]) {
        let link = format!("{}/article/{}", self.site_url, article.slug);
        let body = strip_html(&article.content);
        let excerpt = strip_html(&article.excerpt);
        let description = if excerpt.is_empty() {
            truncate_words(&body, DESCRIPTION_FALLBACK_CHARS)
        } else {
            excerpt
        };
        let author = article
            .author_name()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_AUTHOR);

        xml.push_str("  <item>\n");
        push_element(xml, 2, "title", &escape_xml(&article.title));
        push_element(xml, 2, "link", &escape_xml(&link));
        push_element(xml, 2, "comments", &escape_xml(&format!("{link}#comments")));
        push_element(xml, 2, "dc:creator", &escape_xml(author));
        push_element(xml, 2, "pubDate", &rfc1123(article.published_at));
        for name in item_categories(article, known) {
            push_element(xml, 2, "category", &escape_xml(&name));
        }
        xml.push_str(&format!(
            "    <guid isPermaLink=\"true\">{}</guid>\n",
            escape_xml(&link)
        ));
        push_element(xml, 2, "description", &escape_xml(&description));
        push_element(xml, 2, "content:encoded", &cdata(&body));
        push_element(
            xml,
            2,
            "wfw:commentRss",
            &escape_xml(&format!("{link}/comments/feed")),
        );
        push_element(xml, 2, "slash:comments", "0");
        xml.push_str("  </item>\n");
    }
}

/// Append `<name>value</name>` on its own line. `value` must already be
/// escaped or wrapped in CDATA.
fn push_element(xml: &mut String, depth: usize, name: &str, value: &str) {
    for _ in 0..depth {
        xml.push_str("  ");
    }
    xml.push('<');
    xml.push_str(name);
    xml.push('>');
    xml.push_str(value);
    xml.push_str("</");
    xml.push_str(name);
    xml.push_str(">\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NamedRef;
    use crate::test_support::{article, category};

    fn built_at() -> DateTime<Utc> {
        "2024-05-01T12:00:00Z".parse().unwrap()
    }

    fn writer() -> FeedWriter {
        FeedWriter::new("https://news.example.com/", "Daily Planet")
    }

    #[test]
    fn channel_header_for_category() {
        let politics = category("c1", "Politics", "politics");
        let xml = writer().render(FeedScope::Category(&politics), &[], &[], built_at());

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<title>Daily Planet - Politics News</title>"));
        assert!(xml.contains(
            "<atom:link href=\"https://news.example.com/feed/category/politics\" rel=\"self\" type=\"application/rss+xml\" />"
        ));
        assert!(xml.contains("<link>https://news.example.com/category/politics</link>"));
        assert!(xml.contains("<description>Latest Politics news from Daily Planet</description>"));
        assert!(xml.contains("<lastBuildDate>Wed, 01 May 2024 12:00:00 GMT</lastBuildDate>"));
        assert!(xml.contains("<language>en-US</language>"));
        assert!(xml.contains("<sy:updatePeriod>hourly</sy:updatePeriod>"));
        assert!(xml.contains("<url>https://news.example.com/logo.png</url>"));
        for (prefix, uri) in NAMESPACES {
            assert!(xml.contains(&format!("xmlns:{prefix}=\"{uri}\"")));
        }
        assert!(!xml.contains("<item>"));
    }

    #[test]
    fn category_description_is_used_when_present() {
        let mut health = category("c3", "Health", "health");
        health.description = Some("Medicine & wellbeing".into());
        let xml = writer().render(FeedScope::Category(&health), &[], &[], built_at());
        assert!(xml.contains("<description>Medicine &amp; wellbeing</description>"));
    }

    #[test]
    fn site_scope_points_at_aggregate_feed() {
        let xml = writer().render(FeedScope::Site, &[], &[], built_at());
        assert!(xml.contains("<title>Daily Planet - Latest News</title>"));
        assert!(xml.contains("href=\"https://news.example.com/feed\""));
    }

    #[test]
    fn item_fields() {
        let politics = category("c1", "Politics", "politics");
        let mut a = article("vote-count", "2024-01-01T00:00:00Z");
        a.title = "Votes \"counted\" & <certified>".into();
        a.excerpt = "<p>The tally is <em>final</em>.</p>".into();
        a.content = "<p>Full story.</p>".into();
        a.author = Some(NamedRef::Name("Lois Lane".into()));
        a.category = Some(NamedRef::Name("Politics".into()));
        a.tags = vec!["Q&A".into()];

        let xml = writer().render(
            FeedScope::Category(&politics),
            &[a],
            std::slice::from_ref(&politics),
            built_at(),
        );

        assert!(xml.contains(
            "<title>Votes &quot;counted&quot; &amp; &lt;certified&gt;</title>"
        ));
        assert!(xml.contains("<link>https://news.example.com/article/vote-count</link>"));
        assert!(xml.contains("<dc:creator>Lois Lane</dc:creator>"));
        assert!(xml.contains("<pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>"));
        assert!(xml.contains("<category>Politics</category>"));
        assert!(xml.contains("<category>Q&amp;A</category>"));
        assert!(xml.contains("<description>The tally is final.</description>"));
        assert!(xml.contains("<content:encoded><![CDATA[Full story.]]></content:encoded>"));
        assert!(xml.contains(
            "<guid isPermaLink=\"true\">https://news.example.com/article/vote-count</guid>"
        ));
        assert!(xml.contains("<slash:comments>0</slash:comments>"));
    }

    #[test]
    fn control_characters_never_reach_the_document() {
        let mut a = article("budget", "2024-01-01T00:00:00Z");
        a.title = "Budget\u{0008} vote".into();
        a.content = "<p>Body\u{0001}text</p>".into();
        a.author = Some(NamedRef::Name("Desk\u{001b}".into()));
        let xml = writer().render(FeedScope::Site, &[a], &[], built_at());
        assert!(!xml.contains(crate::xml::is_forbidden_xml_char));
        assert!(xml.contains("<title>Budget vote</title>"));
        assert!(xml.contains("<content:encoded><![CDATA[Bodytext]]></content:encoded>"));
    }

    #[test]
    fn missing_excerpt_falls_back_to_body_and_missing_author_to_default() {
        let mut a = article("a", "2024-01-01T00:00:00Z");
        a.content = "<p>Body text only</p>".into();
        let xml = writer().render(FeedScope::Site, &[a], &[], built_at());
        assert!(xml.contains("<description>Body text only</description>"));
        assert!(xml.contains("<dc:creator>Editorial Team</dc:creator>"));
    }
}
