use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

static RE_BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)</?(?:address|article|aside|blockquote|br|dd|div|dl|dt|figcaption|figure|footer|h[1-6]|header|hr|li|main|nav|ol|p|pre|section|table|td|th|tr|ul)\b[^>]*>",
    )
    .unwrap()
});
static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static RE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Remove HTML tags and collapse whitespace. Block-level tags become a
/// word break; inline tags vanish.
pub fn strip_html(html: &str) -> String {
    let blocks_broken = RE_BLOCK_TAG.replace_all(html, " ");
    let without_tags = RE_TAG.replace_all(&blocks_broken, "");
    RE_SPACE.replace_all(&without_tags, " ").trim().to_string()
}

/// First `max_chars` characters of `text`, cut back to a word boundary
/// and suffixed with an ellipsis when shortened.
pub fn truncate_words(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    let trimmed = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}...", trimmed.trim_end())
}

/// RFC 1123 date as used by RSS `pubDate`, e.g. `Mon, 01 Jan 2024 00:00:00 GMT`.
pub fn rfc1123(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_html_removes_tags_and_collapses_space() {
        assert_eq!(
            strip_html("<p>Hello <strong>world</strong></p>\n<p>again</p>"),
            "Hello world again"
        );
        assert_eq!(strip_html("no markup"), "no markup");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn strip_html_inline_tags_leave_no_gap() {
        assert_eq!(
            strip_html("<p>The tally is <em>final</em>.</p>"),
            "The tally is final."
        );
        assert_eq!(strip_html("un<b>break</b>able"), "unbreakable");
        assert_eq!(strip_html("one<br/>two<BR>three"), "one two three");
        assert_eq!(strip_html("<li>a</li><li>b</li>"), "a b");
    }

    #[test]
    fn strip_html_keeps_entities_for_later_escaping() {
        assert_eq!(strip_html("<b>R&amp;D</b> & more"), "R&amp;D & more");
    }

    #[test]
    fn truncate_words_respects_boundaries() {
        assert_eq!(truncate_words("short", 10), "short");
        assert_eq!(truncate_words("one two three four", 9), "one two...");
    }

    #[test]
    fn rfc1123_matches_http_date_format() {
        let at: DateTime<Utc> = "2024-01-01T00:00:00Z".parse().unwrap();
        assert_eq!(rfc1123(at), "Mon, 01 Jan 2024 00:00:00 GMT");
    }
}
