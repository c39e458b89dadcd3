use crate::domain::{ArticleSummary, CategorySummary};

/// `<category>` values for one feed item, in order: the article's own
/// category, its explicit tags, then every other known category whose name
/// occurs (case-insensitively) in the title or body.
///
/// Values are de-duplicated case-insensitively, keeping the first spelling.
pub fn item_categories(article: &ArticleSummary, known: &[CategorySummary]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |value: &str| {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        if !out.iter().any(|v| v.eq_ignore_ascii_case(value)) {
            out.push(value.to_string());
        }
    };

    let own = article.category_name();
    if let Some(name) = own {
        push(name);
    }
    for tag in &article.tags {
        push(tag);
    }

    let haystack_title = article.title.to_lowercase();
    let haystack_content = article.content.to_lowercase();
    for category in known {
        if own.is_some_and(|name| name.eq_ignore_ascii_case(&category.name)) {
            continue;
        }
        let needle = category.name.trim().to_lowercase();
        if needle.is_empty() {
            continue;
        }
        if haystack_title.contains(&needle) || haystack_content.contains(&needle) {
            push(&category.name);
        }
    }

    out
}
