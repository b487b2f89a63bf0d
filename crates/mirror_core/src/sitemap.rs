use std::sync::LazyLock;

use regex::Regex;

static LOC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<loc>(.*?)</loc>").expect("static loc pattern"));

/// Pull every `<loc>` value out of sitemap markup, in document order.
///
/// This is a textual scan, not an XML parse: malformed documents simply
/// produce fewer (or zero) matches. Duplicates are kept.
pub fn extract_sitemap_urls(sitemap: &str) -> Vec<String> {
    LOC_PATTERN
        .captures_iter(sitemap)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
