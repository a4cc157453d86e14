//! Post link discovery on the blog listing page

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").expect("static selector"));

/// Links to posts of the blog at `base_url`
///
/// Keeps `href`s under `<base_url>/`, deduplicated in first-seen order.
pub fn extract_post_links(html: &str, base_url: &str) -> Vec<String> {
    let prefix = format!("{}/", base_url.trim_end_matches('/'));
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    document
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.starts_with(&prefix))
        .filter(|href| seen.insert(href.to_string()))
        .map(str::to_string)
        .collect()
}

/// Absolute URL of a post link
pub fn resolve_post_url(link: &str, base_url: &str) -> String {
    if link.starts_with("http") {
        link.to_string()
    } else {
        format!("{}{}", base_url, link)
    }
}
