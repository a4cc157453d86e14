//! Transaction identifier discovery on a post page

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

static TRANSACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"ARWEAVE TX\s+([A-Za-z0-9_-]+)").expect("static regex"));

/// All text of the page, tags stripped
pub fn page_text(html: &str) -> String {
    Html::parse_document(html).root_element().text().collect()
}

/// First transaction identifier announced in `text`
pub fn find_transaction(text: &str) -> Option<String> {
    TRANSACTION
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
