//! Scrape-to-text pipeline
//!
//! Same discovery as the archive pipeline, but each post's rich-text
//! payload is reduced to plain text. No transaction log is kept; files are
//! numbered by link position on the listing page.

use crate::error::ScrapeResult;
use crate::gateway::{fetch_page, GatewayClient};
use crate::listing::{extract_post_links, resolve_post_url};
use crate::post::{find_transaction, page_text};
use crate::render::{extract_human_text, DocNode};
use crate::post_file_name;
use cv_common::config::ScrapeConfig;
use std::path::PathBuf;
use tracing::{info, warn};

/// Counters for one text scrape
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextReport {
    pub links_found: usize,
    pub without_transaction: usize,
    pub saved: usize,
    pub failed: usize,
}

/// Scrape-to-text driver
pub struct TextScraper {
    http: reqwest::Client,
    gateway: GatewayClient,
    config: ScrapeConfig,
}

impl TextScraper {
    pub fn new(http: reqwest::Client, gateway: GatewayClient, config: ScrapeConfig) -> Self {
        Self {
            http,
            gateway,
            config,
        }
    }

    /// Run the pipeline; an unreachable listing page aborts the run
    pub async fn run(&self) -> ScrapeResult<TextReport> {
        let base_url = self.config.blog_url.as_str();
        let listing = fetch_page(&self.http, base_url).await?;

        std::fs::create_dir_all(&self.config.posts_dir)?;

        let links = extract_post_links(&listing, base_url);
        let mut report = TextReport {
            links_found: links.len(),
            ..TextReport::default()
        };

        for (position, link) in links.iter().enumerate() {
            let index = position + 1;
            let post_url = resolve_post_url(link, base_url);

            let page = match fetch_page(&self.http, &post_url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Failed to fetch {} ({}). Skipping.", post_url, e);
                    report.failed += 1;
                    continue;
                }
            };

            let Some(tx) = find_transaction(&page_text(&page)) else {
                info!("No transactions found in {}", post_url);
                report.without_transaction += 1;
                continue;
            };
            info!("Found transaction: {}", tx);

            match self.save_transaction_text(&tx, index).await {
                Ok(Some(_)) => report.saved += 1,
                Ok(None) => report.failed += 1,
                Err(e) => {
                    warn!("Failed to process transaction {} ({})", tx, e);
                    report.failed += 1;
                }
            }
        }

        info!(
            saved = report.saved,
            failed = report.failed,
            "Text scrape complete"
        );

        Ok(report)
    }

    /// Fetch the payload of `tx` and write its plain text
    ///
    /// Returns `Ok(None)` when the payload has no rich-text document.
    pub async fn save_transaction_text(&self, tx: &str, index: usize) -> ScrapeResult<Option<PathBuf>> {
        let payload = self.gateway.fetch_payload(tx).await?;

        let Some(json) = payload.json.as_deref() else {
            warn!("JSON field missing in the response for transaction {}", tx);
            return Ok(None);
        };

        let document: DocNode = serde_json::from_str(json)?;
        let text = extract_human_text(&document);

        let path = self
            .config
            .posts_dir
            .join(post_file_name(index, tx, "txt"));
        std::fs::write(&path, text)?;
        info!("Saved: {}", path.display());

        Ok(Some(path))
    }
}
