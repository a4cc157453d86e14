//! Scrape-and-archive pipeline
//!
//! Listing page → post links → post pages → transaction identifiers →
//! gateway payloads → HTML files. The transaction log makes runs
//! resumable: known identifiers are skipped on rediscovery, and a final
//! pass renders any logged identifier whose output file is missing (also
//! when the blog itself is unreachable).

use crate::error::ScrapeResult;
use crate::gateway::{fetch_page, GatewayClient};
use crate::listing::{extract_post_links, resolve_post_url};
use crate::post::{find_transaction, page_text};
use crate::render::render_html;
use crate::txlog::TransactionLog;
use crate::post_file_name;
use cv_common::config::ScrapeConfig;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{info, warn};

/// Counters for one archive run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Listing page could not be fetched; only the pending pass ran
    pub listing_unavailable: bool,
    pub links_found: usize,
    /// Identifiers logged for the first time this run
    pub new_transactions: usize,
    pub already_known: usize,
    /// Post pages without an identifier
    pub without_transaction: usize,
    pub rendered: usize,
    /// Pages or transactions that could not be fetched, parsed or written
    pub failed: usize,
}

/// Scrape-and-archive driver
pub struct Archiver {
    http: reqwest::Client,
    gateway: GatewayClient,
    config: ScrapeConfig,
}

impl Archiver {
    pub fn new(http: reqwest::Client, gateway: GatewayClient, config: ScrapeConfig) -> Self {
        Self {
            http,
            gateway,
            config,
        }
    }

    /// Output path of the transaction with sequence index `index`
    pub fn post_path(&self, index: usize, tx: &str) -> PathBuf {
        self.config.posts_dir.join(post_file_name(index, tx, "html"))
    }

    /// Run the pipeline
    ///
    /// Only local setup failures (posts folder, transaction log) are
    /// returned as errors; every remote failure skips its unit of work.
    pub async fn run(&self) -> ScrapeResult<ArchiveReport> {
        std::fs::create_dir_all(&self.config.posts_dir)?;
        let mut log = TransactionLog::open(&self.config.transaction_log)?;
        info!(
            log = %log.path().display(),
            known = log.len(),
            "Loaded transaction log"
        );

        let mut report = ArchiveReport::default();
        let mut attempted = HashSet::new();

        let base_url = self.config.blog_url.as_str();
        match fetch_page(&self.http, base_url).await {
            Ok(listing) => {
                self.scan_posts(&listing, &mut log, &mut report, &mut attempted)
                    .await?;
            }
            Err(e) => {
                warn!(
                    "Base URL {} unavailable ({}). Checking unprocessed transactions...",
                    base_url, e
                );
                report.listing_unavailable = true;
            }
        }

        self.render_pending(&log, &mut report, &attempted).await;

        info!(
            new = report.new_transactions,
            known = report.already_known,
            rendered = report.rendered,
            failed = report.failed,
            logged = log.len(),
            "Archive run complete"
        );

        Ok(report)
    }

    async fn scan_posts(
        &self,
        listing: &str,
        log: &mut TransactionLog,
        report: &mut ArchiveReport,
        attempted: &mut HashSet<usize>,
    ) -> ScrapeResult<()> {
        let base_url = self.config.blog_url.as_str();
        let links = extract_post_links(listing, base_url);
        report.links_found = links.len();

        for link in &links {
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

            // Logged before rendering so an interrupted run resumes here
            let Some(index) = log.record(&tx)? else {
                info!("Transaction {} already processed. Skipping.", tx);
                report.already_known += 1;
                continue;
            };

            info!("Processing transaction: {}", tx);
            report.new_transactions += 1;
            attempted.insert(index);
            self.render_counted(&tx, index, report).await;
        }

        Ok(())
    }

    /// Render logged transactions whose output file is missing
    async fn render_pending(
        &self,
        log: &TransactionLog,
        report: &mut ArchiveReport,
        attempted: &HashSet<usize>,
    ) {
        for (position, tx) in log.entries().iter().enumerate() {
            let index = position + 1;
            if attempted.contains(&index) || self.post_path(index, tx).exists() {
                continue;
            }

            info!("Processing unrendered transaction: {}", tx);
            self.render_counted(tx, index, report).await;
        }
    }

    async fn render_counted(&self, tx: &str, index: usize, report: &mut ArchiveReport) {
        match self.render_transaction(tx, index).await {
            Ok(Some(_)) => report.rendered += 1,
            Ok(None) => report.failed += 1,
            Err(e) => {
                warn!("Failed to process transaction {} ({})", tx, e);
                report.failed += 1;
            }
        }
    }

    /// Fetch the payload of `tx` and write its HTML page
    ///
    /// Returns `Ok(None)` when the payload has no Markdown body.
    pub async fn render_transaction(&self, tx: &str, index: usize) -> ScrapeResult<Option<PathBuf>> {
        let payload = self.gateway.fetch_payload(tx).await?;

        let Some(markdown) = payload.markdown.as_deref() else {
            warn!("Markdown field missing in the response for transaction {}", tx);
            return Ok(None);
        };

        let html = render_html(
            markdown,
            payload.title.as_deref(),
            payload.subtitle.as_deref(),
            payload.cover_src(),
        );

        let path = self.post_path(index, tx);
        std::fs::write(&path, html)?;
        info!("Saved: {}", path.display());

        Ok(Some(path))
    }
}
