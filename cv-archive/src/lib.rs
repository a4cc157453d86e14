//! cv-archive - Scrape blog posts that reference Arweave transactions
//!
//! Two pipelines share the same building blocks:
//! - [`archive`]: render each post's Markdown payload to HTML, with an
//!   append-only transaction log acting as seen-set and resume checkpoint
//! - [`text`]: extract the human-readable text of each post's rich-text
//!   payload

pub mod archive;
pub mod error;
pub mod gateway;
pub mod listing;
pub mod post;
pub mod render;
pub mod text;
pub mod txlog;

pub use archive::{ArchiveReport, Archiver};
pub use error::{ScrapeError, ScrapeResult};
pub use gateway::{GatewayClient, PostPayload};
pub use text::{TextReport, TextScraper};
pub use txlog::TransactionLog;

/// Output file name for the `index`-th post carrying transaction `tx`
///
/// The index is zero-padded to two digits; wider indices print in full.
pub fn post_file_name(index: usize, tx: &str, extension: &str) -> String {
    format!("post_{:02}_{}.{}", index, tx, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_file_name() {
        assert_eq!(post_file_name(1, "abc_-1", "html"), "post_01_abc_-1.html");
        assert_eq!(post_file_name(12, "xyz", "txt"), "post_12_xyz.txt");
        assert_eq!(post_file_name(123, "xyz", "txt"), "post_123_xyz.txt");
    }
}
