//! Scrape-and-archive pipeline tests against an in-process blog/gateway

mod helpers;

use cv_archive::ArchiveReport;
use helpers::{start, BlogFixture, FakePost};
use serde_json::json;
use std::collections::HashMap;
use tempfile::tempdir;

fn city_blog() -> BlogFixture {
    let mut payloads = HashMap::new();
    payloads.insert(
        "txVilnius_1",
        json!({
            "title": "Vilnius",
            "subtitle": "April 2024",
            "markdown": "Church bells over the **old town**.",
            "cover_img": {"img": {"src": "https://img.example/vilnius.jpg"}}
        }),
    );
    payloads.insert("txRiga-2", json!({"title": "Riga"}));

    BlogFixture {
        posts: vec![
            ("vilnius", FakePost::WithTransaction("txVilnius_1")),
            ("riga", FakePost::WithTransaction("txRiga-2")),
            ("notes", FakePost::Plain),
            ("broken", FakePost::Broken),
            // Same recording announced twice
            ("vilnius-again", FakePost::WithTransaction("txVilnius_1")),
        ],
        payloads,
        listing_down: false,
    }
}

#[tokio::test]
async fn test_first_run_archives_new_transactions() {
    let server = start(city_blog()).await;
    let dir = tempdir().unwrap();

    let report = server.archiver(dir.path()).run().await.unwrap();

    assert_eq!(
        report,
        ArchiveReport {
            listing_unavailable: false,
            links_found: 5,
            new_transactions: 2,
            already_known: 1,
            without_transaction: 1,
            rendered: 1,
            failed: 2,
        }
    );

    let log = std::fs::read_to_string(dir.path().join("arweave_transactions.txt")).unwrap();
    assert_eq!(log, "txVilnius_1\ntxRiga-2\n");

    let page =
        std::fs::read_to_string(dir.path().join("posts").join("post_01_txVilnius_1.html")).unwrap();
    assert!(page.starts_with("<!DOCTYPE html>\n<html>\n<head>\n<title>\nVilnius\n</title>"));
    assert!(page.contains(r#"<img src="https://img.example/vilnius.jpg""#));
    assert!(page.contains("<h2>April 2024</h2>"));
    assert!(page.contains("<strong>old town</strong>"));

    // Riga has no Markdown body; nothing rendered for it
    assert!(!dir.path().join("posts").join("post_02_txRiga-2.html").exists());

    // Each new transaction fetched once, the duplicate not at all
    assert_eq!(server.gateway_hits(), 2);
}

#[tokio::test]
async fn test_rerun_skips_known_transactions() {
    let server = start(city_blog()).await;
    let dir = tempdir().unwrap();

    server.archiver(dir.path()).run().await.unwrap();
    let log_after_first =
        std::fs::read_to_string(dir.path().join("arweave_transactions.txt")).unwrap();

    let report = server.archiver(dir.path()).run().await.unwrap();

    assert_eq!(report.new_transactions, 0);
    assert_eq!(report.already_known, 3);
    assert_eq!(report.rendered, 0);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("arweave_transactions.txt")).unwrap(),
        log_after_first
    );

    // Only the still-unrendered Riga transaction is retried
    assert_eq!(server.gateway_hits(), 3);
}

#[tokio::test]
async fn test_unreachable_listing_renders_pending_log_entries() {
    let server = start(BlogFixture {
        listing_down: true,
        ..city_blog()
    })
    .await;
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("arweave_transactions.txt"), "txVilnius_1\n").unwrap();

    let report = server.archiver(dir.path()).run().await.unwrap();

    assert!(report.listing_unavailable);
    assert_eq!(report.links_found, 0);
    assert_eq!(report.rendered, 1);
    assert!(dir.path().join("posts").join("post_01_txVilnius_1.html").exists());
}

#[tokio::test]
async fn test_existing_output_is_not_rendered_again() {
    let server = start(BlogFixture {
        listing_down: true,
        ..city_blog()
    })
    .await;
    let dir = tempdir().unwrap();
    let posts = dir.path().join("posts");
    std::fs::create_dir_all(&posts).unwrap();
    std::fs::write(dir.path().join("arweave_transactions.txt"), "txVilnius_1\n").unwrap();
    std::fs::write(posts.join("post_01_txVilnius_1.html"), "kept").unwrap();

    let report = server.archiver(dir.path()).run().await.unwrap();

    assert_eq!(report.rendered, 0);
    assert_eq!(server.gateway_hits(), 0);
    assert_eq!(
        std::fs::read_to_string(posts.join("post_01_txVilnius_1.html")).unwrap(),
        "kept"
    );
}

#[tokio::test]
async fn test_gateway_miss_is_logged_but_not_rendered() {
    let server = start(BlogFixture {
        posts: vec![("lost", FakePost::WithTransaction("txLost"))],
        payloads: HashMap::new(),
        listing_down: false,
    })
    .await;
    let dir = tempdir().unwrap();

    let report = server.archiver(dir.path()).run().await.unwrap();

    assert_eq!(report.new_transactions, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("arweave_transactions.txt")).unwrap(),
        "txLost\n"
    );
    assert!(!dir.path().join("posts").join("post_01_txLost.html").exists());
}
