//! In-process blog + gateway server for pipeline tests
//!
//! Serves:
//! - `/@aurora-mm` listing page linking every post (plus noise links)
//! - `/@aurora-mm/:slug` post pages, optionally announcing a transaction
//! - `/gw/:tx` gateway payloads
//!
//! The gateway counts requests so tests can check what was re-fetched.

#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use cv_archive::{Archiver, GatewayClient, TextScraper};
use cv_common::config::ScrapeConfig;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path as FsPath;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// One post on the fake blog
#[derive(Clone)]
pub enum FakePost {
    /// Page announcing `tx`
    WithTransaction(&'static str),
    /// Page without an identifier
    Plain,
    /// Page answering 500
    Broken,
}

pub struct BlogFixture {
    pub posts: Vec<(&'static str, FakePost)>,
    pub payloads: HashMap<&'static str, Value>,
    /// Listing answers 503 when set
    pub listing_down: bool,
}

struct ServerState {
    base: String,
    fixture: BlogFixture,
    gateway_hits: AtomicUsize,
}

pub struct TestServer {
    pub base: String,
    state: Arc<ServerState>,
}

impl TestServer {
    pub fn blog_url(&self) -> String {
        format!("{}/@aurora-mm", self.base)
    }

    pub fn gateway_url(&self) -> String {
        format!("{}/gw", self.base)
    }

    pub fn gateway_hits(&self) -> usize {
        self.state.gateway_hits.load(Ordering::SeqCst)
    }

    pub fn scrape_config(&self, dir: &FsPath) -> ScrapeConfig {
        ScrapeConfig {
            blog_url: self.blog_url(),
            posts_dir: dir.join("posts"),
            transaction_log: dir.join("arweave_transactions.txt"),
        }
    }

    pub fn archiver(&self, dir: &FsPath) -> Archiver {
        let http = reqwest::Client::new();
        let gateway = GatewayClient::new(http.clone(), self.gateway_url());
        Archiver::new(http, gateway, self.scrape_config(dir))
    }

    pub fn text_scraper(&self, dir: &FsPath) -> TextScraper {
        let http = reqwest::Client::new();
        let gateway = GatewayClient::new(http.clone(), self.gateway_url());
        TextScraper::new(http, gateway, self.scrape_config(dir))
    }
}

pub async fn start(fixture: BlogFixture) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let state = Arc::new(ServerState {
        base: base.clone(),
        fixture,
        gateway_hits: AtomicUsize::new(0),
    });

    let app = Router::new()
        .route("/@aurora-mm", get(listing))
        .route("/@aurora-mm/:slug", get(post))
        .route("/gw/:tx", get(payload))
        .with_state(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer { base, state }
}

async fn listing(State(state): State<Arc<ServerState>>) -> Response {
    if state.fixture.listing_down {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let mut body = String::from("<html><body><nav>");
    body.push_str(&format!(r#"<a href="{}/@aurora-mm">Home</a>"#, state.base));
    body.push_str(r#"<a href="https://paragraph.xyz/@elsewhere/post">Elsewhere</a>"#);
    body.push_str("</nav><main>");
    for (slug, _) in &state.fixture.posts {
        body.push_str(&format!(
            r#"<article><a href="{base}/@aurora-mm/{slug}">{slug}</a> <a href="{base}/@aurora-mm/{slug}">Read more</a></article>"#,
            base = state.base,
            slug = slug
        ));
    }
    body.push_str("</main></body></html>");

    Html(body).into_response()
}

async fn post(State(state): State<Arc<ServerState>>, Path(slug): Path<String>) -> Response {
    let Some((_, post)) = state.fixture.posts.iter().find(|(s, _)| *s == slug) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match post {
        FakePost::WithTransaction(tx) => Html(format!(
            "<html><body><h1>{slug}</h1><p>Field notes.</p><footer><span>ARWEAVE TX</span> <a href=\"https://permagate.io/{tx}\">{tx}</a></footer></body></html>",
            slug = slug,
            tx = tx
        ))
        .into_response(),
        FakePost::Plain => {
            Html(format!("<html><body><h1>{}</h1><p>No archive yet.</p></body></html>", slug))
                .into_response()
        }
        FakePost::Broken => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn payload(State(state): State<Arc<ServerState>>, Path(tx): Path<String>) -> Response {
    state.gateway_hits.fetch_add(1, Ordering::SeqCst);

    match state.fixture.payloads.get(tx.as_str()) {
        Some(value) => Json(value.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
