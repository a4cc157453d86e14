//! cv-archive - Archive blog posts referencing Arweave transactions as HTML
//!
//! Asks for the blog's listing URL (configured default on empty answer),
//! then renders every newly discovered transaction into the posts folder.

use anyhow::Result;
use clap::Parser;
use cv_archive::{Archiver, GatewayClient};
use cv_common::config::{load_config, write_toml_config, TomlConfig};
use cv_common::http::build_client;
use cv_common::Prompter;
use std::path::PathBuf;
use tracing::{error, info};

/// Command-line arguments for cv-archive
#[derive(Parser, Debug)]
#[command(name = "cv-archive")]
#[command(about = "Archive Arweave-backed blog posts as HTML")]
#[command(version)]
struct Args {
    /// Config file (overrides CV_CONFIG and default locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Blog listing URL (prompted for when omitted)
    blog_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    cv_common::logging::init(&config.logging)?;
    cv_common::build_info::log_startup("cv-archive", env!("CARGO_PKG_VERSION"));

    if let Some(path) = &args.write_config {
        write_toml_config(&config, path)?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    if let Err(e) = run(args.blog_url, config).await {
        error!("An error occurred: {}", e);
    }

    Ok(())
}

/// Resolve the blog URL and run the pipeline
///
/// Pipeline failures are logged here; the returned error covers the setup
/// (prompt, HTTP client).
async fn run(blog_url: Option<String>, mut config: TomlConfig) -> Result<()> {
    let blog_url = match blog_url {
        Some(url) => url,
        None => Prompter::stdio().ask(&format!(
            "Enter the blog URL [{}]: ",
            config.scrape.blog_url
        ))?,
    };
    if !blog_url.is_empty() {
        config.scrape.blog_url = blog_url.trim_end_matches('/').to_string();
    }

    let http = build_client(&config.http)?;
    let gateway = GatewayClient::new(http.clone(), config.gateway.url.clone());
    let archiver = Archiver::new(http, gateway, config.scrape);

    if let Err(e) = archiver.run().await {
        error!("Archive run aborted: {}", e);
    }

    Ok(())
}
