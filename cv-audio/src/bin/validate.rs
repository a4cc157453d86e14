//! cv-validate - Check an MP3 against the archive's published reference
//!
//! Downloads the reference upload into a temporary file (always removed),
//! compares tags, artwork and format, and patches mismatching artwork with
//! the local cover image.

use anyhow::Result;
use clap::Parser;
use cv_audio::validate::{download_reference, validate_file};
use cv_common::config::{load_config, write_toml_config, TomlConfig};
use cv_common::http::build_client;
use cv_common::Prompter;
use std::path::PathBuf;
use tracing::{error, info};

/// Command-line arguments for cv-validate
#[derive(Parser, Debug)]
#[command(name = "cv-validate")]
#[command(about = "Validate an MP3 against the Cities Visited reference upload")]
#[command(version)]
struct Args {
    /// Config file (overrides CV_CONFIG and default locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// MP3 file to validate (prompted for when omitted)
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    cv_common::logging::init(&config.logging)?;
    cv_common::build_info::log_startup("cv-validate", env!("CARGO_PKG_VERSION"));

    if let Some(path) = &args.write_config {
        write_toml_config(&config, path)?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    if let Err(e) = run(args.input, &config).await {
        error!("An error occurred: {}", e);
    }

    Ok(())
}

/// Prompt for the input, download the reference and report the issues
async fn run(input: Option<PathBuf>, config: &TomlConfig) -> Result<()> {
    let input = match input {
        Some(path) => path,
        None => PathBuf::from(Prompter::stdio().ask("Enter the path to the input MP3 file: ")?),
    };

    if !input.is_file() {
        error!("Input file does not exist.");
        return Ok(());
    }

    let client = build_client(&config.http)?;

    // Removed on drop, whatever the outcome
    let reference = tempfile::Builder::new()
        .prefix("reference")
        .suffix(".mp3")
        .tempfile()?;

    if let Err(e) = download_reference(&client, &config.validate.reference_url, reference.path()).await {
        error!("{}", e);
        return Ok(());
    }

    match validate_file(&input, reference.path(), &config.validate.artwork_path) {
        Ok(issues) if issues.is_empty() => {
            info!("All requirements are satisfied. The file is ready for upload to ArDrive.");
        }
        Ok(issues) => {
            for issue in &issues {
                error!("Error: {}", issue);
            }
        }
        Err(e) => error!("Validation failed: {}", e),
    }

    Ok(())
}
