//! cv-convert - Convert a recording to the archive's MP3 profile
//!
//! Asks for the input audio file and writes the configured output file
//! (`output.mp3` by default).

use anyhow::Result;
use clap::Parser;
use cv_audio::{convert_to_mp3, ConversionProfile, ConvertError};
use cv_common::config::{load_config, write_toml_config};
use cv_common::Prompter;
use std::path::PathBuf;
use tracing::{error, info};

/// Command-line arguments for cv-convert
#[derive(Parser, Debug)]
#[command(name = "cv-convert")]
#[command(about = "Convert a recording to the Cities Visited MP3 profile")]
#[command(version)]
struct Args {
    /// Config file (overrides CV_CONFIG and default locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Input audio file (prompted for when omitted)
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    cv_common::logging::init(&config.logging)?;
    cv_common::build_info::log_startup("cv-convert", env!("CARGO_PKG_VERSION"));

    if let Some(path) = &args.write_config {
        write_toml_config(&config, path)?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let input = match args.input {
        Some(path) => path,
        None => match Prompter::stdio().ask("Enter the input audio file path: ") {
            Ok(answer) => PathBuf::from(answer),
            Err(e) => {
                error!("An error occurred: {}", e);
                return Ok(());
            }
        },
    };

    if !input.is_file() {
        error!("Input file does not exist.");
        return Ok(());
    }

    let profile = ConversionProfile::from_config(&config.convert);
    let output = &config.convert.output_file;

    match convert_to_mp3(&profile, &input, output).await {
        Ok(()) => info!("Conversion complete. File saved as: {}", output.display()),
        Err(e @ ConvertError::Spawn { .. }) => error!("Error starting conversion: {}", e),
        Err(e) => error!("Error during conversion: {}", e),
    }

    Ok(())
}
