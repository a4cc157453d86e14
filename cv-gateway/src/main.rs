//! cv-gateway - Replace the Arweave gateway in the catalog workbook or in
//! rendered/markup files

use anyhow::Result;
use clap::Parser;
use cv_common::config::{load_config, write_toml_config};
use cv_common::Prompter;
use cv_gateway::{replace_gateway, Variant};
use std::path::PathBuf;
use tracing::{error, info};

/// Command-line arguments for cv-gateway
#[derive(Parser, Debug)]
#[command(name = "cv-gateway")]
#[command(about = "Replace the Arweave gateway in spreadsheets and markup files")]
#[command(version)]
struct Args {
    /// Config file (overrides CV_CONFIG and default locations)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Workbook, markup file or folder (prompted for when omitted)
    path: Option<PathBuf>,

    /// Gateway to replace (prompted for when omitted)
    #[arg(long)]
    old: Option<String>,

    /// Gateway to use instead (prompted for when omitted)
    #[arg(long)]
    new: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    cv_common::logging::init(&config.logging)?;
    cv_common::build_info::log_startup("cv-gateway", env!("CARGO_PKG_VERSION"));

    if let Some(path) = &args.write_config {
        write_toml_config(&config, path)?;
        info!("Configuration written to {}", path.display());
        return Ok(());
    }

    let (path, old_gateway, new_gateway) = match ask_inputs(args.path, args.old, args.new) {
        Ok(inputs) => inputs,
        Err(e) => {
            error!("An error occurred: {}", e);
            return Ok(());
        }
    };

    match replace_gateway(&path, &old_gateway, &new_gateway) {
        Ok(report) => {
            info!(
                "Updated gateway in '{}' to '{}'.",
                path.display(),
                new_gateway
            );
            let unit = match Variant::for_path(&path) {
                Variant::Spreadsheet => "workbook parts",
                Variant::Markup => "files",
            };
            info!(
                "{} replacement(s) across {} of {} {}",
                report.replacements, report.modified, report.scanned, unit
            );
        }
        Err(e) => error!("An error occurred: {}", e),
    }

    Ok(())
}

/// Path, current gateway and new gateway, prompting for any not given
fn ask_inputs(
    path: Option<PathBuf>,
    old: Option<String>,
    new: Option<String>,
) -> cv_common::Result<(PathBuf, String, String)> {
    let mut prompter = Prompter::stdio();
    let path = PathBuf::from(prompter.ask_or(
        path.map(|p| p.to_string_lossy().into_owned()),
        "Enter the path to the Excel (.xlsx) file or markup file/folder: ",
    )?);
    let old_gateway = prompter.ask_or(
        old,
        "Enter the current gateway to replace (e.g., permagate.io): ",
    )?;
    let new_gateway = prompter.ask_or(new, "Enter the new gateway to use: ")?;

    Ok((path, old_gateway, new_gateway))
}
