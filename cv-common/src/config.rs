//! Configuration loading
//!
//! Config file resolution priority order:
//! 1. Command-line `--config` path (highest priority)
//! 2. `CV_CONFIG` environment variable
//! 3. User config file (`~/.config/cities-visited/config.toml`)
//! 4. System config file (`/etc/cities-visited/config.toml`, Linux only)
//! 5. Compiled defaults (fallback)
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "CV_CONFIG";

const CONFIG_DIR_NAME: &str = "cities-visited";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration shared by all tools
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub gateway: GatewayConfig,
    pub scrape: ScrapeConfig,
    pub convert: ConvertConfig,
    pub validate: ValidateConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("CitiesVisited/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Arweave gateway used to resolve transaction identifiers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: "https://permagate.io".to_string(),
        }
    }
}

/// Blog scraping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Listing page of the blog; post links live under `<blog_url>/`
    pub blog_url: String,
    /// Directory receiving rendered posts
    pub posts_dir: PathBuf,
    /// Append-only log of seen transaction identifiers
    pub transaction_log: PathBuf,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            blog_url: "https://paragraph.xyz/@aurora-mm".to_string(),
            posts_dir: PathBuf::from("posts"),
            transaction_log: PathBuf::from("arweave_transactions.txt"),
        }
    }
}

/// MP3 conversion profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Encoder executable
    pub ffmpeg: PathBuf,
    pub output_file: PathBuf,
    pub artist: String,
    pub album: String,
    pub genre: String,
    /// Placeholder; the tag only has to be present
    pub title: String,
    /// Placeholder; the tag only has to be present
    pub date: String,
    pub codec: String,
    /// Constant bitrate passed to the encoder (e.g. "320k")
    pub bitrate: String,
    pub sample_rate: u32,
    pub id3v2_version: u8,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            output_file: PathBuf::from("output.mp3"),
            artist: "LR Friberg".to_string(),
            album: "Cities Visited".to_string(),
            genre: "Field Recordings".to_string(),
            title: String::new(),
            date: String::new(),
            codec: "libmp3lame".to_string(),
            bitrate: "320k".to_string(),
            sample_rate: 44100,
            id3v2_version: 3,
        }
    }
}

/// MP3 validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateConfig {
    /// Published file whose tags define the requirements
    pub reference_url: String,
    /// Local cover art used to patch mismatching files
    pub artwork_path: PathBuf,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            reference_url:
                "https://archive.org/download/cities-visited-field-recordings/202404_Vilnius.mp3"
                    .to_string(),
            artwork_path: PathBuf::from("artwork.png"),
        }
    }
}

/// Load configuration following the resolution priority order
///
/// An explicitly requested file (CLI or environment) must exist.
/// Discovered files are optional; compiled defaults apply when none exist.
pub fn load_config(cli_path: Option<&Path>) -> Result<TomlConfig> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_path {
        return read_toml_config(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return read_toml_config(Path::new(&path));
        }
    }

    // Priority 3 and 4: well-known locations
    for candidate in default_config_paths() {
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "Using discovered config file");
            return read_toml_config(&candidate);
        }
    }

    // Priority 5: compiled defaults
    Ok(TomlConfig::default())
}

/// Read and parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Write config atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize config failed: {}", e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, content)?;

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(Error::Io(e));
    }

    Ok(())
}

/// Candidate config file locations in priority order
fn default_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    }

    if cfg!(target_os = "linux") {
        paths.push(
            PathBuf::from("/etc")
                .join(CONFIG_DIR_NAME)
                .join(CONFIG_FILE_NAME),
        );
    }

    paths
}
