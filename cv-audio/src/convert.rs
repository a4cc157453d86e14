//! Audio conversion to the archive's MP3 profile
//!
//! Shells out to ffmpeg with a fixed encoder configuration and metadata
//! template.

use cv_common::config::ConvertConfig;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;

/// Conversion errors
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Input file missing
    #[error("Input file does not exist: {0}")]
    InputNotFound(PathBuf),

    /// Encoder could not be started (not installed, not executable)
    #[error("Failed to start encoder '{program}': {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Encoder ran and reported failure
    #[error("Encoder exited with {0}")]
    EncoderFailed(ExitStatus),
}

/// Encoder settings and metadata template
#[derive(Debug, Clone)]
pub struct ConversionProfile {
    pub ffmpeg: PathBuf,
    pub codec: String,
    pub bitrate: String,
    pub sample_rate: u32,
    pub id3v2_version: u8,
    /// Ordered key/value pairs written as `-metadata key=value`
    pub metadata: Vec<(String, String)>,
}

impl ConversionProfile {
    pub fn from_config(config: &ConvertConfig) -> Self {
        let metadata = [
            ("artist", &config.artist),
            ("album", &config.album),
            ("title", &config.title),
            ("date", &config.date),
            ("genre", &config.genre),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();

        Self {
            ffmpeg: config.ffmpeg.clone(),
            codec: config.codec.clone(),
            bitrate: config.bitrate.clone(),
            sample_rate: config.sample_rate,
            id3v2_version: config.id3v2_version,
            metadata,
        }
    }

    /// Encoder arguments for converting `input` into `output`
    pub fn ffmpeg_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-i".into(),
            input.into(),
            "-codec:a".into(),
            self.codec.as_str().into(),
            "-b:a".into(),
            self.bitrate.as_str().into(),
            "-ar".into(),
            self.sample_rate.to_string().into(),
        ];

        for (key, value) in &self.metadata {
            args.push("-metadata".into());
            args.push(format!("{}={}", key, value).into());
        }

        args.push("-id3v2_version".into());
        args.push(self.id3v2_version.to_string().into());
        args.push(output.into());
        args
    }
}

impl Default for ConversionProfile {
    fn default() -> Self {
        Self::from_config(&ConvertConfig::default())
    }
}

/// Convert `input` to an MP3 at `output`, blocking until the encoder exits
pub async fn convert_to_mp3(
    profile: &ConversionProfile,
    input: &Path,
    output: &Path,
) -> Result<(), ConvertError> {
    if !input.is_file() {
        return Err(ConvertError::InputNotFound(input.to_path_buf()));
    }

    let args = profile.ffmpeg_args(input, output);
    tracing::debug!(program = %profile.ffmpeg.display(), ?args, "Running encoder");

    let status = Command::new(&profile.ffmpeg)
        .args(&args)
        .status()
        .await
        .map_err(|source| ConvertError::Spawn {
            program: profile.ffmpeg.clone(),
            source,
        })?;

    if !status.success() {
        return Err(ConvertError::EncoderFailed(status));
    }

    Ok(())
}
