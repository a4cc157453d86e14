//! MP3 validation against a published reference file
//!
//! The reference is the archive's canonical upload. An input file passes
//! when it shares the reference's artist, album, genre, artwork and format
//! and carries title and date frames.

use crate::metadata::{self, MetadataError, TrackMetadata};
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Validation errors (conditions that prevent validation from running)
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Failed to download file: {0}")]
    DownloadFailed(u16),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// A requirement the input file does not meet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Tag differs from the reference
    TagMismatch(&'static str),
    /// Required tag absent
    MissingTag(&'static str),
    /// First attached picture differs from the reference
    ArtworkMismatch,
    FormatMismatch { input: String, reference: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::TagMismatch(key) => write!(f, "Tag '{}' does not match.", key),
            ValidationIssue::MissingTag(key) => write!(f, "Tag '{}' is missing.", key),
            ValidationIssue::ArtworkMismatch => write!(f, "Attached pictures do not match."),
            ValidationIssue::FormatMismatch { input, reference } => write!(
                f,
                "File format '{}' does not match reference '{}'.",
                input, reference
            ),
        }
    }
}

/// Download the reference file to `dest`
pub async fn download_reference(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<(), ValidateError> {
    tracing::debug!(url = %url, dest = %dest.display(), "Downloading reference file");

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ValidateError::DownloadFailed(status.as_u16()));
    }

    let bytes = response.bytes().await?;
    tokio::fs::write(dest, &bytes).await?;

    tracing::debug!(bytes = bytes.len(), "Reference file downloaded");
    Ok(())
}

/// Compare input metadata against the reference
pub fn compare(input: &TrackMetadata, reference: &TrackMetadata) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let shared = [
        ("artist", &input.tags.artist, &reference.tags.artist),
        ("album", &input.tags.album, &reference.tags.album),
        ("genre", &input.tags.genre, &reference.tags.genre),
    ];
    for (key, ours, theirs) in shared {
        if ours != theirs {
            issues.push(ValidationIssue::TagMismatch(key));
        }
    }

    if input.tags.title.is_none() {
        issues.push(ValidationIssue::MissingTag("track title"));
    }

    if input.tags.date.is_none() {
        issues.push(ValidationIssue::MissingTag("date"));
    }

    if input.picture != reference.picture {
        issues.push(ValidationIssue::ArtworkMismatch);
    }

    if input.format != reference.format {
        issues.push(ValidationIssue::FormatMismatch {
            input: input.format.to_string(),
            reference: reference.format.to_string(),
        });
    }

    issues
}

/// Validate `input_path` against `reference_path`
///
/// Mismatching artwork is patched in place with `artwork_path`; the issue
/// is still reported so the caller knows the file was changed.
pub fn validate_file(
    input_path: &Path,
    reference_path: &Path,
    artwork_path: &Path,
) -> Result<Vec<ValidationIssue>, ValidateError> {
    let input = metadata::extract(input_path)?;
    let reference = metadata::extract(reference_path)?;

    let issues = compare(&input, &reference);

    if issues.contains(&ValidationIssue::ArtworkMismatch) {
        tracing::warn!("Cover artwork does not match. Replacing with local artwork.");
        if let Err(e) = metadata::attach_artwork(input_path, artwork_path) {
            tracing::error!(
                artwork = %artwork_path.display(),
                "Failed to replace cover artwork: {}",
                e
            );
        }
    }

    Ok(issues)
}
