//! MP3 metadata extraction and artwork patching
//!
//! Text frames and stream properties are read with lofty. Attached
//! pictures are read and written with the id3 crate, which keeps the APIC
//! frame bytes exactly as stored.

use id3::frame::{Picture, PictureType};
use id3::TagLike;
use lofty::file::FileType;
use lofty::prelude::*;
use lofty::probe::Probe;
use std::fmt;
use std::path::Path;
use thiserror::Error;

const ARTWORK_DESCRIPTION: &str = "Cover";
const FALLBACK_ARTWORK_MIME: &str = "image/png";

/// Metadata extraction errors
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Failed to probe or parse the audio file
    #[error("Failed to read file: {0}")]
    ReadError(String),

    /// ID3 tag read/write failure
    #[error("ID3 error: {0}")]
    Id3(#[from] id3::Error),

    /// I/O error (artwork read)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Tag fields checked by validation
///
/// `Some("")` means the frame exists but is empty, which still counts as
/// present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFields {
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
}

/// Container and stream layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFormat {
    pub container: String,
    pub sample_rate: Option<u32>,
    pub channels: Option<u8>,
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.container)?;
        if let Some(rate) = self.sample_rate {
            write!(f, " {} Hz", rate)?;
        }
        if let Some(channels) = self.channels {
            write!(f, " {}ch", channels)?;
        }
        Ok(())
    }
}

/// Everything validation compares between two files
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMetadata {
    pub tags: TagFields,
    /// Data of the first attached picture, if any
    pub picture: Option<Vec<u8>>,
    pub format: AudioFormat,
}

/// Extract tags, first attached picture and format from `path`
pub fn extract(path: &Path) -> Result<TrackMetadata, MetadataError> {
    let tagged_file = Probe::open(path)
        .map_err(|e| MetadataError::ReadError(e.to_string()))?
        .read()
        .map_err(|e| MetadataError::ReadError(e.to_string()))?;

    let properties = tagged_file.properties();
    let format = AudioFormat {
        container: container_name(tagged_file.file_type()).to_string(),
        sample_rate: properties.sample_rate(),
        channels: properties.channels(),
    };

    let tags = match tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        Some(tag) => TagFields {
            artist: tag.artist().map(|s| s.to_string()),
            album: tag.album().map(|s| s.to_string()),
            genre: tag.genre().map(|s| s.to_string()),
            title: tag.title().map(|s| s.to_string()),
            date: tag
                .get_string(&ItemKey::RecordingDate)
                .map(str::to_string)
                .or_else(|| tag.year().map(|y| y.to_string())),
        },
        None => TagFields::default(),
    };

    let picture = first_picture(path)?;

    tracing::debug!(
        file = %path.display(),
        artist = ?tags.artist,
        album = ?tags.album,
        format = %format,
        has_picture = picture.is_some(),
        "Extracted metadata"
    );

    Ok(TrackMetadata {
        tags,
        picture,
        format,
    })
}

/// Data of the first APIC frame, `None` when the file has no ID3 tag
fn first_picture(path: &Path) -> Result<Option<Vec<u8>>, MetadataError> {
    match id3::Tag::read_from_path(path) {
        Ok(tag) => Ok(tag.pictures().next().map(|p| p.data.clone())),
        Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Replace the front cover of `path` with the image at `artwork_path`
///
/// Files without an ID3 tag get a new one. Written as ID3v2.3.
pub fn attach_artwork(path: &Path, artwork_path: &Path) -> Result<(), MetadataError> {
    let data = std::fs::read(artwork_path)?;
    let mime_type = infer::get(&data)
        .map(|kind| kind.mime_type())
        .unwrap_or(FALLBACK_ARTWORK_MIME)
        .to_string();

    let mut tag = match id3::Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(e) if matches!(e.kind, id3::ErrorKind::NoTag) => id3::Tag::new(),
        Err(e) => return Err(e.into()),
    };

    tag.remove_picture_by_type(PictureType::CoverFront);
    tag.add_frame(Picture {
        mime_type,
        picture_type: PictureType::CoverFront,
        description: ARTWORK_DESCRIPTION.to_string(),
        data,
    });
    tag.write_to_path(path, id3::Version::Id3v23)?;

    tracing::debug!(
        file = %path.display(),
        artwork = %artwork_path.display(),
        "Attached cover artwork"
    );

    Ok(())
}

fn container_name(file_type: FileType) -> &'static str {
    match file_type {
        FileType::Mpeg => "MP3",
        FileType::Flac => "FLAC",
        FileType::Opus => "Opus",
        FileType::Vorbis => "OGG Vorbis",
        FileType::Aac => "AAC",
        FileType::Aiff => "AIFF",
        FileType::Wav => "WAV",
        FileType::WavPack => "WavPack",
        _ => "Unknown",
    }
}
