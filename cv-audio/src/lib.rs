//! cv-audio - MP3 conversion and validation for the Cities Visited archive
//!
//! Files uploaded to the archive must follow the publishing profile: 320 kbps
//! constant bitrate, 44.1 kHz, ID3v2.3, fixed artist/album/genre, title and
//! date frames present, and the project's cover artwork.

pub mod convert;
pub mod metadata;
pub mod validate;

pub use convert::{convert_to_mp3, ConversionProfile, ConvertError};
pub use metadata::{AudioFormat, MetadataError, TagFields, TrackMetadata};
pub use validate::{ValidateError, ValidationIssue};
