//! Error types for cv-gateway

use std::path::PathBuf;
use thiserror::Error;

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("File '{}' does not exist.", .0.display())]
    NotFound(PathBuf),

    #[error("The gateway to replace must not be empty")]
    EmptyPattern,

    #[error("Workbook part '{0}' is not valid UTF-8")]
    InvalidPart(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}
