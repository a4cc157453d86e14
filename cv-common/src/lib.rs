//! # Cities Visited Common Library
//!
//! Shared code for the Cities Visited publishing tools:
//! - Error type
//! - TOML configuration loading
//! - Logging initialization and build identification
//! - Interactive prompts
//! - HTTP client construction

pub mod build_info;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod prompt;

pub use error::{Error, Result};
pub use prompt::Prompter;
