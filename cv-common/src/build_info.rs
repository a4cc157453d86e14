//! Build identification captured by build.rs

use tracing::info;

pub const GIT_HASH: &str = env!("CV_GIT_HASH");
pub const BUILD_TIMESTAMP: &str = env!("CV_BUILD_TIMESTAMP");
pub const BUILD_PROFILE: &str = env!("CV_BUILD_PROFILE");

/// Log build identification; call right after logging init
pub fn log_startup(tool: &str, version: &str) {
    info!(
        "Starting {} v{} [{}] built {} ({})",
        tool, version, GIT_HASH, BUILD_TIMESTAMP, BUILD_PROFILE
    );
}
