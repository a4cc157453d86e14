//! HTTP client construction

use crate::config::HttpConfig;
use crate::Result;
use std::time::Duration;

/// Build the client every tool uses for blog, gateway and download requests
pub fn build_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    Ok(client)
}
