//! Environment-derived settings, read once at startup.

use anyhow::{Context, Result};

/// Settings for the dispatch glue.
///
/// - `APPLICATION`: namespace prefix for application-scoped secrets.
/// - `AWS_REGION`: optional region override for the AWS clients.
/// - `REV_PROXY_SECRET`: full store name of the reverse-proxy secret.
/// - `ANALYZER_URL`: optional endpoint for scan requests.
#[derive(Debug, Clone)]
pub struct Config {
    pub application: String,
    pub region: Option<String>,
    pub rev_proxy_secret: String,
    pub analyzer_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            application: std::env::var("APPLICATION").context("APPLICATION must be set")?,
            region: std::env::var("AWS_REGION").ok(),
            rev_proxy_secret: std::env::var("REV_PROXY_SECRET")
                .context("REV_PROXY_SECRET must be set")?,
            analyzer_url: std::env::var("ANALYZER_URL").ok(),
        })
    }
}
