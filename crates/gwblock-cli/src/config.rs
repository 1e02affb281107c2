//! Configuration loading: TOML file plus environment overrides.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Sync configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name embedded in the owned prefix tag
    pub adlist_name: String,

    /// Block source URLs
    pub adlist_urls: Vec<String>,

    /// Allow source URLs
    pub whitelist_urls: Vec<String>,

    /// Local file with additional block entries
    pub dynamic_blacklist: PathBuf,

    /// Local file with additional allow entries
    pub dynamic_whitelist: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            adlist_name: String::from("DNS-Filters"),
            adlist_urls: Vec::new(),
            whitelist_urls: Vec::new(),
            dynamic_blacklist: PathBuf::from("./lists/dynamic_blacklist.txt"),
            dynamic_whitelist: PathBuf::from("./lists/dynamic_whitelist.txt"),
        }
    }
}

impl Config {
    /// Load from a TOML file, falling back to defaults when it is absent,
    /// then append URLs from the ADLIST_URLS / WHITELIST_URLS environment
    /// variables (whitespace-separated).
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("parsing config file {}", path.display()))?
        } else {
            Self::default()
        };

        config.adlist_urls.extend(urls_from_env("ADLIST_URLS"));
        config.whitelist_urls.extend(urls_from_env("WHITELIST_URLS"));
        Ok(config)
    }
}

/// API credentials, supplied out-of-band through the environment
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Bearer token
    pub token: String,

    /// Account identifier
    pub account_id: String,
}

impl Credentials {
    /// Read CF_API_TOKEN and CF_IDENTIFIER; both are required
    pub fn from_env() -> Result<Self> {
        let token = non_empty_env("CF_API_TOKEN");
        let account_id = non_empty_env("CF_IDENTIFIER");
        match (token, account_id) {
            (Some(token), Some(account_id)) => Ok(Self { token, account_id }),
            _ => bail!("missing Cloudflare credentials: set CF_API_TOKEN and CF_IDENTIFIER"),
        }
    }
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn urls_from_env(var: &str) -> Vec<String> {
    std::env::var(var)
        .unwrap_or_default()
        .split_whitespace()
        .map(String::from)
        .collect()
}
