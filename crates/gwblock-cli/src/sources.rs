//! Raw source loading: remote list downloads plus local dynamic files.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Downloads block/allow sources and assembles them into one corpus
pub struct SourceLoader {
    http: reqwest::Client,
}

impl SourceLoader {
    /// Create a loader with a plain HTTP client
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(format!("gwblock/{}", env!("CARGO_PKG_VERSION")))
                .gzip(true)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    /// Concatenate all source URLs plus the dynamic addendum.
    ///
    /// The dynamic text comes from the named environment variable when set,
    /// otherwise from the local file; a missing file is treated as empty.
    pub async fn corpus(
        &self,
        urls: &[String],
        dynamic_path: &Path,
        dynamic_env: &str,
    ) -> Result<String> {
        let mut corpus = String::new();

        for url in urls {
            corpus.push_str(&self.download(url).await?);
            corpus.push('\n');
        }

        corpus.push_str(&dynamic_text(dynamic_path, dynamic_env)?);
        Ok(corpus)
    }

    /// Download one source. A non-success status is logged but the body is
    /// still used, matching how tolerant blocklist consumers behave.
    async fn download(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("downloading {url}"))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "source download returned non-success status");
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("reading body of {url}"))?;
        info!(%url, bytes = text.len(), "downloaded source");
        Ok(text)
    }
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn dynamic_text(path: &Path, env_var: &str) -> Result<String> {
    if let Ok(inline) = std::env::var(env_var) {
        if !inline.trim().is_empty() {
            return Ok(inline);
        }
    }

    if path.exists() {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading dynamic list {}", path.display()))
    } else {
        Ok(String::new())
    }
}
