// src/bulletin/source.rs
use anyhow::{Context, Result};
use metrics::counter;

use crate::bulletin::types::BulletinSource;

/// HTTP source for the live observatory feed.
///
/// Fetches raw bytes, not text: the body is windows-1254 and must go
/// through [`crate::bulletin::decode`], so reqwest's own charset
/// handling is bypassed on purpose.
pub struct KandilliHttpSource {
    url: String,
    client: reqwest::Client,
}

impl KandilliHttpSource {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait::async_trait]
impl BulletinSource for KandilliHttpSource {
    async fn fetch_raw(&self) -> Result<Vec<u8>> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .with_context(|| format!("GET {}", self.url))?;

        let resp = resp.error_for_status().inspect_err(|e| {
            tracing::warn!(error = ?e, "bulletin upstream returned error status");
            counter!("bulletin_fetch_errors_total").increment(1);
        })?;

        let bytes = resp.bytes().await.context("reading bulletin body")?;
        Ok(bytes.to_vec())
    }

    fn name(&self) -> &'static str {
        "Kandilli"
    }
}
