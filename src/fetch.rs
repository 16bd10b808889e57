//! Fetch orchestration: cache short-circuit, upstream refresh, and the
//! stale-cache fallback policy.

use std::sync::Arc;

use anyhow::{Context, Result};
use metrics::counter;

use crate::bulletin::{self, BulletinSource, EarthquakeRecord};
use crate::cache::BulletinCache;

/// Where a served record set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Cache,
    Api,
    CacheFallback,
}

/// A record set plus its provenance tag.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub records: Arc<Vec<EarthquakeRecord>>,
    pub source: Provenance,
}

/// Coordinates fetch -> decode -> extract -> parse -> cache.
///
/// Concurrent callers that both miss the cache each issue their own
/// upstream fetch; they converge on the same cache write, so this is
/// redundant work, not a correctness problem.
pub struct BulletinService {
    source: Arc<dyn BulletinSource>,
    cache: BulletinCache,
}

impl BulletinService {
    pub fn new(source: Arc<dyn BulletinSource>, cache: BulletinCache) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &BulletinCache {
        &self.cache
    }

    /// Primary retrieval operation.
    ///
    /// Serves the cache while it is fresh (unless `force_refresh`),
    /// otherwise refreshes from upstream. On upstream failure a non-empty
    /// stale snapshot is served tagged [`Provenance::CacheFallback`];
    /// only an empty cache lets the error surface to the caller.
    pub async fn latest(&self, force_refresh: bool) -> Result<FetchOutcome> {
        crate::metrics::ensure_described();

        if !force_refresh && self.cache.is_fresh() {
            tracing::debug!("serving fresh cached bulletin");
            counter!("proxy_cache_hits_total").increment(1);
            return Ok(FetchOutcome {
                records: self.cache.read().records,
                source: Provenance::Cache,
            });
        }

        match self.refresh().await {
            Ok(records) => Ok(FetchOutcome {
                records,
                source: Provenance::Api,
            }),
            Err(err) => {
                let snap = self.cache.read();
                if snap.records.is_empty() {
                    Err(err)
                } else {
                    tracing::warn!(error = ?err, "upstream failed, serving stale cache");
                    counter!("proxy_cache_fallback_total").increment(1);
                    Ok(FetchOutcome {
                        records: snap.records,
                        source: Provenance::CacheFallback,
                    })
                }
            }
        }
    }

    /// One upstream round trip through the text pipeline, ending in a
    /// whole-snapshot cache write.
    async fn refresh(&self) -> Result<Arc<Vec<EarthquakeRecord>>> {
        let raw = self
            .source
            .fetch_raw()
            .await
            .with_context(|| format!("fetching bulletin from {}", self.source.name()))?;

        let records = bulletin::records_from_raw(&raw);
        tracing::info!(count = records.len(), "bulletin refreshed from upstream");

        Ok(self.cache.write(records))
    }
}
