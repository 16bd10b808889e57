// tests/fetch_fallback.rs
//
// Orchestrator policy: fresh-cache short circuit, forced refresh, and
// stale-cache fallback when the upstream dies. Upstream is a stub
// BulletinSource; time is a manual clock.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use kandilli_proxy::cache::{BulletinCache, Clock};
use kandilli_proxy::fetch::{BulletinService, Provenance};
use kandilli_proxy::BulletinSource;

const LST2_HTML: &str = include_str!("fixtures/lst2.html");
const TTL: Duration = Duration::from_secs(300);

struct ManualClock(AtomicU64);

impl Clock for ManualClock {
    fn now_unix_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Upstream stub: serves the fixture while `up`, then hard-fails.
struct StubSource {
    up: Mutex<bool>,
    calls: AtomicUsize,
}

impl StubSource {
    fn new() -> Self {
        Self {
            up: Mutex::new(true),
            calls: AtomicUsize::new(0),
        }
    }

    fn go_down(&self) {
        *self.up.lock().expect("stub lock") = false;
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl BulletinSource for StubSource {
    async fn fetch_raw(&self) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !*self.up.lock().expect("stub lock") {
            return Err(anyhow!("connection refused"));
        }
        let (raw, _, _) = encoding_rs::WINDOWS_1254.encode(LST2_HTML);
        Ok(raw.to_vec())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn service_with_clock(clock: Arc<ManualClock>) -> (Arc<StubSource>, BulletinService) {
    let source = Arc::new(StubSource::new());
    let cache = BulletinCache::with_clock(TTL, clock);
    let source_dyn: Arc<dyn BulletinSource> = source.clone();
    let service = BulletinService::new(source_dyn, cache);
    (source, service)
}

#[tokio::test]
async fn first_call_fetches_second_call_hits_cache() {
    let clock = Arc::new(ManualClock(AtomicU64::new(1_000_000)));
    let (source, service) = service_with_clock(clock);

    let first = service.latest(false).await.expect("first fetch");
    assert_eq!(first.source, Provenance::Api);
    assert_eq!(first.records.len(), 3);
    assert_eq!(source.calls(), 1);

    let second = service.latest(false).await.expect("cached read");
    assert_eq!(second.source, Provenance::Cache);
    assert_eq!(second.records.len(), 3);
    // no redundant upstream round trip within the freshness window
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn forced_refresh_bypasses_a_fresh_cache() {
    let clock = Arc::new(ManualClock(AtomicU64::new(1_000_000)));
    let (source, service) = service_with_clock(clock);

    service.latest(false).await.expect("prime cache");
    let forced = service.latest(true).await.expect("forced refresh");

    assert_eq!(forced.source, Provenance::Api);
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn ttl_expiry_triggers_a_refetch() {
    let clock = Arc::new(ManualClock(AtomicU64::new(1_000_000)));
    let (source, service) = service_with_clock(Arc::clone(&clock));

    service.latest(false).await.expect("prime cache");
    clock.0.fetch_add(TTL.as_millis() as u64, Ordering::SeqCst);

    let out = service.latest(false).await.expect("refetch");
    assert_eq!(out.source, Provenance::Api);
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn upstream_failure_falls_back_to_the_stale_snapshot() {
    let clock = Arc::new(ManualClock(AtomicU64::new(1_000_000)));
    let (source, service) = service_with_clock(Arc::clone(&clock));

    let primed = service.latest(false).await.expect("prime cache");
    let count_before = primed.records.len();

    source.go_down();
    clock.0.fetch_add(TTL.as_millis() as u64, Ordering::SeqCst);

    let fallback = service.latest(false).await.expect("stale fallback");
    assert_eq!(fallback.source, Provenance::CacheFallback);
    assert_eq!(fallback.records.len(), count_before);
}

#[tokio::test]
async fn upstream_failure_with_empty_cache_surfaces_the_error() {
    let clock = Arc::new(ManualClock(AtomicU64::new(1_000_000)));
    let (source, service) = service_with_clock(clock);

    source.go_down();
    let err = service.latest(false).await.expect_err("no cache to fall back to");
    assert!(err.to_string().contains("fetching bulletin"), "{err:#}");
}
