//! In-memory cache for the most recently parsed bulletin.
//!
//! The whole record set is versioned as one unit: writes replace the
//! snapshot atomically, reads hand out the current snapshot. No request
//! ever observes a half-updated set.

use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::bulletin::EarthquakeRecord;

/// Time source, injected so freshness and fallback are testable without
/// wall-clock waits.
pub trait Clock: Send + Sync + 'static {
    fn now_unix_ms(&self) -> u64;
}

/// Wall-clock implementation used in production.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// The record set from the last successful fetch plus its capture time.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub records: Arc<Vec<EarthquakeRecord>>,
    pub captured_at_ms: u64,
}

/// Owner of the shared snapshot. Starts empty at epoch 0.
pub struct BulletinCache {
    inner: RwLock<Snapshot>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl BulletinCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(Snapshot {
                records: Arc::new(Vec::new()),
                captured_at_ms: 0,
            }),
            ttl,
            clock,
        }
    }

    /// True iff the snapshot is non-empty and younger than the TTL.
    pub fn is_fresh(&self) -> bool {
        let snap = self.inner.read().expect("cache lock poisoned");
        if snap.records.is_empty() {
            return false;
        }
        let age = self.clock.now_unix_ms().saturating_sub(snap.captured_at_ms);
        age < self.ttl.as_millis() as u64
    }

    /// Current snapshot, fresh or not; the caller decides whether to
    /// trust it.
    pub fn read(&self) -> Snapshot {
        self.inner.read().expect("cache lock poisoned").clone()
    }

    /// Replace the snapshot wholesale, stamping it with the current time.
    /// Returns the stored record set for handoff to the response path.
    pub fn write(&self, records: Vec<EarthquakeRecord>) -> Arc<Vec<EarthquakeRecord>> {
        let records = Arc::new(records);
        let mut snap = self.inner.write().expect("cache lock poisoned");
        *snap = Snapshot {
            records: Arc::clone(&records),
            captured_at_ms: self.clock.now_unix_ms(),
        };
        records
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
