// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod bulletin;
pub mod cache;
pub mod config;
pub mod fetch;
pub mod metrics;
pub mod realtime;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::bulletin::{BulletinSource, EarthquakeRecord};
pub use crate::cache::{BulletinCache, Clock, SystemClock};
pub use crate::fetch::{BulletinService, FetchOutcome, Provenance};
