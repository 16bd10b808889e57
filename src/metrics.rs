use axum::{routing::get, Router};
use metrics::{describe_counter, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "proxy_requests_total",
            "Requests handled by the /api/proxy endpoint."
        );
        describe_counter!(
            "proxy_cache_hits_total",
            "Proxy responses served from the fresh cache."
        );
        describe_counter!(
            "proxy_cache_fallback_total",
            "Proxy responses served from a stale cache after upstream failure."
        );
        describe_counter!(
            "bulletin_fetch_errors_total",
            "Upstream bulletin fetch failures (network or status)."
        );
        describe_counter!(
            "bulletin_records_parsed_total",
            "Records successfully parsed from bulletin lines."
        );
        describe_counter!(
            "bulletin_lines_skipped_total",
            "Bulletin data lines dropped as malformed."
        );
        describe_histogram!("bulletin_parse_ms", "Bulletin parse time in milliseconds.");
    });
}

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Initialize the Prometheus recorder and expose a static gauge for
    /// the cache TTL.
    pub fn init(ttl_secs: u64) -> Self {
        let builder = PrometheusBuilder::new();

        let handle = builder
            .install_recorder()
            .expect("prometheus: install recorder");

        ensure_described();
        gauge!("bulletin_cache_ttl_secs").set(ttl_secs as f64);

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}
