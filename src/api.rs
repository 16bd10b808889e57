use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::sse::{KeepAlive, Sse},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use metrics::counter;
use tower_http::cors::CorsLayer;

use crate::bulletin::EarthquakeRecord;
use crate::fetch::{BulletinService, Provenance};
use crate::realtime;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<BulletinService>,
    pub heartbeat_period: Duration,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/proxy", get(proxy))
        .route("/api/realtime", get(realtime_feed))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct ProxyResponse {
    success: bool,
    count: usize,
    earthquakes: Vec<EarthquakeRecord>,
    source: Provenance,
}

#[derive(serde::Serialize)]
struct ProxyError {
    success: bool,
    error: String,
}

/// GET /api/proxy[?refresh=true] — the cached/forwarded bulletin as JSON.
async fn proxy(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    counter!("proxy_requests_total").increment(1);

    let force_refresh = q
        .get("refresh")
        .is_some_and(|v| v == "true" || v == "1");

    match state.service.latest(force_refresh).await {
        Ok(out) => (
            StatusCode::OK,
            Json(ProxyResponse {
                success: true,
                count: out.records.len(),
                earthquakes: (*out.records).clone(),
                source: out.source,
            }),
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ProxyError {
                success: false,
                // The frontend displays this string as-is, so keep the
                // upstream cause in it.
                error: format!("Koeri Sitesine Ulaşılamadı : {err:#}"),
            }),
        )
            .into_response(),
    }
}

/// GET /api/realtime — SSE heartbeat stream, one timer per connection.
async fn realtime_feed(State(state): State<AppState>) -> impl IntoResponse {
    tracing::debug!("realtime client connected");
    Sse::new(realtime::heartbeat_stream(state.heartbeat_period))
        .keep_alive(KeepAlive::default())
}
