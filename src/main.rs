//! Kandilli Bulletin Proxy — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kandilli_proxy::api::{self, AppState};
use kandilli_proxy::bulletin::source::KandilliHttpSource;
use kandilli_proxy::cache::BulletinCache;
use kandilli_proxy::config::Config;
use kandilli_proxy::fetch::BulletinService;
use kandilli_proxy::metrics::Metrics;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kandilli_proxy=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn build_client(config: &Config) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.http_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("building http client")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op where no file exists.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = Config::load().context("loading configuration")?;
    let metrics = Metrics::init(config.cache_ttl_secs);

    let client = build_client(&config)?;
    let source = KandilliHttpSource::new(client, config.bulletin_url.clone());
    let cache = BulletinCache::new(config.cache_ttl());
    let service = Arc::new(BulletinService::new(Arc::new(source), cache));

    let state = AppState {
        service,
        heartbeat_period: config.heartbeat_interval(),
    };
    let app = api::router(state).merge(metrics.router());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, url = %config.bulletin_url, "kandilli proxy listening");

    axum::serve(listener, app).await.context("serving")?;
    Ok(())
}
