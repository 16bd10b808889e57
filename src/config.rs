//! Service configuration: env vars with defaults, optionally overlaid by
//! a TOML file.
//!
//! Resolution order for the file: `$KANDILLI_CONFIG_PATH`, then
//! `config/kandilli.toml`, then no file at all. Env vars win over the
//! file, the file wins over the built-in defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

const ENV_CONFIG_PATH: &str = "KANDILLI_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config/kandilli.toml";

/// Upstream bulletin URL (Kandilli Observatory, lst2.asp listing).
pub const DEFAULT_BULLETIN_URL: &str = "http://www.koeri.boun.edu.tr/scripts/lst2.asp";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub bulletin_url: String,
    /// Freshness window for the cached record set.
    pub cache_ttl_secs: u64,
    /// Interval between heartbeat frames on /api/realtime.
    pub heartbeat_secs: u64,
    /// Upstream request timeout; `None` keeps the client default.
    pub http_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            bulletin_url: DEFAULT_BULLETIN_URL.to_string(),
            cache_ttl_secs: 5 * 60,
            heartbeat_secs: 30,
            http_timeout_secs: None,
        }
    }
}

/// Partial shape of the optional TOML file; every key may be omitted.
#[derive(Debug, Default, serde::Deserialize)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    bulletin_url: Option<String>,
    cache_ttl_secs: Option<u64>,
    heartbeat_secs: Option<u64>,
    http_timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from the default file locations and the
    /// environment.
    pub fn load() -> Result<Self> {
        let file = load_file_default()?;
        Ok(Self::from_parts(file, |k| std::env::var(k).ok()))
    }

    /// Merge defaults <- file <- env. `env` is injected for tests.
    fn from_parts(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();

        let parse_u64 = |k: &str| env(k).and_then(|v| v.parse::<u64>().ok());

        Self {
            host: env("HOST").or(file.host).unwrap_or(d.host),
            port: env("PORT")
                .and_then(|v| v.parse().ok())
                .or(file.port)
                .unwrap_or(d.port),
            bulletin_url: env("KANDILLI_URL")
                .or(file.bulletin_url)
                .unwrap_or(d.bulletin_url),
            cache_ttl_secs: parse_u64("CACHE_TTL_SECS")
                .or(file.cache_ttl_secs)
                .unwrap_or(d.cache_ttl_secs),
            heartbeat_secs: parse_u64("HEARTBEAT_SECS")
                .or(file.heartbeat_secs)
                .unwrap_or(d.heartbeat_secs),
            http_timeout_secs: parse_u64("HTTP_TIMEOUT_SECS").or(file.http_timeout_secs),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_secs)
    }
}

fn load_file_default() -> Result<FileConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_file(&pb);
        }
        return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
    }
    let default = PathBuf::from(DEFAULT_CONFIG_PATH);
    if default.exists() {
        return load_file(&default);
    }
    Ok(FileConfig::default())
}

fn load_file(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
}
