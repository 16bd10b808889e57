// src/bulletin/types.rs
use anyhow::Result;

/// One observed seismic event, as published by the Kandilli bulletin.
///
/// Serialized field names follow the wire contract the frontend already
/// consumes (`date`, `title`, `mag`, ...), the Rust names say what the
/// fields actually are.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EarthquakeRecord {
    /// Deterministic id derived from the bulletin date + time tokens.
    pub id: String,
    /// `YYYY-MM-DDTHH:MM:SS`, local Turkey time, no offset attached.
    #[serde(rename = "date")]
    pub occurred_at: String,
    /// Free-text location, quality markers stripped.
    #[serde(rename = "title")]
    pub location: String,
    #[serde(rename = "mag")]
    pub magnitude: f64,
    /// Depth in km; 0 when the bulletin prints a placeholder.
    #[serde(rename = "depth")]
    pub depth_km: f64,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

/// Why a data line produced no record. These are anticipated conditions,
/// not errors; the batch always continues with the next line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Trimmed line no longer than the minimum data-line length.
    TooShort,
    /// Fewer whitespace-delimited tokens than a full record needs.
    TooFewTokens { got: usize },
    /// Latitude, longitude or magnitude failed to parse as a finite number.
    NonNumeric { field: &'static str },
}

/// Outcome of parsing a single line once the header has been seen.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Record(EarthquakeRecord),
    Skip(SkipReason),
}

/// Something that can hand us the raw bulletin bytes. The production
/// implementation is HTTP against the observatory; tests substitute
/// in-memory fixtures.
#[async_trait::async_trait]
pub trait BulletinSource: Send + Sync {
    async fn fetch_raw(&self) -> Result<Vec<u8>>;
    fn name(&self) -> &'static str;
}
