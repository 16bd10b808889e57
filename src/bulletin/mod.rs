// src/bulletin/mod.rs
//
// Everything between raw upstream bytes and structured records:
// decode (windows-1254) -> extract (<pre> text) -> parse (record lines).

pub mod decode;
pub mod extract;
pub mod parse;
pub mod source;
pub mod types;

pub use types::{BulletinSource, EarthquakeRecord, LineOutcome, SkipReason};

/// Run the full text pipeline on raw upstream bytes.
pub fn records_from_raw(raw: &[u8]) -> Vec<EarthquakeRecord> {
    let text = decode::decode_bulletin(raw);
    let block = extract::preformatted_text(&text);
    parse::parse_bulletin(&block)
}
