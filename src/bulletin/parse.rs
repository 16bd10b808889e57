// src/bulletin/parse.rs
//
// Line-oriented parser for the extracted bulletin text. Example line:
//
// 2023.12.24 00:23:43  37.0703   27.6147      8.3  -.- 2.3  -.- BODRUM KORFEZI (AKDENIZ) İlksel
//
// Tokens (0-indexed, split on whitespace runs): 0 date, 1 time, 2 latitude,
// 3 longitude, 4 depth, 6 magnitude (ML column), 8.. location words.

use metrics::{counter, histogram};

use crate::bulletin::types::{EarthquakeRecord, LineOutcome, SkipReason};

/// Header markers, matched as substrings. Everything before the line that
/// contains all four is column layout, not data.
const HEADER_MARKERS: [&str; 4] = ["Tarih", "Saat", "Enlem", "Boylam"];

/// Solution-quality qualifiers; the location label stops at the first one.
const QUALITY_MARKERS: [&str; 2] = ["İlksel", "REVIZE"];

/// Data lines must be strictly longer than this, in characters, after
/// trimming.
const MIN_LINE_LEN: usize = 10;

/// A full record needs at least date, time, four numeric columns and one
/// location word: tokens 0..=8.
const MIN_TOKENS: usize = 9;

/// True for the column-header line that switches the parser into data mode.
fn is_header_line(line: &str) -> bool {
    HEADER_MARKERS.iter().all(|m| line.contains(m))
}

/// Parse the whole extracted bulletin text into records, preserving the
/// order the upstream publishes (most-recent-first). Malformed lines are
/// logged and dropped; they never abort the batch.
pub fn parse_bulletin(text: &str) -> Vec<EarthquakeRecord> {
    let t0 = std::time::Instant::now();

    let mut records = Vec::new();
    let mut in_data = false;

    for raw in text.lines() {
        let line = raw.trim();

        if !in_data {
            if is_header_line(line) {
                in_data = true;
            }
            continue;
        }

        match parse_line(line) {
            LineOutcome::Record(rec) => records.push(rec),
            LineOutcome::Skip(SkipReason::TooShort) => {} // blank/filler, not worth a log
            LineOutcome::Skip(reason) => {
                // the dashed column-separator row under the header is
                // layout, not malformed data
                if !is_separator_line(line) {
                    tracing::debug!(?reason, line, "bulletin line skipped");
                    counter!("bulletin_lines_skipped_total").increment(1);
                }
            }
        }
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("bulletin_parse_ms").record(ms);
    counter!("bulletin_records_parsed_total").increment(records.len() as u64);

    records
}

/// True for rows made only of dashes and whitespace.
fn is_separator_line(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c == '-' || c.is_whitespace())
}

/// Parse one trimmed line that appears after the header.
pub fn parse_line(line: &str) -> LineOutcome {
    if line.chars().count() <= MIN_LINE_LEN {
        return LineOutcome::Skip(SkipReason::TooShort);
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < MIN_TOKENS {
        return LineOutcome::Skip(SkipReason::TooFewTokens { got: parts.len() });
    }

    let date = parts[0]; // YYYY.MM.DD
    let time = parts[1]; // HH:MM:SS

    let Some(latitude) = finite(parts[2]) else {
        return LineOutcome::Skip(SkipReason::NonNumeric { field: "latitude" });
    };
    let Some(longitude) = finite(parts[3]) else {
        return LineOutcome::Skip(SkipReason::NonNumeric { field: "longitude" });
    };
    let Some(magnitude) = finite(parts[6]) else {
        return LineOutcome::Skip(SkipReason::NonNumeric { field: "magnitude" });
    };
    // The depth column prints "-.-" placeholders; coerce instead of dropping.
    let depth_km = finite(parts[4]).unwrap_or(0.0);

    let location = parts[8..]
        .iter()
        .take_while(|tok| !QUALITY_MARKERS.contains(*tok))
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    LineOutcome::Record(EarthquakeRecord {
        id: derive_id(date, time),
        occurred_at: occurred_at(date, time),
        location,
        magnitude,
        depth_km,
        latitude,
        longitude,
    })
}

/// Id is a pure function of the source line's date and time tokens, so
/// re-parsing the same bulletin yields the same ids.
fn derive_id(date: &str, time: &str) -> String {
    format!("eq_{}_{}", date.replace('.', ""), time.replace(':', ""))
}

/// `2023.12.24` + `00:23:43` -> `2023-12-24T00:23:43` (local Turkey time,
/// deliberately without an offset; the bulletin carries none).
fn occurred_at(date: &str, time: &str) -> String {
    match date.split('.').collect::<Vec<_>>()[..] {
        [y, m, d] => format!("{y}-{m}-{d}T{time}"),
        _ => format!("{}T{}", date.replace('.', "-"), time),
    }
}

fn finite(tok: &str) -> Option<f64> {
    tok.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_requires_all_four_markers() {
        assert!(is_header_line("Tarih      Saat      Enlem(N)  Boylam(E) Derinlik(km)"));
        assert!(!is_header_line("Tarih      Saat      Enlem(N)"));
    }

    #[test]
    fn depth_placeholder_coerces_to_zero() {
        let line = "2023.12.24 01:02:03  38.1000   27.2000   -.-   -.- 1.8  -.- IZMIR KORFEZI (EGE DENIZI) İlksel";
        match parse_line(line) {
            LineOutcome::Record(r) => assert_eq!(r.depth_km, 0.0),
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn nan_token_is_not_a_valid_magnitude() {
        let line = "2023.12.24 01:02:03  38.1000   27.2000   7.0   -.- NaN  -.- IZMIR KORFEZI (EGE DENIZI)";
        assert_eq!(
            parse_line(line),
            LineOutcome::Skip(SkipReason::NonNumeric { field: "magnitude" })
        );
    }

    #[test]
    fn malformed_date_degrades_instead_of_panicking() {
        assert_eq!(occurred_at("2023.12", "01:02:03"), "2023-12T01:02:03");
    }

    #[test]
    fn length_gate_counts_characters_not_bytes() {
        // ten characters, twenty bytes; the gate must see ten
        let line = "ığüşöçİĞÜŞ";
        assert_eq!(line.len(), 20);
        assert_eq!(parse_line(line), LineOutcome::Skip(SkipReason::TooShort));
    }

    #[test]
    fn separator_row_is_layout_not_malformed_data() {
        let sep = "---------- --------  --------  -------   ----------    ------------    --------------";
        assert!(is_separator_line(sep));
        assert!(matches!(parse_line(sep), LineOutcome::Skip(_)));

        // a genuinely malformed data line is not a separator
        assert!(!is_separator_line("2023.12.24 00:23:43  kuzey   27.6147  8.3"));
        assert!(!is_separator_line(""));
    }
}
