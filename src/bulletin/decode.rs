// src/bulletin/decode.rs
//
// The observatory serves the bulletin as windows-1254 (legacy Turkish
// single-byte charset), not UTF-8. Every byte value has a defined mapping,
// so decoding is total and cannot fail.

use encoding_rs::WINDOWS_1254;

/// Decode raw bulletin bytes into correctly accented text.
pub fn decode_bulletin(raw: &[u8]) -> String {
    let (text, _, _) = WINDOWS_1254.decode(raw);
    text.into_owned()
}
