//! Unpacks a packed format family into one record per stream.

use std::borrow::Cow;

use crate::error::{Result, StreamError};

use super::{FormatValue, Manifest, RawManifestEntry};

/// Returns a copy of `manifest` with family `key` unpacked into ordered records.
///
/// A family that is already unpacked is returned as is.
pub fn apply_descrambler(manifest: &Manifest, key: &str) -> Result<Manifest> {
    let encoded = match manifest.formats.get(key) {
        Some(FormatValue::Encoded(s)) => s,
        Some(FormatValue::Descrambled(_)) => {
            tracing::debug!(key, "format family already descrambled");
            return Ok(manifest.clone());
        }
        None => return Err(StreamError::MissingFormat(key.to_string())),
    };

    let entries = descramble(key, encoded)?;
    tracing::debug!(key, streams = entries.len(), "applied descrambler");

    let mut out = manifest.clone();
    out.formats
        .insert(key.to_string(), FormatValue::Descrambled(entries));
    Ok(out)
}

/// Splits `encoded` on commas and decodes each `k=v&k=v` segment.
pub fn descramble(key: &str, encoded: &str) -> Result<Vec<RawManifestEntry>> {
    encoded
        .split(',')
        .enumerate()
        .map(|(segment, raw)| {
            parse_segment(raw).map_err(|reason| StreamError::Descramble {
                key: key.to_string(),
                segment,
                reason,
            })
        })
        .collect()
}

fn parse_segment(segment: &str) -> std::result::Result<RawManifestEntry, String> {
    let mut entry = RawManifestEntry::default();
    for pair in segment.split('&') {
        // Pairs without a value carry nothing.
        let Some((k, v)) = pair.split_once('=').filter(|(_, v)| !v.is_empty()) else {
            continue;
        };
        let key = decode_component(k)?;
        // Values are double-encoded (urls carry their own escaped query).
        let value = unquote(&decode_component(v)?)?;
        entry.insert(key, value);
    }
    Ok(entry)
}

/// Query-string decoding: `+` is a space, every `%` must start a valid escape.
fn decode_component(raw: &str) -> std::result::Result<String, String> {
    let bytes = raw.as_bytes();
    let mut pos = 0;
    while let Some(offset) = bytes[pos..].iter().position(|&b| b == b'%') {
        let at = pos + offset;
        let valid = bytes
            .get(at + 1..at + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(format!("malformed percent escape at byte {at} of {raw:?}"));
        }
        pos = at + 3;
    }
    unquote(&raw.replace('+', " "))
}

fn unquote(raw: &str) -> std::result::Result<String, String> {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .map_err(|e| format!("{e} in {raw:?}"))
}
