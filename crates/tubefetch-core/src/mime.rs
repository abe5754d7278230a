//! Parsing of the `type` field: `video/webm; codecs="vp8, vorbis"`.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, StreamError};

static MIME_CODECS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(\w+/[\w.+-]+)\s*;\s*codecs="([a-zA-Z0-9.,\s-]*)""#)
        .expect("mime/codecs pattern is valid")
});

/// Splits the `type` field into the mime type and its ordered codec list.
pub fn mime_type_codec(value: &str) -> Result<(String, Vec<String>)> {
    let caps = MIME_CODECS
        .captures(value)
        .ok_or_else(|| StreamError::InvalidMimeType(value.to_string()))?;
    let codecs = caps[2]
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    Ok((caps[1].to_string(), codecs))
}

/// `"video/webm"` → `("video", "webm")`.
pub fn split_mime_type(mime_type: &str) -> Result<(&str, &str)> {
    mime_type
        .split_once('/')
        .filter(|(major, sub)| !major.is_empty() && !sub.is_empty())
        .ok_or_else(|| StreamError::InvalidMimeType(mime_type.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progressive_type() {
        let (mime, codecs) = mime_type_codec(r#"video/webm; codecs="vp8, vorbis""#).unwrap();
        assert_eq!(mime, "video/webm");
        assert_eq!(codecs, ["vp8", "vorbis"]);
    }

    #[test]
    fn single_codec() {
        let (mime, codecs) = mime_type_codec(r#"audio/mp4; codecs="mp4a.40.2""#).unwrap();
        assert_eq!(mime, "audio/mp4");
        assert_eq!(codecs, ["mp4a.40.2"]);
    }

    #[test]
    fn missing_codecs_is_invalid() {
        assert!(matches!(
            mime_type_codec("video/mp4"),
            Err(StreamError::InvalidMimeType(_))
        ));
    }

    #[test]
    fn split_major_and_subtype() {
        assert_eq!(split_mime_type("video/3gpp").unwrap(), ("video", "3gpp"));
        assert!(split_mime_type("video").is_err());
    }
}
