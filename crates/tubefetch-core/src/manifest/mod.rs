//! Stream manifest model and the transformations applied to it.
//!
//! A manifest arrives from the extractor with each format family packed into a
//! single query-string-like value. [`apply_descrambler`] unpacks one family
//! into ordered records and [`apply_signature`] resolves scrambled signatures.
//! Both return a new manifest and leave their input untouched.

mod descramble;
mod signature;

use std::collections::BTreeMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StreamError};

pub use descramble::{apply_descrambler, descramble};
pub use signature::{apply_signature, is_signed, SignatureSolver};

/// Format family holding progressive (audio+video) streams.
pub const PROGRESSIVE_FORMATS: &str = "url_encoded_fmt_stream_map";
/// Format family holding adaptive (audio-only or video-only) streams.
pub const ADAPTIVE_FORMATS: &str = "adaptive_fmts";

/// Title used when neither the manifest nor the player response has one.
pub const UNKNOWN_TITLE: &str = "Unknown YouTube Video Title";

/// One stream's attributes (`itag`, `url`, `type`, `s`, `quality`, ...),
/// kept in the order they appear in the segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawManifestEntry {
    fields: IndexMap<String, String>,
}

impl RawManifestEntry {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Sets `key`. A repeated key keeps its first position and takes the
/// last value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawManifestEntry
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entry = RawManifestEntry::default();
        for (k, v) in iter {
            entry.insert(k, v);
        }
        entry
    }
}

/// Value of one format family: still packed, or unpacked into records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormatValue {
    Encoded(String),
    Descrambled(Vec<RawManifestEntry>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDetails {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResponse {
    #[serde(default, rename = "videoDetails")]
    pub video_details: Option<VideoDetails>,
}

/// Manifest-wide metadata shared by every stream of one video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub player_response: Option<PlayerResponse>,
}

impl VideoMetadata {
    /// Explicit title, else the player response title, else [`UNKNOWN_TITLE`].
    /// Empty strings count as missing.
    pub fn title(&self) -> &str {
        let nested = self
            .player_response
            .as_ref()
            .and_then(|p| p.video_details.as_ref())
            .and_then(|d| d.title.as_deref());
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(nested.filter(|t| !t.is_empty()))
            .unwrap_or(UNKNOWN_TITLE)
    }
}

/// Structured description of the selectable media streams for one video.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(flatten)]
    pub metadata: VideoMetadata,
    /// Format-family key to packed or unpacked stream records.
    #[serde(default)]
    pub formats: BTreeMap<String, FormatValue>,
    /// Platform player script, needed to resolve scrambled signatures.
    #[serde(default)]
    pub js: Option<String>,
}

impl Manifest {
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| StreamError::io(path, e))?;
        Self::from_json(&data)
    }

    /// Unpacked records of `key`, or an error if the family is missing or still encoded.
    pub fn entries(&self, key: &str) -> Result<&[RawManifestEntry]> {
        match self.formats.get(key) {
            Some(FormatValue::Descrambled(entries)) => Ok(entries),
            Some(FormatValue::Encoded(_)) => Err(StreamError::NotDescrambled(key.to_string())),
            None => Err(StreamError::MissingFormat(key.to_string())),
        }
    }
}
