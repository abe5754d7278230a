//! Error types shared by the manifest, stream and download layers.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T, E = StreamError> = std::result::Result<T, E>;

/// Failure reported by a [`SignatureSolver`](crate::manifest::SignatureSolver).
#[derive(Debug, Error)]
pub enum SolverError {
    /// The entry carries neither a signed url nor a scrambled token.
    #[error("entry has no scrambled signature token")]
    MissingToken,
    /// The transform function could not be located in the platform script.
    #[error("signature transform not found: {0}")]
    TransformNotFound(String),
    /// The transform was found but applying it failed.
    #[error("signature transform failed: {0}")]
    Failed(String),
}

/// Everything that can go wrong between a raw manifest and a file on disk.
#[derive(Debug, Error)]
pub enum StreamError {
    /// A manifest segment could not be percent-decoded.
    #[error("malformed segment {segment} in `{key}`: {reason}")]
    Descramble {
        key: String,
        segment: usize,
        reason: String,
    },

    #[error("format family `{0}` not present in manifest")]
    MissingFormat(String),

    #[error("format family `{0}` has not been descrambled")]
    NotDescrambled(String),

    /// Signature resolution failed for one entry; `itag` identifies it.
    #[error("signature resolution failed for itag={itag}")]
    Signature {
        itag: String,
        #[source]
        source: SolverError,
    },

    /// The itag has no entry in the static profile table.
    #[error("unknown format: itag {0} has no profile")]
    UnknownFormat(u32),

    #[error("stream record is missing `{0}`")]
    MissingField(&'static str),

    #[error("invalid `{field}` value: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("invalid mime type: {0:?}")]
    InvalidMimeType(String),

    #[error("expected 1 or 2 codecs, found {0}")]
    InvalidCodecs(usize),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("transfer failed: {0}")]
    Transfer(String),

    #[error(transparent)]
    Curl(#[from] curl::Error),

    #[error("no content-length reported for {0}")]
    MissingContentLength(String),

    /// A user-registered progress or completion callback failed.
    #[error("callback failed: {0:#}")]
    Callback(anyhow::Error),

    #[error("invalid manifest json: {0}")]
    Json(#[from] serde_json::Error),
}

impl StreamError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        StreamError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
