//! Stream descriptor: one downloadable media stream and its derived attributes.
//!
//! A stream is video+audio (progressive) or a single track (adaptive, DASH).

mod query;

use std::cell::OnceCell;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, StreamError};
use crate::fs_util::compose_filename;
use crate::itags::{get_format_profile, FormatProfile};
use crate::manifest::{RawManifestEntry, VideoMetadata};
use crate::mime::{mime_type_codec, split_mime_type};
use crate::observer::StreamObservers;
use crate::transport::Transport;

pub use query::{build_streams, StreamList};

/// Immutable descriptor of one stream; only the filesize memo is filled lazily.
///
/// The memo is a `OnceCell`, so a `Stream` is `Send` but not `Sync`: sharing
/// one descriptor between concurrently running downloads is not supported.
pub struct Stream {
    url: String,
    itag: u32,
    mime_type: String,
    major_type: String,
    subtype: String,
    codecs: Vec<String>,
    video_codec: Option<String>,
    audio_codec: Option<String>,
    profile: FormatProfile,
    title: String,
    observers: Arc<StreamObservers>,
    filesize: OnceCell<u64>,
}

impl Stream {
    /// Builds a descriptor from one signed record.
    ///
    /// Fails on a missing `url`/`itag`/`type`, a malformed `type`, a codec
    /// count other than 1 or 2, or an itag absent from the profile table.
    pub fn new(
        entry: &RawManifestEntry,
        metadata: &VideoMetadata,
        observers: Arc<StreamObservers>,
    ) -> Result<Self> {
        let url = entry.get("url").ok_or(StreamError::MissingField("url"))?;
        let raw_itag = entry.get("itag").ok_or(StreamError::MissingField("itag"))?;
        let itag = raw_itag
            .trim()
            .parse::<u32>()
            .map_err(|_| StreamError::InvalidField {
                field: "itag",
                value: raw_itag.to_string(),
            })?;
        let raw_type = entry.get("type").ok_or(StreamError::MissingField("type"))?;

        let (mime_type, codecs) = mime_type_codec(raw_type)?;
        if !(1..=2).contains(&codecs.len()) {
            return Err(StreamError::InvalidCodecs(codecs.len()));
        }
        let (major_type, subtype) = split_mime_type(&mime_type)?;
        let (major_type, subtype) = (major_type.to_string(), subtype.to_string());
        let profile = get_format_profile(itag)?;

        let mut stream = Stream {
            url: url.to_string(),
            itag,
            mime_type,
            major_type,
            subtype,
            codecs,
            video_codec: None,
            audio_codec: None,
            profile,
            title: metadata.title().to_string(),
            observers,
            filesize: OnceCell::new(),
        };
        let (video, audio) = stream.parse_codecs();
        stream.video_codec = video;
        stream.audio_codec = audio;
        Ok(stream)
    }

    /// Maps the codec list onto (video, audio) by track layout.
    fn parse_codecs(&self) -> (Option<String>, Option<String>) {
        if !self.is_adaptive() {
            (self.codecs.first().cloned(), self.codecs.get(1).cloned())
        } else if self.includes_video_track() {
            (self.codecs.first().cloned(), None)
        } else if self.includes_audio_track() {
            (None, self.codecs.first().cloned())
        } else {
            (None, None)
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn itag(&self) -> u32 {
        self.itag
    }

    /// e.g. `"video/webm"`.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Major type: `"video"` or `"audio"`.
    pub fn major_type(&self) -> &str {
        &self.major_type
    }

    /// e.g. `"webm"`; also the file extension.
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    pub fn codecs(&self) -> &[String] {
        &self.codecs
    }

    pub fn video_codec(&self) -> Option<&str> {
        self.video_codec.as_deref()
    }

    pub fn audio_codec(&self) -> Option<&str> {
        self.audio_codec.as_deref()
    }

    /// Single-track (DASH) stream. The platform lists one codec per track, so
    /// an odd codec count means one track.
    pub fn is_adaptive(&self) -> bool {
        self.codecs.len() % 2 == 1
    }

    pub fn is_progressive(&self) -> bool {
        !self.is_adaptive()
    }

    pub fn includes_audio_track(&self) -> bool {
        self.is_progressive() || self.major_type == "audio"
    }

    pub fn includes_video_track(&self) -> bool {
        self.is_progressive() || self.major_type == "video"
    }

    pub fn profile(&self) -> &FormatProfile {
        &self.profile
    }

    pub fn resolution(&self) -> Option<&'static str> {
        self.profile.resolution
    }

    pub fn abr(&self) -> Option<&'static str> {
        self.profile.abr
    }

    pub fn fps(&self) -> u32 {
        self.profile.fps
    }

    pub fn is_3d(&self) -> bool {
        self.profile.is_3d
    }

    pub fn is_hdr(&self) -> bool {
        self.profile.is_hdr
    }

    pub fn is_live(&self) -> bool {
        self.profile.is_live
    }

    pub fn is_dash(&self) -> bool {
        self.profile.is_dash
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Sanitized title plus the subtype as extension.
    pub fn default_filename(&self) -> String {
        compose_filename("", &self.title, &self.subtype)
    }

    pub(crate) fn observers(&self) -> &StreamObservers {
        &self.observers
    }

    /// Remote size in bytes from `Content-Length`, fetched once and memoized.
    pub fn filesize(&self, transport: &dyn Transport) -> Result<u64> {
        if let Some(size) = self.filesize.get() {
            return Ok(*size);
        }
        let size = transport
            .headers(&self.url)?
            .content_length
            .ok_or_else(|| StreamError::MissingContentLength(self.url.clone()))?;
        Ok(*self.filesize.get_or_init(|| size))
    }
}

impl fmt::Debug for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("itag", &self.itag)
            .field("mime_type", &self.mime_type)
            .field("codecs", &self.codecs)
            .field("profile", &self.profile)
            .field("title", &self.title)
            .field("filesize", &self.filesize.get())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |v: Option<&str>| v.unwrap_or("None").to_string();
        write!(f, "<Stream: itag=\"{}\" mime_type=\"{}\"", self.itag, self.mime_type)?;
        if self.includes_video_track() {
            write!(
                f,
                " res=\"{}\" fps=\"{}fps\" vcodec=\"{}\"",
                opt(self.resolution()),
                self.fps(),
                opt(self.video_codec())
            )?;
            if self.is_progressive() {
                write!(f, " acodec=\"{}\"", opt(self.audio_codec()))?;
            }
        } else {
            write!(
                f,
                " abr=\"{}\" acodec=\"{}\"",
                opt(self.abr()),
                opt(self.audio_codec())
            )?;
        }
        write!(
            f,
            " progressive=\"{}\" type=\"{}\">",
            self.is_progressive(),
            self.major_type
        )
    }
}
