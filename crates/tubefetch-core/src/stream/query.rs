//! Building every stream of a manifest and picking among them.

use std::sync::Arc;

use crate::error::Result;
use crate::manifest::Manifest;
use crate::observer::StreamObservers;

use super::Stream;

/// Builds one descriptor per record for each family in `keys`, in order.
///
/// All families must already be descrambled and signed. The first record that
/// fails to build aborts the whole list.
pub fn build_streams(
    manifest: &Manifest,
    keys: &[&str],
    observers: &Arc<StreamObservers>,
) -> Result<StreamList> {
    let mut streams = Vec::new();
    for key in keys {
        for entry in manifest.entries(key)? {
            streams.push(Stream::new(entry, &manifest.metadata, Arc::clone(observers))?);
        }
    }
    tracing::debug!(count = streams.len(), "built stream descriptors");
    Ok(StreamList { streams })
}

/// Ordered collection of the streams available for one video.
#[derive(Debug, Default)]
pub struct StreamList {
    streams: Vec<Stream>,
}

impl StreamList {
    pub fn get_by_itag(&self, itag: u32) -> Option<&Stream> {
        self.streams.iter().find(|s| s.itag() == itag)
    }

    pub fn first(&self) -> Option<&Stream> {
        self.streams.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stream> {
        self.streams.iter()
    }

    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn progressive(&self) -> impl Iterator<Item = &Stream> {
        self.iter().filter(|s| s.is_progressive())
    }

    pub fn adaptive(&self) -> impl Iterator<Item = &Stream> {
        self.iter().filter(|s| s.is_adaptive())
    }

    /// Adaptive streams carrying only audio.
    pub fn audio_only(&self) -> impl Iterator<Item = &Stream> {
        self.adaptive().filter(|s| s.includes_audio_track())
    }

    /// Adaptive streams carrying only video.
    pub fn video_only(&self) -> impl Iterator<Item = &Stream> {
        self.adaptive().filter(|s| s.includes_video_track())
    }

    /// Progressive stream with the highest numeric resolution.
    pub fn highest_resolution(&self) -> Option<&Stream> {
        self.progressive()
            .filter_map(|s| resolution_height(s.resolution()?).map(|h| (h, s)))
            .max_by_key(|(h, _)| *h)
            .map(|(_, s)| s)
    }
}

impl<'a> IntoIterator for &'a StreamList {
    type Item = &'a Stream;
    type IntoIter = std::slice::Iter<'a, Stream>;

    fn into_iter(self) -> Self::IntoIter {
        self.streams.iter()
    }
}

/// `"720p"` → `720`.
fn resolution_height(resolution: &str) -> Option<u32> {
    resolution.strip_suffix('p')?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StreamError;
    use crate::manifest::{
        FormatValue, RawManifestEntry, ADAPTIVE_FORMATS, PROGRESSIVE_FORMATS,
    };
    use crate::stream::tests::entry;

    fn manifest() -> Manifest {
        let progressive: Vec<RawManifestEntry> = vec![
            entry("18", r#"video/mp4; codecs="avc1.42001E, mp4a.40.2""#),
            entry("22", r#"video/mp4; codecs="avc1.64001F, mp4a.40.2""#),
            entry("43", r#"video/webm; codecs="vp8.0, vorbis""#),
        ];
        let adaptive: Vec<RawManifestEntry> = vec![
            entry("137", r#"video/mp4; codecs="avc1.640028""#),
            entry("140", r#"audio/mp4; codecs="mp4a.40.2""#),
        ];
        let mut m = Manifest::default();
        m.metadata.title = Some("Clip".to_string());
        m.formats.insert(
            PROGRESSIVE_FORMATS.to_string(),
            FormatValue::Descrambled(progressive),
        );
        m.formats
            .insert(ADAPTIVE_FORMATS.to_string(), FormatValue::Descrambled(adaptive));
        m
    }

    #[test]
    fn builds_in_family_order() {
        let list = build_streams(
            &manifest(),
            &[PROGRESSIVE_FORMATS, ADAPTIVE_FORMATS],
            &StreamObservers::none(),
        )
        .unwrap();
        let itags: Vec<u32> = list.iter().map(Stream::itag).collect();
        assert_eq!(itags, [18, 22, 43, 137, 140]);
        assert_eq!(list.first().unwrap().title(), "Clip");
    }

    #[test]
    fn filters() {
        let list = build_streams(
            &manifest(),
            &[PROGRESSIVE_FORMATS, ADAPTIVE_FORMATS],
            &StreamObservers::none(),
        )
        .unwrap();
        assert_eq!(list.progressive().count(), 3);
        assert_eq!(list.adaptive().count(), 2);
        assert_eq!(list.audio_only().map(Stream::itag).collect::<Vec<_>>(), [140]);
        assert_eq!(list.video_only().map(Stream::itag).collect::<Vec<_>>(), [137]);
        assert_eq!(list.get_by_itag(43).unwrap().subtype(), "webm");
        assert!(list.get_by_itag(1).is_none());
        assert_eq!(list.highest_resolution().unwrap().itag(), 22);
    }

    #[test]
    fn shares_one_observer_registry() {
        let observers = StreamObservers::none();
        let list = build_streams(&manifest(), &[ADAPTIVE_FORMATS], &observers).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(Arc::strong_count(&observers), 3);
    }

    #[test]
    fn unknown_itag_aborts() {
        let mut m = manifest();
        m.formats.insert(
            ADAPTIVE_FORMATS.to_string(),
            FormatValue::Descrambled(vec![entry("9999", r#"audio/mp4; codecs="x""#)]),
        );
        let err = build_streams(&m, &[ADAPTIVE_FORMATS], &StreamObservers::none()).unwrap_err();
        assert!(matches!(err, StreamError::UnknownFormat(9999)));
    }
}
