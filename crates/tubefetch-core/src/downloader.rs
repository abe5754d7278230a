//! Download engine: drives the chunked transfer of one stream into a sink.
//!
//! Each chunk is written, the remaining byte count is updated and the
//! progress callback runs, all on the calling thread before the next chunk is
//! requested. Callback errors abort the transfer; partial files stay on disk.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::TubeConfig;
use crate::error::{Result, StreamError};
use crate::fs_util::{compose_filename, target_directory};
use crate::stream::Stream;
use crate::transport::Transport;

/// Where and how [`Downloader::download`] writes a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Output directory; `None` means the current working directory.
    pub output_path: Option<PathBuf>,
    /// Filename stem; the subtype is appended as extension.
    pub filename: Option<String>,
    /// Prepended to the filename, e.g. a playlist index.
    pub filename_prefix: Option<String>,
    /// Return early when a file of the remote size already exists.
    pub skip_existing: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            output_path: None,
            filename: None,
            filename_prefix: None,
            skip_existing: true,
        }
    }
}

impl DownloadOptions {
    pub fn from_config(cfg: &TubeConfig) -> Self {
        Self {
            output_path: cfg.output_dir.clone(),
            skip_existing: cfg.skip_existing,
            ..Self::default()
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_filename_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.filename_prefix = Some(prefix.into());
        self
    }

    pub fn skip_existing(mut self, skip: bool) -> Self {
        self.skip_existing = skip;
        self
    }
}

/// Filename for `stream`: explicit stem or the default title-based name,
/// with the sanitized prefix in front.
pub fn resolve_filename(stream: &Stream, filename: Option<&str>, prefix: Option<&str>) -> String {
    let stem = filename.filter(|f| !f.is_empty()).unwrap_or(stream.title());
    compose_filename(prefix.unwrap_or(""), stem, stream.subtype())
}

/// Streams media through a [`Transport`] into files or memory.
#[derive(Debug, Clone, Default)]
pub struct Downloader<T> {
    transport: T,
}

impl<T: Transport> Downloader<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Writes `stream` to disk and returns the file path.
    pub fn download(&self, stream: &Stream, options: &DownloadOptions) -> Result<PathBuf> {
        let filename = resolve_filename(
            stream,
            options.filename.as_deref(),
            options.filename_prefix.as_deref(),
        );
        let file_path = target_directory(options.output_path.as_deref())?.join(filename);

        if options.skip_existing && self.already_downloaded(stream, &file_path)? {
            // likely the same file
            tracing::debug!(path = %file_path.display(), "file already exists, skipping");
            return Ok(file_path);
        }

        let total = stream.filesize(&self.transport)?;
        tracing::debug!(
            itag = stream.itag(),
            total_bytes = total,
            path = %file_path.display(),
            "downloading file"
        );
        let mut file = File::create(&file_path).map_err(|e| StreamError::io(&file_path, e))?;
        self.transfer(stream, total, &mut file, &file_path)?;
        tracing::info!(itag = stream.itag(), path = %file_path.display(), "download complete");
        Ok(file_path)
    }

    /// Reads `stream` fully into memory. No skip-existing check applies.
    pub fn stream_to_buffer(&self, stream: &Stream) -> Result<Vec<u8>> {
        let total = stream.filesize(&self.transport)?;
        tracing::debug!(
            itag = stream.itag(),
            total_bytes = total,
            "downloading file to memory buffer"
        );
        let mut buffer = Vec::new();
        self.transfer(stream, total, &mut buffer, Path::new("<memory>"))?;
        Ok(buffer)
    }

    fn already_downloaded(&self, stream: &Stream, path: &Path) -> Result<bool> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => Ok(meta.len() == stream.filesize(&self.transport)?),
            _ => Ok(false),
        }
    }

    fn transfer<W: Write>(
        &self,
        stream: &Stream,
        total: u64,
        sink: &mut W,
        sink_path: &Path,
    ) -> Result<()> {
        let observers = stream.observers();
        let mut bytes_remaining = total;

        self.transport.stream(stream.url(), &mut |chunk: &[u8]| {
            sink.write_all(chunk)
                .map_err(|e| StreamError::io(sink_path, e))?;
            let len = chunk.len() as u64;
            if len > bytes_remaining {
                tracing::warn!(
                    itag = stream.itag(),
                    overrun = len - bytes_remaining,
                    "received more bytes than content-length"
                );
            }
            bytes_remaining = bytes_remaining.saturating_sub(len);
            tracing::trace!(chunk_size = chunk.len(), bytes_remaining, "download progress");
            observers.notify_progress(stream, chunk, &mut *sink, bytes_remaining)
        })?;

        sink.flush().map_err(|e| StreamError::io(sink_path, e))?;
        tracing::debug!(itag = stream.itag(), "download finished");
        observers.notify_complete(stream, &mut *sink)
    }
}
