//! Progress and completion callbacks shared by every stream of one manifest.
//!
//! Built once, then handed to each [`Stream`] as `Arc<StreamObservers>`. The
//! registry never refers back to a stream; the stream is passed in on each call.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use crate::error::{Result, StreamError};
use crate::stream::Stream;

/// Called after each chunk is written: `(stream, chunk, sink, bytes_remaining)`.
pub type ProgressCallback =
    Box<dyn Fn(&Stream, &[u8], &mut dyn Write, u64) -> anyhow::Result<()> + Send + Sync>;

/// Called once after the final chunk: `(stream, sink)`.
pub type CompleteCallback =
    Box<dyn Fn(&Stream, &mut dyn Write) -> anyhow::Result<()> + Send + Sync>;

#[derive(Default)]
pub struct StreamObservers {
    on_progress: Option<ProgressCallback>,
    on_complete: Option<CompleteCallback>,
}

impl StreamObservers {
    pub fn builder() -> StreamObserversBuilder {
        StreamObserversBuilder::default()
    }

    /// Registry with no callbacks.
    pub fn none() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn notify_progress(
        &self,
        stream: &Stream,
        chunk: &[u8],
        sink: &mut dyn Write,
        bytes_remaining: u64,
    ) -> Result<()> {
        if let Some(cb) = &self.on_progress {
            tracing::trace!(itag = stream.itag(), bytes_remaining, "calling on_progress callback");
            cb(stream, chunk, sink, bytes_remaining).map_err(StreamError::Callback)?;
        }
        Ok(())
    }

    pub(crate) fn notify_complete(&self, stream: &Stream, sink: &mut dyn Write) -> Result<()> {
        if let Some(cb) = &self.on_complete {
            tracing::trace!(itag = stream.itag(), "calling on_complete callback");
            cb(stream, sink).map_err(StreamError::Callback)?;
        }
        Ok(())
    }
}

impl fmt::Debug for StreamObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamObservers")
            .field("on_progress", &self.on_progress.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// Builder for [`StreamObservers`]; `build` freezes the registry.
#[derive(Default)]
pub struct StreamObserversBuilder {
    inner: StreamObservers,
}

impl StreamObserversBuilder {
    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(&Stream, &[u8], &mut dyn Write, u64) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.inner.on_progress = Some(Box::new(f));
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: Fn(&Stream, &mut dyn Write) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.inner.on_complete = Some(Box::new(f));
        self
    }

    pub fn build(self) -> Arc<StreamObservers> {
        Arc::new(self.inner)
    }
}
