pub mod config;
pub mod logging;

pub mod downloader;
pub mod error;
pub mod fs_util;
pub mod itags;
pub mod manifest;
pub mod mime;
pub mod observer;
pub mod progress;
pub mod stream;
pub mod transport;

pub use downloader::{DownloadOptions, Downloader};
pub use error::{Result, SolverError, StreamError};
pub use manifest::{Manifest, SignatureSolver};
pub use observer::StreamObservers;
pub use stream::{Stream, StreamList};
pub use transport::{CurlOptions, CurlTransport, Transport};
