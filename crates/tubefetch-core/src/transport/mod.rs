//! HTTP transport used by the download engine.
//!
//! [`Transport`] is the seam: one header probe and one chunked body fetch.
//! [`CurlTransport`] implements it with a libcurl easy handle per request.

mod head;

use std::str;
use std::time::Duration;

use crate::error::{Result, StreamError};

/// Headers of interest from a HEAD request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadResult {
    /// Total size in bytes, if the final response carries `Content-Length`.
    pub content_length: Option<u64>,
}

/// Blocking HTTP transport.
pub trait Transport {
    /// Fetches response headers for `url` without the body.
    fn headers(&self, url: &str) -> Result<HeadResult>;

    /// Fetches the body of `url`, handing each received chunk to `on_chunk`
    /// in order. An error from `on_chunk` stops the transfer and is returned.
    fn stream(&self, url: &str, on_chunk: &mut dyn FnMut(&[u8]) -> Result<()>) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn headers(&self, url: &str) -> Result<HeadResult> {
        (**self).headers(url)
    }

    fn stream(&self, url: &str, on_chunk: &mut dyn FnMut(&[u8]) -> Result<()>) -> Result<()> {
        (**self).stream(url, on_chunk)
    }
}

/// libcurl knobs for [`CurlTransport`].
#[derive(Debug, Clone)]
pub struct CurlOptions {
    pub user_agent: Option<String>,
    pub connect_timeout: Duration,
    /// Whole-transfer timeout.
    pub timeout: Duration,
    /// Abort when slower than `low_speed_limit` bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    /// Receive buffer size; bounds the size of each delivered chunk.
    pub buffer_size: Option<usize>,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(3600),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
            buffer_size: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    options: CurlOptions,
}

impl CurlTransport {
    pub fn new(options: CurlOptions) -> Self {
        Self { options }
    }

    fn easy(&self, url: &str) -> Result<curl::easy::Easy> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.fail_on_error(true)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.timeout(self.options.timeout)?;
        easy.low_speed_limit(self.options.low_speed_limit)?;
        easy.low_speed_time(self.options.low_speed_time)?;
        if let Some(ua) = &self.options.user_agent {
            easy.useragent(ua)?;
        }
        if let Some(sz) = self.options.buffer_size {
            easy.buffer_size(sz)?;
        }
        Ok(easy)
    }
}

fn check_status(easy: &mut curl::easy::Easy, method: &str, url: &str) -> Result<()> {
    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(StreamError::Transfer(format!("{method} {url} returned HTTP {code}")));
    }
    Ok(())
}

impl Transport for CurlTransport {
    fn headers(&self, url: &str) -> Result<HeadResult> {
        let mut lines: Vec<String> = Vec::new();
        let mut easy = self.easy(url)?;
        easy.nobody(true)?; // HEAD request

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.perform()?;
        }

        check_status(&mut easy, "HEAD", url)?;
        Ok(head::parse_headers(&lines))
    }

    fn stream(&self, url: &str, on_chunk: &mut dyn FnMut(&[u8]) -> Result<()>) -> Result<()> {
        let mut easy = self.easy(url)?;
        let mut failure: Option<StreamError> = None;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match on_chunk(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    failure = Some(e);
                    Ok(0) // short write aborts the transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(err) = failure {
            return Err(err);
        }
        performed?;
        check_status(&mut easy, "GET", url)
    }
}
