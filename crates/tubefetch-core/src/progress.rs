//! Progress reporting for downloads (bytes done, ETA, rate).
//!
//! Built from the `bytes_remaining` value handed to progress callbacks;
//! consumers compute rate = bytes_done / elapsed_secs and
//! ETA = (total_bytes - bytes_done) / rate.

use std::time::Instant;

/// Snapshot of download progress for one stream.
#[derive(Debug, Clone)]
pub struct ProgressStats {
    /// Bytes written so far.
    pub bytes_done: u64,
    /// Total stream size in bytes.
    pub total_bytes: u64,
    /// Elapsed time since download start (seconds).
    pub elapsed_secs: f64,
}

impl ProgressStats {
    /// Snapshot from a progress callback's `bytes_remaining`.
    pub fn from_remaining(total_bytes: u64, bytes_remaining: u64, started: Instant) -> Self {
        Self {
            bytes_done: total_bytes.saturating_sub(bytes_remaining),
            total_bytes,
            elapsed_secs: started.elapsed().as_secs_f64(),
        }
    }

    /// Download rate in bytes per second (0 if elapsed is 0).
    pub fn bytes_per_sec(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        self.bytes_done as f64 / self.elapsed_secs
    }

    /// Estimated seconds remaining (None if rate is 0 and bytes remain).
    pub fn eta_secs(&self) -> Option<f64> {
        let remaining = self.total_bytes.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        let rate = self.bytes_per_sec();
        if rate <= 0.0 {
            return None;
        }
        Some(remaining as f64 / rate)
    }

    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            return 1.0;
        }
        (self.bytes_done as f64 / self.total_bytes as f64).min(1.0)
    }
}
