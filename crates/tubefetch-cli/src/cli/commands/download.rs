//! `tubefetch download <manifest> --itag N` – download one stream with a progress line.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tubefetch_core::config::TubeConfig;
use tubefetch_core::progress::ProgressStats;
use tubefetch_core::{CurlTransport, DownloadOptions, Downloader, SignatureSolver, StreamObservers};

use crate::cli::streams::load_streams;

const PROGRESS_INTERVAL_MS: u128 = 500;

/// Per-invocation options for `download`, layered over the config file.
#[derive(Debug, Clone, Default)]
pub struct DownloadArgs {
    pub itag: u32,
    pub output: Option<PathBuf>,
    pub filename: Option<String>,
    pub prefix: Option<String>,
    pub no_skip_existing: bool,
}

impl DownloadArgs {
    fn options(&self, cfg: &TubeConfig) -> DownloadOptions {
        let mut opts = DownloadOptions::from_config(cfg);
        if let Some(dir) = &self.output {
            opts = opts.with_output_path(dir);
        }
        if let Some(name) = &self.filename {
            opts = opts.with_filename(name);
        }
        if let Some(prefix) = &self.prefix {
            opts = opts.with_filename_prefix(prefix);
        }
        if self.no_skip_existing {
            opts = opts.skip_existing(false);
        }
        opts
    }
}

/// Observers printing a throttled progress line to stderr.
fn progress_observers(total: Arc<AtomicU64>) -> Arc<StreamObservers> {
    let started = Instant::now();
    let last_print = Mutex::new(None::<Instant>);
    StreamObservers::builder()
        .on_progress(move |_, _, _, bytes_remaining| {
            let now = Instant::now();
            let mut last = last_print.lock().map_err(|_| anyhow::anyhow!("progress lock poisoned"))?;
            let due = last.map_or(true, |t| now.duration_since(t).as_millis() >= PROGRESS_INTERVAL_MS);
            if !due && bytes_remaining > 0 {
                return Ok(());
            }
            *last = Some(now);

            let stats = ProgressStats::from_remaining(total.load(Ordering::Relaxed), bytes_remaining, started);
            let eta = stats
                .eta_secs()
                .map(|s| format!("{:.0}s", s))
                .unwrap_or_else(|| "?".to_string());
            let mut err = std::io::stderr().lock();
            write!(
                err,
                "\r  {:.1} / {:.1} MiB ({:.1}%)  {:.2} MiB/s  ETA {}  ",
                stats.bytes_done as f64 / 1_048_576.0,
                stats.total_bytes as f64 / 1_048_576.0,
                stats.fraction() * 100.0,
                stats.bytes_per_sec() / 1_048_576.0,
                eta
            )?;
            err.flush()?;
            Ok(())
        })
        .on_complete(|_, _| {
            eprintln!();
            Ok(())
        })
        .build()
}

pub fn run_download(
    manifest: &Path,
    args: &DownloadArgs,
    solver: Option<&dyn SignatureSolver>,
    cfg: &TubeConfig,
) -> Result<()> {
    let total = Arc::new(AtomicU64::new(0));
    let observers = progress_observers(Arc::clone(&total));
    let streams = load_streams(manifest, solver, &observers)?;
    let stream = streams
        .get_by_itag(args.itag)
        .with_context(|| format!("no stream with itag {} in manifest", args.itag))?;
    tracing::info!(itag = args.itag, "selected {}", stream);

    let downloader = Downloader::new(CurlTransport::new(cfg.curl_options()));
    total.store(stream.filesize(downloader.transport())?, Ordering::Relaxed);

    let path = downloader.download(stream, &args.options(cfg))?;
    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_override_config() {
        let cfg = TubeConfig {
            output_dir: Some(PathBuf::from("/srv/media")),
            ..TubeConfig::default()
        };
        let args = DownloadArgs {
            itag: 22,
            output: Some(PathBuf::from("/tmp/out")),
            filename: Some("clip".to_string()),
            prefix: Some("01_".to_string()),
            no_skip_existing: true,
        };
        let opts = args.options(&cfg);
        assert_eq!(opts.output_path.as_deref(), Some(Path::new("/tmp/out")));
        assert_eq!(opts.filename.as_deref(), Some("clip"));
        assert_eq!(opts.filename_prefix.as_deref(), Some("01_"));
        assert!(!opts.skip_existing);
    }

    #[test]
    fn config_defaults_apply() {
        let cfg = TubeConfig {
            output_dir: Some(PathBuf::from("/srv/media")),
            ..TubeConfig::default()
        };
        let opts = DownloadArgs::default().options(&cfg);
        assert_eq!(opts.output_path.as_deref(), Some(Path::new("/srv/media")));
        assert!(opts.skip_existing);
    }
}
