use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::transport::CurlOptions;

/// Global configuration loaded from `~/.config/tubefetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TubeConfig {
    /// Default download directory (None = current working directory).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Skip downloads when a file of the remote size already exists.
    pub skip_existing: bool,
    /// User-Agent sent with every request (None = libcurl default).
    #[serde(default)]
    pub user_agent: Option<String>,
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout in seconds.
    pub timeout_secs: u64,
    /// Abort transfers slower than this many bytes/sec for `low_speed_time_secs`.
    pub low_speed_limit: u32,
    pub low_speed_time_secs: u64,
    /// Receive buffer size in bytes (None = libcurl default). Bounds chunk size.
    #[serde(default)]
    pub buffer_size: Option<usize>,
}

impl Default for TubeConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            skip_existing: true,
            user_agent: None,
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            low_speed_limit: 1024,
            low_speed_time_secs: 60,
            buffer_size: None,
        }
    }
}

impl TubeConfig {
    /// Transport settings derived from this config.
    pub fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            user_agent: self.user_agent.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.timeout_secs),
            low_speed_limit: self.low_speed_limit,
            low_speed_time: Duration::from_secs(self.low_speed_time_secs),
            buffer_size: self.buffer_size,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tubefetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TubeConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TubeConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: TubeConfig = toml::from_str(&data)?;
    Ok(cfg)
}
