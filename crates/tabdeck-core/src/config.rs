//! Frontend configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path to the settings database
    pub database_path: PathBuf,
    /// Base for relative lazy-load URLs
    pub base_url: Option<String>,
    /// Single timeout applied to each lazy-load request
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    /// Default for groups: remember the active panel per page
    pub remember_selection: bool,
    /// Default for groups: mirror the active panel into the location fragment
    pub hash_navigation: bool,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("tabdeck.db"),
            base_url: None,
            fetch_timeout_secs: 10,
            user_agent: format!("tabdeck/{}", env!("CARGO_PKG_VERSION")),
            remember_selection: true,
            hash_navigation: false,
        }
    }

    pub fn data_dir() -> PathBuf {
        platform_data_dir()
            .map(|d| d.join("tabdeck"))
            .unwrap_or_else(|| PathBuf::from(".tabdeck"))
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;

        tracing::debug!(path = %path.as_ref().display(), "Loaded configuration");

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch_timeout_secs == 0 {
            return Err(CoreError::Config(
                "fetch_timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.base_url()?;
        Ok(())
    }

    pub fn base_url(&self) -> Result<Option<Url>> {
        match &self.base_url {
            Some(raw) => Url::parse(raw)
                .map(Some)
                .map_err(|e| CoreError::Config(format!("base_url {:?}: {}", raw, e))),
            None => Ok(None),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

/// `%LOCALAPPDATA%` on Windows, `~/Library/Application Support` on macOS,
/// `$XDG_DATA_HOME` or `~/.local/share` elsewhere
fn platform_data_dir() -> Option<PathBuf> {
    let home = || std::env::var_os("HOME").map(PathBuf::from);

    if cfg!(target_os = "windows") {
        std::env::var_os("LOCALAPPDATA").map(PathBuf::from)
    } else if cfg!(target_os = "macos") {
        home().map(|h| h.join("Library/Application Support"))
    } else {
        std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| home().map(|h| h.join(".local/share")))
    }
}
