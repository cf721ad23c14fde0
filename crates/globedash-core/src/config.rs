//! Configuration management for globedash.
//!
//! Loads configuration from ${GLOBEDASH_HOME}/config.toml with sensible defaults.

use std::{env, fs};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `api_base_url`.
pub const API_URL_ENV: &str = "GLOBEDASH_API_URL";

/// Which identity a restored session reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RestoreIdentity {
    /// Identity embedded in the stored token at login time.
    #[default]
    Token,
    /// Fixed placeholder identity, regardless of who logged in.
    Placeholder,
}

/// Returns the default config template with comments.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for globedash configuration and data directories.
    //!
    //! GLOBEDASH_HOME resolution order:
    //! 1. GLOBEDASH_HOME environment variable (if set)
    //! 2. ~/.config/globedash (default)
    //! 3. ./.globedash when no home directory can be determined

    use std::env;
    use std::path::PathBuf;

    /// Returns the globedash home directory.
    pub fn globedash_home() -> PathBuf {
        if let Ok(home) = env::var("GLOBEDASH_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".globedash"),
            |h| h.join(".config").join("globedash"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        globedash_home().join("config.toml")
    }

    /// Returns the path to the key-value storage file holding the session.
    pub fn storage_path() -> PathBuf {
        globedash_home().join("storage.json")
    }

    /// Returns the directory the TUI writes its log file into.
    pub fn logs_dir() -> PathBuf {
        globedash_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the countries API (without the `/all` suffix)
    pub api_base_url: String,

    /// Timeout for the country fetch in seconds (0 disables)
    pub request_timeout_secs: u32,

    /// Identity policy for restored sessions
    pub restore_identity: RestoreIdentity,

    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Config {
    pub const DEFAULT_API_BASE_URL: &str = "https://restcountries.com/v3.1";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 30;
    const DEFAULT_LOG_LEVEL: &str = "info";

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&paths::config_path())?;
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            config.api_base_url = url.trim().to_string();
        }
        Ok(config)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Returns the fetch timeout, or `None` if disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    ///
    /// # Errors
    /// Returns an error if the file exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            restore_identity: RestoreIdentity::default(),
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
