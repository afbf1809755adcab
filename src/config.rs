use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct BabelConfig {
    pub remote: RemoteConfig,
    pub client: ClientConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RemoteConfig {
    /// Prefix of the `/entries` routes, e.g. `http://localhost:8000/api`.
    pub base_url: String,
    /// Upper bound on every store round trip.
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClientConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    /// Content longer than this is cut in listings.
    pub preview_chars: usize,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".into(),
            timeout_secs: 10,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".into(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { preview_chars: 120 }
    }
}

/// Returns `~/.babel/`, or `./.babel/` when no home directory is known.
pub fn default_babel_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".babel")
}

/// Returns the default config file path: `~/.babel/config.toml`
pub fn default_config_path() -> PathBuf {
    default_babel_dir().join("config.toml")
}

impl BabelConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            BabelConfig::default()
        };

        config.apply_env_overrides();
        config.clamp_limits();
        Ok(config)
    }

    /// Replace values the HTTP client cannot work with by their defaults.
    fn clamp_limits(&mut self) {
        if self.remote.timeout_secs == 0 {
            let fallback = RemoteConfig::default().timeout_secs;
            warn!(fallback, "timeout_secs = 0 would fail every request, using default");
            self.remote.timeout_secs = fallback;
        }
    }

    /// Apply environment variable overrides (BABEL_URL, BABEL_TIMEOUT_SECS, BABEL_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("BABEL_URL") {
            self.remote.base_url = val;
        }
        if let Ok(val) = std::env::var("BABEL_TIMEOUT_SECS") {
            match val.parse() {
                Ok(secs) => self.remote.timeout_secs = secs,
                Err(_) => warn!(value = %val, "ignoring non-numeric BABEL_TIMEOUT_SECS"),
            }
        }
        if let Ok(val) = std::env::var("BABEL_LOG_LEVEL") {
            self.client.log_level = val;
        }
    }
}
