//! `AppConfig` struct and TOML read/write.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable that overrides `tmdb.api_token`.
pub const TOKEN_ENV: &str = "TMDB_API_TOKEN";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// TMDB client settings.
    #[serde(default)]
    pub tmdb: TmdbConfig,
    /// Persisted session.
    #[serde(default)]
    pub session: SessionConfig,
    /// CLI behaviour.
    #[serde(default)]
    pub cli: CliConfig,
}

/// TMDB client settings.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TmdbConfig {
    /// API read access token (v4 bearer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Response language, e.g. `ja-JP`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// API base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Minimum interval between requests in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_interval_ms: Option<u64>,
}

/// Persisted session.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Session ID written by `login`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// CLI behaviour.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Seconds to wait for an intent to settle (default 30).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Default wait for an intent to settle.
    const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// API token: `TMDB_API_TOKEN` if set, else `tmdb.api_token`.
    ///
    /// # Errors
    ///
    /// Returns an error if neither is set.
    pub fn api_token(&self) -> Result<String> {
        self.api_token_from(std::env::var(TOKEN_ENV).ok())
    }

    fn api_token_from(&self, env_token: Option<String>) -> Result<String> {
        env_token
            .filter(|t| !t.is_empty())
            .or_else(|| self.tmdb.api_token.clone())
            .with_context(|| format!("TMDB API token is required: set {TOKEN_ENV} or tmdb.api_token"))
    }

    /// Parsed `tmdb.base_url`, if set.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(&self) -> Result<Option<Url>> {
        self.tmdb
            .base_url
            .as_deref()
            .map(|raw| Url::parse(raw).with_context(|| format!("invalid tmdb.base_url: {raw}")))
            .transpose()
    }

    /// `tmdb.min_interval_ms` as a duration, if set.
    #[must_use]
    pub fn min_interval(&self) -> Option<Duration> {
        self.tmdb.min_interval_ms.map(Duration::from_millis)
    }

    /// How long the CLI waits for an intent to settle.
    #[must_use]
    pub fn wait_timeout(&self) -> Duration {
        self.cli
            .wait_timeout_secs
            .map_or(Self::DEFAULT_WAIT_TIMEOUT, Duration::from_secs)
    }
}
