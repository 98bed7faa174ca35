//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Bookmaker URLs may be referenced by env-var name in the config and
//! resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::time::Duration;

use crate::extraction::locator::DEFAULT_WINDOW_CHARS;
use crate::fetch::cache::DEFAULT_CACHE_TTL_SECS;
use crate::fetch::http::DEFAULT_TIMEOUT_SECS;
use crate::types::BookmakerLink;

/// Environment variable that overrides the config file path.
pub const CONFIG_PATH_ENV: &str = "CORNER_ODDS_CONFIG";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: GeneralConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub bookmakers: Vec<BookmakerConfig>,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    pub name: String,
    /// 0 runs a single comparison and exits.
    #[serde(default)]
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "pt-BR".to_string(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Proximity window after a market label, in characters.
    pub window_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            window_chars: DEFAULT_WINDOW_CHARS,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookmakerConfig {
    pub name: String,
    #[serde(default)]
    pub url: String,
    /// Env var whose value, when set and non-empty, replaces `url`.
    #[serde(default)]
    pub url_env: Option<String>,
}

impl BookmakerConfig {
    pub fn resolve(&self) -> BookmakerLink {
        let url = self
            .url_env
            .as_deref()
            .and_then(|env| std::env::var(env).ok())
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.url.clone());
        BookmakerLink::new(self.name.clone(), url)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        anyhow::ensure!(
            config.extraction.window_chars > 0,
            "extraction.window_chars must be positive"
        );
        Ok(config)
    }

    /// Config path: `$CORNER_ODDS_CONFIG` or `config.toml`.
    pub fn default_path() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string())
    }

    /// Bookmaker links in config order, URLs resolved from the environment.
    pub fn links(&self) -> Vec<BookmakerLink> {
        self.bookmakers.iter().map(BookmakerConfig::resolve).collect()
    }
}
