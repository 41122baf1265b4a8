// src/config.rs
//! Runtime configuration: TOML file, env path override, and `"ENV"` API-key
//! indirection so secrets stay out of the config file.

use std::{env, fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::discovery::types::Order;

pub const DEFAULT_CONFIG_PATH: &str = "config/trendscout.toml";
pub const ENV_CONFIG_PATH: &str = "TRENDSCOUT_CONFIG_PATH";

/// Value meaning "read the key from the environment instead".
const KEY_FROM_ENV: &str = "ENV";

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_api_key() -> String {
    KEY_FROM_ENV.to_string()
}
fn default_window_days() -> i64 {
    90
}
fn default_max_results() -> u32 {
    10
}
fn default_comment_limit() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub genai: GenAiConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenAiConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// "ENV" means: read from OPENAI_API_KEY.
    #[serde(default = "default_api_key")]
    pub api_key: String,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: default_api_key(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// "ENV" means: read from YOUTUBE_API_KEY.
    #[serde(default = "default_api_key")]
    pub api_key: String,
    /// Trailing recency window for the published-after search bound.
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Documented ordering policy: recency. View-count ordering stays
    /// available but is opt-in.
    #[serde(default)]
    pub order: Order,
    #[serde(default = "default_comment_limit")]
    pub comment_limit: u32,
    /// When set, accepted videos are enriched with transcripts and top
    /// comments before composition (best-effort).
    #[serde(default)]
    pub enrich: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            window_days: default_window_days(),
            max_results: default_max_results(),
            order: Order::default(),
            comment_limit: default_comment_limit(),
            enrich: false,
        }
    }
}

impl Config {
    /// Load from `TRENDSCOUT_CONFIG_PATH` or the default path, then resolve
    /// any `"ENV"` key placeholders.
    pub fn load() -> Result<Self> {
        let path = env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut cfg = Self::load_from_file(&path)?;
        cfg.resolve_keys()?;
        Ok(cfg)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        Self::from_toml_str(&data)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let mut cfg: Config = toml::from_str(toml_str).context("failed to parse config TOML")?;
        if cfg.discovery.window_days <= 0 {
            cfg.discovery.window_days = default_window_days();
        }
        if cfg.discovery.max_results == 0 {
            cfg.discovery.max_results = default_max_results();
        }
        Ok(cfg)
    }

    /// Replace `"ENV"` placeholders with the actual secrets.
    pub fn resolve_keys(&mut self) -> Result<()> {
        if self.genai.api_key.trim().eq_ignore_ascii_case(KEY_FROM_ENV) {
            self.genai.api_key =
                env::var("OPENAI_API_KEY").context("missing OPENAI_API_KEY env var")?;
        }
        if self
            .discovery
            .api_key
            .trim()
            .eq_ignore_ascii_case(KEY_FROM_ENV)
        {
            self.discovery.api_key =
                env::var("YOUTUBE_API_KEY").context("missing YOUTUBE_API_KEY env var")?;
        }
        Ok(())
    }
}
