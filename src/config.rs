use crate::strings::Locale;
use anyhow::{Context, Result};
use std::collections::HashMap;

/// Bundled config for web and mobile builds, where there is no `.env` file
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

pub const DEFAULT_API_URL: &str = "https://oltjuqzkdl.execute-api.us-west-2.amazonaws.com/prod";
pub const DEFAULT_STORAGE_KEY: &str = "conversationId";

pub const ENV_API_URL: &str = "KBCHAT_API_URL";
pub const ENV_LOCALE: &str = "KBCHAT_LOCALE";
pub const ENV_STORAGE_KEY: &str = "KBCHAT_STORAGE_KEY";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    /// Base URL of the knowledge base API, without a trailing slash.
    pub api_url: String,
    pub locale: Locale,
    /// Durable storage key holding the conversation id.
    pub storage_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            locale: Locale::default(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl AppConfig {
    /// Process environment first (plus `.env` on desktop), then the bundled
    /// `assets/config.env`.
    pub fn load() -> Self {
        load_dotenv();
        let bundled = parse_env_file(BUNDLED_CONFIG);
        Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| bundled.get(key).cloned())
        })
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_API_URL) {
            match normalize_api_url(&raw) {
                Ok(url) => config.api_url = url,
                Err(err) => {
                    tracing::warn!("ignoring {ENV_API_URL}: {err:#}");
                }
            }
        }

        if let Some(raw) = lookup(ENV_LOCALE) {
            match raw.parse::<Locale>() {
                Ok(locale) => config.locale = locale,
                Err(err) => tracing::warn!("ignoring {ENV_LOCALE}: {err}"),
            }
        }

        if let Some(key) = lookup(ENV_STORAGE_KEY) {
            let key = key.trim();
            if !key.is_empty() {
                config.storage_key = key.to_string();
            }
        }

        config
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv() {}

/// Parse `KEY=VALUE` lines, skipping blanks and `#` comments.
pub fn parse_env_file(text: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"');
            vars.insert(key.trim().to_string(), value.to_string());
        }
    }
    vars
}

pub fn normalize_api_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = reqwest::Url::parse(trimmed).with_context(|| format!("invalid URL '{trimmed}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("unsupported scheme '{}'", url.scheme());
    }
    Ok(trimmed.to_string())
}
