//! Session configuration.
//!
//! Layering, lowest to highest: built-in defaults, an optional JSON file,
//! environment variables, then whatever the caller (the CLI) overrides.
//! Every field has a default so a config file may name only what it changes.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::highlight::SanitizePolicy;
use crate::request::{FIRST_PAGE_LIMIT, PAGE_SIZE};

pub const BASE_URL_ENV: &str = "EPISODE_SEARCH_BASE_URL";
pub const TIMEOUT_ENV: &str = "EPISODE_SEARCH_TIMEOUT_MS";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Root of the backend; `/api/episodes` is appended.
    pub base_url: String,
    /// Rows requested by the first search of a query.
    pub first_page_limit: usize,
    /// Rows requested by each "load more".
    pub page_size: usize,
    /// Upper bound on a single backend request.
    pub request_timeout_ms: u64,
    pub sanitize: SanitizePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            first_page_limit: FIRST_PAGE_LIMIT,
            page_size: PAGE_SIZE,
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            sanitize: SanitizePolicy::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Apply `EPISODE_SEARCH_*` overrides from the process environment.
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (tests pass a map).
    pub fn apply_env_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            self.request_timeout_ms = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid("request_timeout_ms", format!("not a number: {raw:?}")))?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("base_url", "must not be empty"));
        }
        if self.first_page_limit == 0 {
            return Err(ConfigError::invalid("first_page_limit", "must be positive"));
        }
        if self.page_size == 0 {
            return Err(ConfigError::invalid("page_size", "must be positive"));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::invalid("request_timeout_ms", "must be positive"));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
