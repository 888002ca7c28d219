//! Resolver configuration.

use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

use crate::error::{ConfigError, ConfigResult};
use crate::icons::IconTable;
use crate::placeholder::CategoryTable;

/// Identifying user agent sent with every website fetch.
pub const DEFAULT_USER_AGENT: &str =
    "KidsActivitiesPreviewBot/1.0 (+https://kidsactivities.example/bot)";

/// Hard wall-clock bound for one website fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(5000);

pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// Preview tags live in `<head>`; nothing past this is scanned.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Keyword and image tables, swappable per deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageryTables {
    #[serde(default)]
    pub icons: IconTable,
    #[serde(default)]
    pub placeholders: CategoryTable,
}

impl ImageryTables {
    /// Load tables from a JSON document on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::TablesIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Everything needed to build an [`ImageResolver`](crate::ImageResolver).
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub user_agent: String,

    /// Per-fetch wall-clock bound. Default: 5000 ms.
    pub fetch_timeout: Duration,

    /// Cap on in-flight website fetches. Default: 8.
    pub max_concurrent_fetches: usize,

    /// Bytes of HTML scanned per page. Default: 1 MiB.
    pub max_body_bytes: usize,

    pub tables: ImageryTables,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            tables: ImageryTables::default(),
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Unset variables keep their defaults:
    /// - `PROVIDER_IMAGERY_USER_AGENT`
    /// - `PROVIDER_IMAGERY_FETCH_TIMEOUT_MS`
    /// - `PROVIDER_IMAGERY_MAX_CONCURRENT_FETCHES`
    /// - `PROVIDER_IMAGERY_MAX_BODY_BYTES`
    /// - `PROVIDER_IMAGERY_TABLES` (path to a JSON `ImageryTables` file)
    pub fn from_env() -> ConfigResult<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let mut config = Self::default();

        if let Ok(user_agent) = env::var("PROVIDER_IMAGERY_USER_AGENT") {
            if !user_agent.trim().is_empty() {
                config.user_agent = user_agent;
            }
        }
        if let Some(ms) = parse_var::<u64>("PROVIDER_IMAGERY_FETCH_TIMEOUT_MS")? {
            config.fetch_timeout = Duration::from_millis(ms);
        }
        if let Some(n) = parse_var::<usize>("PROVIDER_IMAGERY_MAX_CONCURRENT_FETCHES")? {
            config.max_concurrent_fetches = n;
        }
        if let Some(n) = parse_var::<usize>("PROVIDER_IMAGERY_MAX_BODY_BYTES")? {
            config.max_body_bytes = n;
        }
        if let Ok(path) = env::var("PROVIDER_IMAGERY_TABLES") {
            config.tables = ImageryTables::from_json_file(path)?;
        }

        Ok(config)
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max;
        self
    }

    pub fn with_max_body_bytes(mut self, max: usize) -> Self {
        self.max_body_bytes = max;
        self
    }

    pub fn with_tables(mut self, tables: ImageryTables) -> Self {
        self.tables = tables;
        self
    }
}

fn parse_var<T>(name: &'static str) -> ConfigResult<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidVar {
                name,
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
