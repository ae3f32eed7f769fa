use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::info;

use crate::domain::{DEFAULT_PREFIX, IsbnGenerator, RetryPolicy};
use crate::infrastructure::google_books::DEFAULT_API_URL;

pub const API_URL: &str = "BOOKSWIPE_API_URL";
pub const ISBN_PREFIX: &str = "BOOKSWIPE_ISBN_PREFIX";
pub const RETRY_DELAY_MS: &str = "BOOKSWIPE_RETRY_DELAY_MS";
pub const MAX_ATTEMPTS: &str = "BOOKSWIPE_MAX_ATTEMPTS";
pub const HTTP_TIMEOUT_SECS: &str = "BOOKSWIPE_HTTP_TIMEOUT_SECS";
pub const LOG_FILE: &str = "BOOKSWIPE_LOG_FILE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub generator: IsbnGenerator,
    pub retry: RetryPolicy,
    pub http_timeout: Duration,
    pub log_file: PathBuf,
    /// Keys that were not set and fell back to their default
    pub defaulted: Vec<&'static str>,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_source<F>(source: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut loader = Loader {
            source,
            defaulted: Vec::new(),
        };

        let api_url: String = loader.load(API_URL, DEFAULT_API_URL)?;
        reqwest::Url::parse(&api_url).map_err(|e| invalid(API_URL, &api_url, e))?;

        let prefix: String = loader.load(ISBN_PREFIX, DEFAULT_PREFIX)?;
        let generator = IsbnGenerator::new(&prefix).map_err(|e| invalid(ISBN_PREFIX, &prefix, e))?;

        let delay_ms: u64 = loader.load(RETRY_DELAY_MS, "500")?;
        if delay_ms == 0 {
            return Err(invalid(RETRY_DELAY_MS, "0", "must be at least 1"));
        }
        let max_attempts: u32 = loader.load(MAX_ATTEMPTS, "0")?;
        let timeout_secs: u64 = loader.load(HTTP_TIMEOUT_SECS, "30")?;
        if timeout_secs == 0 {
            return Err(invalid(HTTP_TIMEOUT_SECS, "0", "must be at least 1"));
        }

        let default_log = env::temp_dir().join("bookswipe.log");
        let log_file: String = loader.load(LOG_FILE, &default_log.to_string_lossy())?;

        Ok(Self {
            api_url,
            generator,
            retry: RetryPolicy {
                delay: Duration::from_millis(delay_ms),
                max_attempts: (max_attempts > 0).then_some(max_attempts),
            },
            http_timeout: Duration::from_secs(timeout_secs),
            log_file: PathBuf::from(log_file),
            defaulted: loader.defaulted,
        })
    }

    /// Writes the effective settings to the log.
    pub fn log_summary(&self) {
        for key in &self.defaulted {
            info!("{key} not set, using default");
        }
        info!(
            api_url = %self.api_url,
            prefix = self.generator.prefix(),
            retry_delay_ms = self.retry.delay.as_millis() as u64,
            max_attempts = ?self.retry.max_attempts,
            http_timeout_secs = self.http_timeout.as_secs(),
            "configuration loaded"
        );
    }
}

struct Loader<F> {
    source: F,
    defaulted: Vec<&'static str>,
}

impl<F: Fn(&str) -> Option<String>> Loader<F> {
    fn load<T: FromStr>(&mut self, key: &'static str, default: &str) -> Result<T, ConfigError>
    where
        T::Err: Display,
    {
        let value = (self.source)(key).unwrap_or_else(|| {
            self.defaulted.push(key);
            default.to_string()
        });
        value.trim().parse().map_err(|e| invalid(key, &value, e))
    }
}

fn invalid(key: &'static str, value: &str, reason: impl Display) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
