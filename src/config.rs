use std::{fmt, str::FromStr, time::Duration};

use axum::http::HeaderValue;

const DEFAULT_BASE_URL: &str = "https://api.paystack.co";
const DEFAULT_PORT: u16 = 3030;
const DEFAULT_TIMEOUT_MS: u64 = 8_000;
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 250;
const DEFAULT_RETRY_MAX_DELAY_MS: u64 = 2_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} env is not defined")]
    Missing(&'static str),
    #[error("{0} env is empty")]
    Empty(&'static str),
    #[error("{name} env has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
    #[error("PAYSTACK_SECRET_KEY contains characters not allowed in a header")]
    InvalidSecret,
    #[error("failed to build http client: {0}")]
    HttpClient(reqwest::Error),
}

/// Paystack secret key. Never printed.
#[derive(Clone)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ConfigError> {
        let key = key.into();
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::Empty("PAYSTACK_SECRET_KEY"));
        }
        if HeaderValue::from_str(&format!("Bearer {key}")).is_err() {
            return Err(ConfigError::InvalidSecret);
        }
        Ok(Self(key.to_owned()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Delay to wait after the failed `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_RETRY_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_RETRY_MAX_DELAY_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub secret_key: SecretKey,
    pub base_url: String,
    pub port: u16,
    pub upstream_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn new(secret_key: SecretKey, base_url: impl Into<String>) -> Self {
        Self {
            secret_key,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            port: DEFAULT_PORT,
            upstream_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry: RetryPolicy::default(),
        }
    }

    /// Short timeout and near-zero backoff for tests against a local stub.
    #[cfg(test)]
    pub fn for_tests(base_url: &str) -> Self {
        let mut config = Self::new(SecretKey("sk_test_secret".into()), base_url);
        config.upstream_timeout = Duration::from_millis(300);
        config.retry = RetryPolicy {
            attempts: 3,
            base_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(20),
        };
        config
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let Some(secret) = lookup("PAYSTACK_SECRET_KEY") else {
            return Err(ConfigError::Missing("PAYSTACK_SECRET_KEY"));
        };
        let secret_key = SecretKey::new(secret)?;
        let base_url = lookup("PAYSTACK_BASE_URL");
        let base_url = base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);

        let mut config = Self::new(secret_key, base_url);
        config.port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let timeout_ms = parse_or(&lookup, "UPSTREAM_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;
        config.upstream_timeout = Duration::from_millis(timeout_ms);

        let attempts = parse_or(&lookup, "UPSTREAM_RETRY_ATTEMPTS", DEFAULT_RETRY_ATTEMPTS)?;
        if attempts == 0 {
            return Err(ConfigError::Invalid {
                name: "UPSTREAM_RETRY_ATTEMPTS",
                value: attempts.to_string(),
            });
        }
        let delay_ms = parse_or(&lookup, "UPSTREAM_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS)?;
        let max_delay_ms = parse_or(
            &lookup,
            "UPSTREAM_RETRY_MAX_DELAY_MS",
            DEFAULT_RETRY_MAX_DELAY_MS,
        )?;
        config.retry = RetryPolicy {
            attempts,
            base_delay: Duration::from_millis(delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        };
        Ok(config)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
