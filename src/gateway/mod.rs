use std::time::Duration;

use axum::http::HeaderMap;
use reqwest::Url;

use crate::config::{Config, ConfigError, RetryPolicy};

pub use error::GatewayError;
pub use status::{PaystackStatusResponse, PaystackTransactionStatus};

mod auth;
mod error;
/// Type conversions between Paystack and verification types
mod from;
/// Upstream interaction records
mod interaction_log;
/// Credential and card masking for logs
pub mod mask;
/// Paystack transaction status lookup
mod status;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Paystack API client. Cheap to clone, the connection pool is shared.
#[derive(Debug, Clone)]
pub struct PaystackGateway {
    client: reqwest::Client,
    base_url: Url,
    auth_headers: HeaderMap,
    retry: RetryPolicy,
    /// Budget for a whole verification, retries included
    deadline: Duration,
}

impl PaystackGateway {
    pub fn new(config: &Config) -> std::result::Result<Self, ConfigError> {
        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ConfigError::Invalid {
                name: "PAYSTACK_BASE_URL",
                value: config.base_url.clone(),
            })?;
        let client = reqwest::Client::builder()
            .timeout(config.upstream_timeout)
            .connect_timeout(config.upstream_timeout.min(Duration::from_secs(5)))
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self {
            client,
            base_url,
            auth_headers: auth::authenticated_headers(&config.secret_key)?,
            retry: config.retry.clone(),
            deadline: config.upstream_timeout,
        })
    }
}
