use reqwest::StatusCode;

/// Paystack error body, e.g. `{"status": false, "message": "Transaction reference not found"}`
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("upstream request timed out")]
    Timeout,
    #[error("http request error: {0}")]
    Request(reqwest::Error),
    #[error("gateway responded with {status}: {message}")]
    UpstreamStatus { status: StatusCode, message: String },
    #[error("malformed gateway response: {0}")]
    Malformed(String),
}

impl GatewayError {
    /// Whether another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Timeout | GatewayError::Request(_) => true,
            GatewayError::UpstreamStatus { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            GatewayError::Malformed(_) => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout)
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_timeout() {
            return Self::Timeout;
        }
        if value.is_decode() {
            return Self::Malformed("failed to decode response body".into());
        }
        // The url only carries the reference, which is logged with every interaction anyway
        Self::Request(value)
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value.to_string())
    }
}
