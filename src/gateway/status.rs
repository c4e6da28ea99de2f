use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::gateway::{
    GatewayError, PaystackGateway, Result, error::ErrorResponse, interaction_log::InteractionSpan,
    mask,
};

#[derive(Debug, Serialize, Deserialize)]
pub struct PaystackStatusResponse {
    pub status: bool,
    pub message: String,
    pub data: PaystackTransaction,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaystackTransaction {
    pub status: PaystackTransactionStatus,
    #[serde(default)]
    pub reference: Option<String>,
    /// Amount in minor units (kobo, pesewas, cents)
    #[serde(default)]
    pub amount: Option<u64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub gateway_response: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaystackTransactionStatus {
    Success,
    Failed,
    Reversed,
    Abandoned,
    Pending,
    Ongoing,
    Processing,
    Queued,
    #[serde(other)]
    Unknown,
}

impl PaystackGateway {
    fn status_url(&self, reference: &str) -> Url {
        let mut url = self.base_url.clone();
        // Base url is checked to be a base in `PaystackGateway::new`
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["transaction", "verify", reference]);
        }
        url
    }

    /// Query transaction status, retrying transient failures.
    ///
    /// All attempts and backoff sleeps share one deadline, exceeding it yields
    /// [`GatewayError::Timeout`].
    pub async fn verify_transaction(&self, reference: &str) -> Result<PaystackStatusResponse> {
        let url = self.status_url(reference);
        let attempts = self.fetch_with_retry(&url);
        match tokio::time::timeout(self.deadline, attempts).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    deadline_ms = self.deadline.as_millis() as u64,
                    "Gateway deadline exceeded"
                );
                Err(GatewayError::Timeout)
            }
        }
    }

    async fn fetch_with_retry(&self, url: &Url) -> Result<PaystackStatusResponse> {
        let mut attempt = 1;
        loop {
            match self.fetch_status(url, attempt).await {
                Ok(res) => return Ok(res),
                Err(e) if e.is_transient() && attempt < self.retry.attempts => {
                    let delay = self.retry.backoff(attempt);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Transient gateway failure, retrying: {e}"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_status(&self, url: &Url, attempt: u32) -> Result<PaystackStatusResponse> {
        let mut span = InteractionSpan::enter(url.as_str(), attempt);
        let result = self.fetch_status_once(url, &mut span).await;
        span.finish("status", result.as_ref().err());
        result
    }

    async fn fetch_status_once(
        &self,
        url: &Url,
        span: &mut InteractionSpan,
    ) -> Result<PaystackStatusResponse> {
        tracing::debug!(%url, "Gateway API status request");
        let response = self
            .client
            .get(url.clone())
            .headers(self.auth_headers.clone())
            .send()
            .await?;
        let status = response.status();
        span.set_response_status(status.as_u16());
        let body = response.bytes().await?;

        let value = match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(value) => value,
            Err(_) if !status.is_success() => {
                return Err(GatewayError::UpstreamStatus {
                    status,
                    message: String::new(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let secured_response = mask::secure_value(&value);
        tracing::debug!(data = %secured_response, %status, "Gateway API status response");
        span.set_response(secured_response);

        if !status.is_success() {
            let message = serde_json::from_value::<ErrorResponse>(value)
                .map(|e| e.message)
                .unwrap_or_default();
            return Err(GatewayError::UpstreamStatus { status, message });
        }

        let result: PaystackStatusResponse = serde_json::from_value(value)?;
        if !result.status {
            return Err(GatewayError::Malformed(format!(
                "gateway reported failure with success status: {}",
                result.message
            )));
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{PaystackStatusResponse, PaystackTransactionStatus};

    #[test]
    fn parses_unknown_status() {
        let res: PaystackStatusResponse = serde_json::from_value(json!({
            "status": true,
            "message": "Verification successful",
            "data": { "status": "chargeback", "reference": "txn_1" }
        }))
        .unwrap();
        assert_eq!(res.data.status, PaystackTransactionStatus::Unknown);
        assert_eq!(res.data.reference.as_deref(), Some("txn_1"));
    }

    #[test]
    fn missing_status_is_malformed() {
        let res = serde_json::from_value::<PaystackStatusResponse>(json!({
            "status": true,
            "message": "Verification successful",
            "data": { "reference": "txn_1" }
        }));
        assert!(res.is_err());
    }
}
