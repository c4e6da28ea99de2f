use std::fmt;

use serde::{Deserialize, Serialize};

use crate::gateway::{GatewayError, PaystackGateway};

pub mod api;

pub type Result<T> = std::result::Result<T, VerifyError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderStatus {
    Success,
    Failed,
    Pending,
    Abandoned,
    Unknown,
}

impl fmt::Display for ProviderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Pending => "pending",
            Self::Abandoned => "abandoned",
            Self::Unknown => "unknown",
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerificationRequest {
    /// Transaction reference issued by Paystack at charge time
    #[serde(default)]
    pub reference: Option<String>,
}

/// Normalized verdict. `verified` is derived from the provider status and can't be set directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    verified: bool,
    provider_status: ProviderStatus,
    message: String,
}

impl VerificationResult {
    pub const VERIFIED_MESSAGE: &'static str = "Payment verified";
    pub const DECLINED_MESSAGE: &'static str = "Payment not successful";

    pub fn new(provider_status: ProviderStatus) -> Self {
        let verified = provider_status == ProviderStatus::Success;
        let message = if verified {
            Self::VERIFIED_MESSAGE
        } else {
            Self::DECLINED_MESSAGE
        };
        Self {
            verified,
            provider_status,
            message: message.into(),
        }
    }

    pub fn verified(&self) -> bool {
        self.verified
    }

    pub fn provider_status(&self) -> ProviderStatus {
        self.provider_status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("payment not successful, provider status {}", .0.provider_status())]
    PaymentNotSuccessful(VerificationResult),
    #[error("upstream error: {0}")]
    Upstream(#[from] GatewayError),
}

/// Verify a transaction reference against Paystack.
///
/// Empty and dot-segment references are rejected before any network call. A declined payment is returned as
/// [`VerifyError::PaymentNotSuccessful`], distinct from upstream failures.
pub async fn verify(
    gate: &PaystackGateway,
    request: VerificationRequest,
) -> Result<VerificationResult> {
    let reference = request
        .reference
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| VerifyError::InvalidRequest("Transaction reference is required".into()))?;
    // Dot segments would be resolved away and change the upstream path
    if matches!(reference, "." | "..") {
        return Err(VerifyError::InvalidRequest(
            "Transaction reference is invalid".into(),
        ));
    }

    let response = gate.verify_transaction(reference).await?;
    let result = VerificationResult::from(&response);
    tracing::debug!(
        %reference,
        provider_status = %result.provider_status(),
        gateway_response = response.data.gateway_response.as_deref().unwrap_or_default(),
        "Resolved transaction status"
    );
    if result.verified() {
        Ok(result)
    } else {
        Err(VerifyError::PaymentNotSuccessful(result))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use super::{ProviderStatus, VerificationRequest, VerificationResult, VerifyError, verify};
    use crate::{config::Config, gateway::PaystackGateway};

    fn request(reference: &str) -> VerificationRequest {
        VerificationRequest {
            reference: Some(reference.into()),
        }
    }

    async fn stub(status: &str) -> (MockServer, PaystackGateway) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "message": "Verification successful",
                "data": { "status": status }
            })))
            .mount(&server)
            .await;
        let gate = PaystackGateway::new(&Config::for_tests(&server.uri())).unwrap();
        (server, gate)
    }

    #[test]
    fn verified_only_on_success() {
        for status in [
            ProviderStatus::Failed,
            ProviderStatus::Pending,
            ProviderStatus::Abandoned,
            ProviderStatus::Unknown,
        ] {
            let result = VerificationResult::new(status);
            assert!(!result.verified());
            assert_eq!(result.message(), "Payment not successful");
        }
        let result = VerificationResult::new(ProviderStatus::Success);
        assert!(result.verified());
        assert_eq!(result.provider_status(), ProviderStatus::Success);
    }

    #[tokio::test]
    async fn success_is_verified() {
        let (_server, gate) = stub("success").await;
        let result = verify(&gate, request("txn_123")).await.unwrap();
        assert!(result.verified());
        assert_eq!(result.provider_status(), ProviderStatus::Success);
    }

    #[tokio::test]
    async fn non_success_statuses_are_declined() {
        let cases = [
            ("failed", ProviderStatus::Failed),
            ("abandoned", ProviderStatus::Abandoned),
            ("ongoing", ProviderStatus::Pending),
            ("reversed", ProviderStatus::Failed),
            ("something_new", ProviderStatus::Unknown),
        ];
        for (upstream, expected) in cases {
            let (_server, gate) = stub(upstream).await;
            match verify(&gate, request("txn_456")).await {
                Err(VerifyError::PaymentNotSuccessful(result)) => {
                    assert!(!result.verified());
                    assert_eq!(result.provider_status(), expected);
                }
                other => panic!("{upstream}: unexpected outcome {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn empty_reference_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let gate = PaystackGateway::new(&Config::for_tests(&server.uri())).unwrap();

        for request in [
            VerificationRequest { reference: None },
            request(""),
            request("   "),
        ] {
            let err = verify(&gate, request).await.unwrap_err();
            assert!(matches!(err, VerifyError::InvalidRequest(_)));
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dot_segment_reference_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let gate = PaystackGateway::new(&Config::for_tests(&server.uri())).unwrap();

        for reference in [".", ".."] {
            let err = verify(&gate, request(reference)).await.unwrap_err();
            assert!(matches!(err, VerifyError::InvalidRequest(_)), "{reference}");
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dotted_reference_keeps_its_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transaction/verify/...x"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "message": "Verification successful",
                "data": { "status": "success" }
            })))
            .expect(1)
            .mount(&server)
            .await;
        let gate = PaystackGateway::new(&Config::for_tests(&server.uri())).unwrap();
        let result = verify(&gate, request("...x")).await.unwrap();
        assert!(result.verified());
    }

    #[tokio::test]
    async fn reference_is_forwarded_unmodified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transaction/verify/T-789_aBc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "message": "Verification successful",
                "data": { "status": "success" }
            })))
            .expect(1)
            .mount(&server)
            .await;
        let gate = PaystackGateway::new(&Config::for_tests(&server.uri())).unwrap();
        let result = verify(&gate, request("T-789_aBc")).await.unwrap();
        assert!(result.verified());
    }

    #[tokio::test]
    async fn upstream_outage_is_not_a_decline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;
        let gate = PaystackGateway::new(&Config::for_tests(&server.uri())).unwrap();
        let err = verify(&gate, request("txn_123")).await.unwrap_err();
        assert!(matches!(err, VerifyError::Upstream(_)));
    }
}
