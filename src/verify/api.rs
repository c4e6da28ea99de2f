use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use axum_extra::{TypedHeader, headers::RetryAfter};
use serde::Serialize;
use tracing::instrument;

use crate::{
    gateway::PaystackGateway,
    state::AppState,
    verify::{self, ProviderStatus, Result, VerificationRequest, VerificationResult, VerifyError},
};

const RETRY_AFTER: Duration = Duration::from_secs(1);

#[instrument(skip_all)]
pub async fn verify_payment(
    State(gate): State<PaystackGateway>,
    Json(request): Json<VerificationRequest>,
) -> Result<VerifyResponse> {
    tracing::debug!(reference = ?request.reference, "Verify payment request");
    let result = verify::verify(&gate, request).await?;
    tracing::info!(provider_status = %result.provider_status(), "Payment verified");
    Ok(result.into())
}

/// Body shape shared by every outcome of `/api/verify-payment`
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<ProviderStatus>,
}

impl VerifyResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            status: None,
        }
    }
}

impl From<VerificationResult> for VerifyResponse {
    fn from(value: VerificationResult) -> Self {
        Self {
            success: value.verified(),
            message: value.message().to_owned(),
            status: Some(value.provider_status()),
        }
    }
}

impl IntoResponse for VerifyResponse {
    fn into_response(self) -> Response {
        axum::Json(self).into_response()
    }
}

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        match self {
            VerifyError::InvalidRequest(reason) => {
                tracing::warn!(%reason, "Rejected verification request");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    axum::Json(VerifyResponse::failure(reason)),
                )
                    .into_response()
            }
            VerifyError::PaymentNotSuccessful(result) => {
                tracing::info!(provider_status = %result.provider_status(), "Payment not successful");
                (StatusCode::BAD_REQUEST, axum::Json(VerifyResponse::from(result))).into_response()
            }
            VerifyError::Upstream(e) => {
                tracing::error!("Failed to verify payment with gateway: {e}");
                let (status, message) = if e.is_timeout() {
                    (
                        StatusCode::GATEWAY_TIMEOUT,
                        "Payment provider timed out, please retry",
                    )
                } else {
                    (
                        StatusCode::BAD_GATEWAY,
                        "Payment provider unavailable, please retry",
                    )
                };
                (
                    status,
                    TypedHeader(RetryAfter::delay(RETRY_AFTER)),
                    axum::Json(VerifyResponse::failure(message)),
                )
                    .into_response()
            }
        }
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new().route("/api/verify-payment", post(verify_payment))
}

/// `Json` extractor wrapper that turns body rejections into [`VerifyError::InvalidRequest`]
pub struct Json<T>(pub T);

impl<S, T> axum::extract::FromRequest<S> for Json<T>
where
    T: serde::de::DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = VerifyError;

    async fn from_request(
        req: axum::http::Request<axum::body::Body>,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(e) => {
                let rejection = e.body_text();
                tracing::debug!(%rejection, "Invalid verification body");
                Err(VerifyError::InvalidRequest(rejection))
            }
        }
    }
}
