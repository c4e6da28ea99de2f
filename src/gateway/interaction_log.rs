use std::time::Instant;

use crate::gateway::GatewayError;

/// Record of a single upstream exchange. Only masked bodies are stored.
#[derive(Debug)]
pub struct InteractionSpan {
    created: Instant,
    url: String,
    attempt: u32,
    response: Option<serde_json::Value>,
    response_status: Option<u16>,
}

impl InteractionSpan {
    pub fn enter(url: &str, attempt: u32) -> Self {
        Self {
            created: Instant::now(),
            url: url.to_owned(),
            attempt,
            response: None,
            response_status: None,
        }
    }

    pub fn set_response(&mut self, secured: serde_json::Value) {
        self.response = Some(secured);
    }

    pub fn set_response_status(&mut self, status: u16) {
        self.response_status = Some(status);
    }

    pub fn finish(self, kind: &str, error: Option<&GatewayError>) {
        let duration_ms = self.created.elapsed().as_millis() as u64;
        let response = self
            .response
            .map(|r| r.to_string())
            .unwrap_or_default();
        match error {
            None => tracing::info!(
                gateway = "paystack",
                kind,
                url = %self.url,
                attempt = self.attempt,
                status = self.response_status,
                duration_ms,
                %response,
                "Gateway interaction"
            ),
            Some(e) => tracing::warn!(
                gateway = "paystack",
                kind,
                url = %self.url,
                attempt = self.attempt,
                status = self.response_status,
                duration_ms,
                %response,
                error = %e,
                "Gateway interaction failed"
            ),
        }
    }
}
