use crate::gateway::PaystackGateway;

#[derive(Debug, Clone, axum::extract::FromRef)]
pub struct AppState {
    pub gate: PaystackGateway,
}

impl AppState {
    pub fn new(gate: PaystackGateway) -> Self {
        Self { gate }
    }
}
