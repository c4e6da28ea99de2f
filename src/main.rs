//! Payment verification gateway. It is split in 2 main modules:
//!
//! - [gateway] (Paystack upstream client)
//! - [verify] (verification verdicts and the `/api/verify-payment` surface)
#![doc = include_str!("../README.md")]

use std::net::{Ipv4Addr, SocketAddrV4};

use anyhow::Context;
use axum::{Router, http::Request};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;

mod config;
/// Paystack integration
///
/// This module defines the types and methods to query transaction status from Paystack.
mod gateway;
mod health;
mod state;
/// Verification Gateway
///
/// Normalizes upstream transaction status into a verdict and serves it over HTTP.
mod verify;

fn app(state: state::AppState) -> Router {
    Router::new()
        .merge(verify::api::router())
        .merge(health::router())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<axum::body::Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id,
                )
            }),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .init();

    match dotenvy::dotenv() {
        Ok(p) => tracing::info!(path = %p.display(), "Loaded environment variables from .env file"),
        Err(e) => tracing::warn!("Failed to load environment variables from .env: {e}"),
    };
    let config = config::Config::from_env().context("invalid configuration")?;
    tracing::info!(
        base_url = %config.base_url,
        timeout_ms = config.upstream_timeout.as_millis() as u64,
        retry_attempts = config.retry.attempts,
        "Loaded configuration"
    );
    let gate = gateway::PaystackGateway::new(&config).context("failed to build gateway client")?;
    let state = state::AppState::new(gate);

    let listener =
        tokio::net::TcpListener::bind(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, config.port))
            .await
            .with_context(|| format!("failed to bind port {}", config.port))?;

    tracing::info!("Serving on port {}", config.port);
    axum::serve(listener, app(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
