use axum::{Json, routing::get};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Liveness {
    status: &'static str,
    version: &'static str,
}

async fn live() -> Json<Liveness> {
    Json(Liveness {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> axum::Router<crate::state::AppState> {
    axum::Router::new().route("/health", get(live))
}
