//! Operational HTTP endpoints.
//!
//! - `/healthz`  : liveness
//! - `/metrics`  : Prometheus text format

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::registry::Registry;
use crate::text;

pub fn build_router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .with_state(registry)
}

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn metrics(State(registry): State<Arc<Registry>>) -> Response {
    let body = text::encode(&registry.gather());

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, text::CONTENT_TYPE)],
        body,
    )
        .into_response()
}
