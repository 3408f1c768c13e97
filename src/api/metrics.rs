//! `GET /metrics` in Prometheus text exposition format

use axum::{Router, http::header, response::IntoResponse, routing::get};
use prometheus::{Encoder, TextEncoder};

use crate::AppState;
use crate::error::AppError;
use crate::metrics::REGISTRY;

/// Routes for metrics scraping; no authentication
pub fn metrics_router() -> Router<AppState> {
    Router::new().route("/metrics", get(export_metrics))
}

async fn export_metrics() -> Result<impl IntoResponse, AppError> {
    let encoder = TextEncoder::new();
    let body = encoder
        .encode_to_string(&REGISTRY.gather())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to encode metrics: {e}")))?;

    Ok(([(header::CONTENT_TYPE, encoder.format_type().to_owned())], body))
}
