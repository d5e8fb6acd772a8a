//! HTTP API handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::error::{ApiError, ApiResult};
use crate::config::Config;
use crate::error::ServiceError;
use crate::matrix::{rotate_clockwise, Dimensions, Matrix};
use crate::metrics;
use crate::signing::TokenSigner;
use crate::stats::{MatrixStats, StatsClient};

/// Message returned on a completed rotate-and-send.
pub const COMPLETED_MESSAGE: &str = "rotation complete; statistics computed downstream";

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Mints bearer tokens for the statistics service.
    pub signer: Arc<TokenSigner>,
    /// Statistics service client.
    pub stats: StatsClient,
}

impl AppState {
    /// Create new app state.
    pub fn new(signer: TokenSigner, stats: StatsClient) -> Self {
        Self {
            signer: Arc::new(signer),
            stats,
        }
    }

    /// Build state from application config.
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        Ok(Self::new(
            TokenSigner::from_config(config)?,
            StatsClient::new(config)?,
        ))
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Rotation-only response.
#[derive(Debug, Serialize)]
pub struct RotateResponse {
    /// Rows in the rotated matrix.
    pub rows: usize,
    /// Columns in the rotated matrix.
    pub cols: usize,
    /// The rotated matrix.
    pub matrix_rotated: Matrix,
}

/// Rotate-and-send response.
#[derive(Debug, Serialize)]
pub struct RotateAndSendResponse {
    /// Completion message.
    pub message: &'static str,
    /// Rows in the submitted matrix.
    pub original_rows: usize,
    /// Columns in the submitted matrix.
    pub original_cols: usize,
    /// The rotated matrix that was sent downstream.
    pub matrix_rotated: Matrix,
    /// Statistics computed by the statistics service.
    pub statistics: MatrixStats,
}

/// Decode the body and rotate it, recording the outcome.
fn decode_and_rotate(
    payload: Result<Json<Matrix>, JsonRejection>,
) -> ApiResult<(Dimensions, Matrix)> {
    let Json(matrix) = payload.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::InvalidBody(rejection.body_text())
    })?;

    let rotated = rotate_clockwise(&matrix).map_err(|err| {
        info!(kind = %err.kind(), error = %err, "Matrix rejected");
        metrics::inc_rotations_rejected(err.kind());
        err
    })?;
    let dims = Dimensions {
        rows: matrix.row_count(),
        cols: matrix.rows().first().map_or(0, Vec::len),
    };
    metrics::inc_rotations();

    Ok((dims, rotated))
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Metrics handler - Prometheus text exposition.
pub async fn prometheus_metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::render(),
    )
}

/// Rotate a matrix without contacting the statistics service.
#[instrument(skip_all)]
pub async fn rotate(
    payload: Result<Json<Matrix>, JsonRejection>,
) -> ApiResult<Json<RotateResponse>> {
    let start = Instant::now();
    let result = decode_and_rotate(payload).map(|(dims, rotated)| {
        let Dimensions { rows, cols } = dims.transposed();
        Json(RotateResponse {
            rows,
            cols,
            matrix_rotated: rotated,
        })
    });
    metrics::record_request_latency(start, "rotate");
    result
}

/// Rotate a matrix, send it to the statistics service and relay the result.
#[instrument(skip_all)]
pub async fn rotate_and_send(
    State(state): State<AppState>,
    payload: Result<Json<Matrix>, JsonRejection>,
) -> ApiResult<Json<RotateAndSendResponse>> {
    let start = Instant::now();
    let result = relay(&state, payload).await;
    metrics::record_request_latency(start, "rotate_and_send");
    result.map(Json)
}

async fn relay(
    state: &AppState,
    payload: Result<Json<Matrix>, JsonRejection>,
) -> ApiResult<RotateAndSendResponse> {
    let (dims, rotated) = decode_and_rotate(payload)?;

    let token = state.signer.sign().map_err(|err| {
        warn!(error = %err, "Failed to sign token");
        err
    })?;

    let response = state.stats.calculate(&rotated, &token).await?;
    info!(
        rows = dims.rows,
        cols = dims.cols,
        "Rotated matrix and received statistics"
    );

    Ok(RotateAndSendResponse {
        message: COMPLETED_MESSAGE,
        original_rows: dims.rows,
        original_cols: dims.cols,
        matrix_rotated: rotated,
        statistics: response.stats,
    })
}
