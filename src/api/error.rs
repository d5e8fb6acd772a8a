//! Mapping of service errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::error::{MatrixError, SigningError, StatsError};

/// Message returned when the request body is not a matrix.
pub const INVALID_BODY_MESSAGE: &str =
    "invalid request body: expected an array of arrays of integers";

/// Errors surfaced by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Body could not be decoded as a matrix.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Matrix failed validation.
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    /// Token could not be signed.
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// Statistics service call failed.
    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// API result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Machine-readable tag for validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    /// Raw body relayed from the statistics service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: None,
            details: None,
        }
    }
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) | ApiError::Matrix(_) => StatusCode::BAD_REQUEST,
            ApiError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Stats(StatsError::Unreachable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Stats(StatsError::Upstream { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::Stats(StatsError::InvalidResponse(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Stats(StatsError::ClientBuild(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::InvalidBody(_) => ErrorResponse::message(INVALID_BODY_MESSAGE),
            ApiError::Matrix(err) => ErrorResponse {
                error: err.to_string(),
                kind: Some(err.kind().into()),
                details: None,
            },
            ApiError::Signing(_) => ErrorResponse::message("failed to sign token"),
            ApiError::Stats(StatsError::Unreachable { .. }) => {
                ErrorResponse::message("statistics service unreachable")
            }
            ApiError::Stats(StatsError::Upstream { body, .. }) => ErrorResponse {
                error: "statistics service returned an error".to_string(),
                kind: None,
                details: Some(body),
            },
            ApiError::Stats(StatsError::InvalidResponse(_)) => {
                ErrorResponse::message("invalid response from statistics service")
            }
            ApiError::Stats(StatsError::ClientBuild(_)) => {
                ErrorResponse::message("internal error")
            }
        };

        (status, Json(body)).into_response()
    }
}
