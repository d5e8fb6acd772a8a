//! Unified error types for the matrix relay service.

use strum::{Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Unified error type for the matrix relay service.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Matrix validation error.
    #[error("matrix error: {0}")]
    Matrix(#[from] MatrixError),

    /// Token signing error.
    #[error("signing error: {0}")]
    Signing(#[from] SigningError),

    /// Statistics service error.
    #[error("stats error: {0}")]
    Stats(#[from] StatsError),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Matrix validation errors.
///
/// Both variants are raised before any rotation work begins, so a failed
/// call never produces partial output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// The matrix has no rows.
    #[error("matrix must not be empty")]
    EmptyMatrix,

    /// A row's length differs from the first row's length.
    #[error("matrix must be rectangular: row {row} has {len} columns, expected {expected}")]
    NonRectangularMatrix {
        /// Index of the first offending row.
        row: usize,
        /// Actual length of that row.
        len: usize,
        /// Length of row 0.
        expected: usize,
    },
}

/// Tag identifying a [`MatrixError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum MatrixErrorKind {
    /// See [`MatrixError::EmptyMatrix`].
    EmptyMatrix,
    /// See [`MatrixError::NonRectangularMatrix`].
    NonRectangularMatrix,
}

impl MatrixError {
    /// Get the kind of this error.
    pub fn kind(&self) -> MatrixErrorKind {
        match self {
            MatrixError::EmptyMatrix => MatrixErrorKind::EmptyMatrix,
            MatrixError::NonRectangularMatrix { .. } => MatrixErrorKind::NonRectangularMatrix,
        }
    }
}

/// Bearer token signing errors.
#[derive(Error, Debug)]
pub enum SigningError {
    /// The configured secret cannot be used.
    #[error("invalid signing secret: {0}")]
    InvalidSecret(String),

    /// Encoding the token failed.
    #[error("failed to encode token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    /// Decoding or validating a token failed.
    #[error("failed to verify token: {0}")]
    Verify(#[source] jsonwebtoken::errors::Error),

    /// Expiry timestamp could not be computed.
    #[error("token expiry out of range: ttl={ttl_seconds}s")]
    ExpiryOutOfRange {
        /// Configured time-to-live.
        ttl_seconds: u64,
    },
}

/// Downstream statistics service errors.
#[derive(Error, Debug)]
pub enum StatsError {
    /// The request never produced a response (connect, timeout, TLS...).
    #[error("statistics service unreachable at {url}: {source}")]
    Unreachable {
        /// Endpoint that was called.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-200 status.
    #[error("statistics service returned {status}: {body}")]
    Upstream {
        /// HTTP status code returned by the service.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The service answered 200 with a body we could not decode.
    #[error("invalid response from statistics service: {0}")]
    InvalidResponse(String),

    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn empty_matrix_message() {
        assert_eq!(MatrixError::EmptyMatrix.to_string(), "matrix must not be empty");
    }

    #[test]
    fn non_rectangular_message_cites_row_and_lengths() {
        let err = MatrixError::NonRectangularMatrix {
            row: 1,
            len: 2,
            expected: 3,
        };
        assert_eq!(
            err.to_string(),
            "matrix must be rectangular: row 1 has 2 columns, expected 3"
        );
    }

    #[test]
    fn kind_tags_round_trip_through_strings() {
        let kind = MatrixError::EmptyMatrix.kind();
        assert_eq!(kind.to_string(), "empty_matrix");
        assert_eq!(
            MatrixErrorKind::from_str("non_rectangular_matrix").unwrap(),
            MatrixErrorKind::NonRectangularMatrix
        );
    }

    #[test]
    fn service_error_wraps_matrix_error() {
        let err: ServiceError = MatrixError::EmptyMatrix.into();
        assert!(matches!(err, ServiceError::Matrix(MatrixError::EmptyMatrix)));
        assert_eq!(err.to_string(), "matrix error: matrix must not be empty");
    }
}
