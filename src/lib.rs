//! Matrix rotation relay service.
//!
//! Accepts a 2D integer matrix over HTTP, rotates it 90 degrees clockwise,
//! signs a short-lived bearer token and forwards the rotated matrix to a
//! downstream statistics service, relaying the computed statistics back.
//!
//! # Rotation
//!
//! An M×N input becomes an N×M output with `output[j][M-1-i] = input[i][j]`:
//!
//! ```text
//! [[1, 2, 3],        [[4, 1],
//!  [4, 5, 6]]   ->    [5, 2],
//!                     [6, 3]]
//! ```
//!
//! Inputs with no rows, or with rows of differing length, are rejected
//! before any work is done.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`matrix`]: Matrix type, validation and rotation
//! - [`signing`]: Bearer token minting
//! - [`stats`]: Statistics service client
//! - [`api`]: HTTP API
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod matrix;
pub mod metrics;
pub mod signing;
pub mod stats;
pub mod utils;

pub use config::Config;
pub use error::{MatrixError, Result, ServiceError};
pub use matrix::{rotate_clockwise, Matrix};
