//! Statistics service module.
//!
//! This module handles:
//! - Wire types for the statistics payload
//! - The authenticated HTTP client that posts rotated matrices

pub mod client;
pub mod types;

pub use client::StatsClient;
pub use types::{MatrixStats, StatsResponse};
