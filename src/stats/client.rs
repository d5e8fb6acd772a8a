//! Statistics service HTTP client.

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::StatsError;
use crate::matrix::Matrix;
use crate::metrics;
use crate::signing::bearer;

use super::types::StatsResponse;

/// Client for the downstream statistics endpoint.
#[derive(Debug, Clone)]
pub struct StatsClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Full URL of the statistics endpoint.
    url: String,
}

impl StatsClient {
    /// Create a new client from config with pooled connections.
    pub fn new(config: &Config) -> Result<Self, StatsError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .connect_timeout(config.http_timeout())
            .tcp_nodelay(true)
            .pool_max_idle_per_host(config.http_pool_size)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(StatsError::ClientBuild)?;

        Ok(Self::with_http(http, config.stats_api_url.clone()))
    }

    /// Create a client around an existing HTTP client.
    pub fn with_http(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Send a matrix for analysis, authenticating with `token`.
    #[instrument(skip(self, matrix, token), fields(url = %self.url, rows = matrix.row_count()))]
    pub async fn calculate(&self, matrix: &Matrix, token: &str) -> Result<StatsResponse, StatsError> {
        let start = Instant::now();

        let response = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, bearer(token))
            .json(matrix)
            .send()
            .await;
        metrics::record_stats_call_latency(start);

        let response = response.map_err(|source| {
            warn!(error = %source, "Statistics service unreachable");
            metrics::inc_stats_failures("unreachable");
            StatsError::Unreachable {
                url: self.url.clone(),
                source,
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_else(|e| {
                warn!(error = %e, "Failed to read statistics service error body");
                String::new()
            });
            warn!(status = status.as_u16(), "Statistics service returned an error");
            metrics::inc_stats_failures("upstream");
            return Err(StatsError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let stats: StatsResponse = response.json().await.map_err(|e| {
            metrics::inc_stats_failures("invalid_response");
            StatsError::InvalidResponse(e.to_string())
        })?;

        debug!(message = %stats.message, "Statistics received");
        Ok(stats)
    }
}
