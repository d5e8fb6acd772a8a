//! Application configuration loaded from environment variables.

use serde::Deserialize;
use url::Url;

/// Minimum accepted length of the HS256 signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 16;

/// Application configuration loaded from environment variables.
#[derive(Clone, Deserialize)]
pub struct Config {
    // === Token Signing ===
    /// HS256 secret used to sign bearer tokens for the statistics API.
    pub jwt_secret: String,

    /// Value of the `user_id` claim.
    #[serde(default = "default_jwt_subject")]
    pub jwt_subject: String,

    /// Token lifetime in seconds.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,

    // === Statistics Service ===
    /// Endpoint that receives rotated matrices.
    #[serde(default = "default_stats_url")]
    pub stats_api_url: String,

    /// Outbound request timeout in milliseconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_ms: u64,

    /// Idle connections kept per host.
    #[serde(default = "default_pool_size")]
    pub http_pool_size: usize,

    // === Server Configuration ===
    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

// Keeps the secret out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_subject", &self.jwt_subject)
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("stats_api_url", &self.stats_api_url)
            .field("http_timeout_ms", &self.http_timeout_ms)
            .field("http_pool_size", &self.http_pool_size)
            .field("port", &self.port)
            .finish()
    }
}

fn default_jwt_subject() -> String {
    "go_api_service".to_string()
}

fn default_token_ttl() -> u64 {
    3600 // 1 hour
}

fn default_stats_url() -> String {
    "http://node-api:3001/calculate-stats".to_string()
}

fn default_http_timeout() -> u64 {
    5000
}

fn default_pool_size() -> usize {
    10
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Build a configuration with defaults for everything but the secret.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            jwt_subject: default_jwt_subject(),
            token_ttl_seconds: default_token_ttl(),
            stats_api_url: default_stats_url(),
            http_timeout_ms: default_http_timeout(),
            http_pool_size: default_pool_size(),
            port: default_port(),
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt_secret.is_empty() {
            return Err("JWT_SECRET is required".to_string());
        }

        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(format!(
                "JWT_SECRET must be at least {} bytes",
                MIN_SECRET_LEN
            ));
        }

        if self.token_ttl_seconds == 0 {
            return Err("TOKEN_TTL_SECONDS must be greater than 0".to_string());
        }

        if self.http_timeout_ms == 0 {
            return Err("HTTP_TIMEOUT_MS must be greater than 0".to_string());
        }

        let url = Url::parse(&self.stats_api_url)
            .map_err(|e| format!("STATS_API_URL is not a valid URL: {}", e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "STATS_API_URL must use http or https, got {}",
                url.scheme()
            ));
        }

        Ok(())
    }

    /// Outbound request timeout.
    pub fn http_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.http_timeout_ms)
    }
}
