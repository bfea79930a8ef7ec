//! Gateway endpoint configuration loaded from environment variables.
//!
//! All settings have defaults so the client can start with zero
//! configuration against a local gateway.

use std::time::Duration;

/// Remote API configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL of the storefront API, without a trailing slash.
    /// Env: `GROCER_API_URL`
    /// Default: `http://localhost:3000/api`
    pub base_url: String,

    /// Per-request timeout.
    /// Env: `GROCER_API_TIMEOUT_SECS`
    /// Default: 30 seconds.
    pub request_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("GROCER_API_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(val) = std::env::var("GROCER_API_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) => config.request_timeout = Duration::from_secs(secs),
                Err(_) => {
                    tracing::warn!(
                        value = %val,
                        "Invalid GROCER_API_TIMEOUT_SECS, using default"
                    );
                }
            }
        }

        config
    }
}
