use std::net::SocketAddr;

use serde::Deserialize;

use crate::{health::HealthConfig, rate_limit::RateLimitConfig};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
    /// Requests under this prefix always receive JSON error envelopes
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: None,
            api_prefix: default_api_prefix(),
            health: HealthConfig::default(),
            rate_limit: None,
        }
    }
}

fn default_api_prefix() -> String {
    "/api".to_owned()
}
