use serde::Deserialize;

/// Request rate limiting, kept in process memory
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Limit shared by all requests
    #[serde(default)]
    pub global: Option<RequestRateLimit>,
    /// Limit per client IP
    #[serde(default)]
    pub per_ip: Option<RequestRateLimit>,
    /// Reverse proxies in front of the server that append to
    /// `X-Forwarded-For`. With `0` the connection's peer address is the
    /// client IP and forwarding headers are ignored.
    #[serde(default)]
    pub trusted_proxy_hops: usize,
}

/// Request-based rate limit
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestRateLimit {
    /// Maximum requests per window
    pub requests: u32,
    /// Window duration (e.g. "1m", "1h")
    pub window: String,
}
