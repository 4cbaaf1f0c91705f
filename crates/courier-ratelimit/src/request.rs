use courier_config::{RateLimitConfig, RequestRateLimit};

use crate::{error::RateLimitError, memory::MemoryLimiter};

/// Key under which the global quota is tracked
const GLOBAL_KEY: &str = "global";

/// HTTP request-level rate limiter (global and per-IP)
pub struct RequestLimiter {
    global: Option<MemoryLimiter>,
    per_ip: Option<MemoryLimiter>,
}

impl RequestLimiter {
    /// Create from configuration
    pub fn new(config: &RateLimitConfig) -> Result<Self, RateLimitError> {
        let global = config
            .global
            .as_ref()
            .map(|rl| build_limiter("global", rl))
            .transpose()?;

        let per_ip = config
            .per_ip
            .as_ref()
            .map(|rl| build_limiter("per_ip", rl))
            .transpose()?;

        Ok(Self { global, per_ip })
    }

    /// Check the global limit
    pub fn check_global(&self) -> Result<(), RateLimitError> {
        self.global.as_ref().map_or(Ok(()), |limiter| limiter.check(GLOBAL_KEY))
    }

    /// Check the per-IP limit
    pub fn check_ip(&self, ip: &str) -> Result<(), RateLimitError> {
        self.per_ip.as_ref().map_or(Ok(()), |limiter| limiter.check(ip))
    }
}

fn build_limiter(scope: &'static str, rate_limit: &RequestRateLimit) -> Result<MemoryLimiter, RateLimitError> {
    let window = duration_str::parse(&rate_limit.window)
        .map_err(|e| RateLimitError::Config(format!("invalid duration '{}': {e}", rate_limit.window)))?;

    tracing::debug!(scope, requests = rate_limit.requests, ?window, "rate limiter configured");

    MemoryLimiter::new(scope, rate_limit.requests, window)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limit(requests: u32) -> Option<RequestRateLimit> {
        Some(RequestRateLimit {
            requests,
            window: "1m".to_owned(),
        })
    }

    #[test]
    fn unconfigured_limits_always_pass() {
        let limiter = RequestLimiter::new(&RateLimitConfig::default()).unwrap();
        for _ in 0..100 {
            assert!(limiter.check_global().is_ok());
            assert!(limiter.check_ip("10.0.0.1").is_ok());
        }
    }

    #[test]
    fn global_limit_is_shared() {
        let config = RateLimitConfig {
            global: limit(1),
            ..RateLimitConfig::default()
        };
        let limiter = RequestLimiter::new(&config).unwrap();

        assert!(limiter.check_global().is_ok());
        assert!(matches!(
            limiter.check_global(),
            Err(RateLimitError::Exceeded { scope: "global", .. })
        ));
    }

    #[test]
    fn invalid_window_is_a_config_error() {
        let config = RateLimitConfig {
            global: Some(RequestRateLimit {
                requests: 5,
                window: "whenever".to_owned(),
            }),
            ..RateLimitConfig::default()
        };
        assert!(matches!(RequestLimiter::new(&config), Err(RateLimitError::Config(_))));
    }
}
