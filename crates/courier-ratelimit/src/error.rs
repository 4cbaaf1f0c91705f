use courier_core::{Failure, RateLimited};
use thiserror::Error;

/// Rate limiting errors
#[derive(Debug, Error)]
pub enum RateLimitError {
    /// Configuration error
    #[error("rate limit configuration error: {0}")]
    Config(String),

    /// Rate limit exceeded
    #[error("rate limit exceeded for {scope}")]
    Exceeded {
        /// Limit that rejected the request (`global` or `per_ip`)
        scope: &'static str,
        /// Seconds until the limit resets, if known
        retry_after: Option<u64>,
    },
}

impl Failure for RateLimitError {
    fn rate_limit(&self) -> Option<RateLimited> {
        match self {
            Self::Exceeded { retry_after, .. } => Some(RateLimited {
                retry_after: *retry_after,
            }),
            Self::Config(_) => None,
        }
    }
}
