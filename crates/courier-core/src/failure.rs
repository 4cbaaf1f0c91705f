use http::StatusCode;

use crate::{AppError, ValidationErrors};

/// Capabilities a raised error can expose to the failure boundary
///
/// Every capability defaults to "absent". An error type opts into a
/// failure kind by overriding the matching accessor; the boundary decides
/// the kind from these answers in a fixed priority order, so a type that
/// answers more than one of them is still classified deterministically.
pub trait Failure: std::error::Error + Send + Sync + 'static {
    /// Typed application error carrying its own status and details
    fn as_app_error(&self) -> Option<&AppError> {
        None
    }

    /// No valid session or credential was presented
    fn is_unauthenticated(&self) -> bool {
        false
    }

    /// Structured field validation rejected the input
    fn validation(&self) -> Option<&ValidationErrors> {
        None
    }

    /// Name of the entity a data lookup failed to find (e.g. `Order`)
    fn missing_model(&self) -> Option<&str> {
        None
    }

    /// No route matched the requested path
    fn is_route_not_found(&self) -> bool {
        false
    }

    /// A route matched but does not accept the request method
    fn is_method_not_allowed(&self) -> bool {
        false
    }

    /// The request exceeded a throughput quota
    fn rate_limit(&self) -> Option<RateLimited> {
        None
    }

    /// The caller is authenticated but not allowed to perform the action
    fn is_forbidden(&self) -> bool {
        false
    }

    /// Status carried by a recognized HTTP transport error
    fn transport_status(&self) -> Option<StatusCode> {
        None
    }

    /// Explicit numeric status for errors that want to pick their own code
    /// without becoming an [`AppError`]
    fn status(&self) -> Option<u16> {
        None
    }
}

/// Rate limit details exposed by throttling errors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimited {
    /// Seconds until the quota resets, when the limiter knows it
    pub retry_after: Option<u64>,
}

impl Failure for AppError {
    fn as_app_error(&self) -> Option<&AppError> {
        Some(self)
    }
}

impl Failure for ValidationErrors {
    fn validation(&self) -> Option<&ValidationErrors> {
        Some(self)
    }
}
