use http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::ErrorId;

/// Closed set of failure categories, listed in classification priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ApplicationError,
    Unauthenticated,
    ValidationFailed,
    /// Data-layer lookup by identifier found nothing
    ModelNotFound,
    /// No route matched the requested path
    RouteNotFound,
    MethodNotAllowed,
    RateLimited,
    Forbidden,
    Unclassified,
}

impl FailureKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationError => "application_error",
            Self::Unauthenticated => "unauthenticated",
            Self::ValidationFailed => "validation_failed",
            Self::ModelNotFound => "model_not_found",
            Self::RouteNotFound => "route_not_found",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::RateLimited => "rate_limited",
            Self::Forbidden => "forbidden",
            Self::Unclassified => "unclassified",
        }
    }
}

/// Result of classifying one failure occurrence
///
/// Built per failure and consumed right away by the reporter and the
/// renderer; never stored.
#[derive(Debug, Clone)]
pub struct ClassifiedFailure {
    pub kind: FailureKind,
    pub status: StatusCode,
    /// Message that is safe to show to API consumers
    pub public_message: String,
    /// Structured payload for the `errors` field; `{}` when there is nothing
    pub errors: Value,
    pub error_id: ErrorId,
    /// Present only in debug mode
    pub debug: Option<DebugInfo>,
}

/// Origin details attached to responses in debug mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebugInfo {
    pub exception: String,
    pub file: String,
    pub line: u32,
    pub trace: Vec<Frame>,
    /// Rule names behind a validation failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_rules: Option<Value>,
}

/// Simplified stack frame: location and symbol only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub file: Option<String>,
    pub line: Option<u32>,
    pub function: Option<String>,
    pub class: Option<String>,
}
