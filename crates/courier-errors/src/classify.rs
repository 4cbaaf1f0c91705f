//! Failure classification
//!
//! Rules are checked top to bottom and the first one that matches decides
//! the kind. An error that answers several capabilities (say, an
//! application error that also reports itself as forbidden) therefore
//! always lands on the same kind.

use courier_core::{Failure, Raised};
use http::StatusCode;
use serde_json::{Map, Value, json};

use crate::{ClassifiedFailure, DebugInfo, DebugMode, ErrorId, FailureKind, trace};

const UNAUTHENTICATED: &str = "Unauthenticated.";
const VALIDATION_FAILED: &str = "Validation failed";
const ROUTE_NOT_FOUND: &str = "The requested resource was not found";
const METHOD_NOT_ALLOWED: &str = "The requested method is not allowed for this resource";
const TOO_MANY_REQUESTS: &str = "Too many requests";
const FORBIDDEN: &str = "Forbidden";
const SERVER_ERROR: &str = "Server Error";

/// Status, public message and payload chosen by a rule
struct Resolution {
    status: StatusCode,
    message: String,
    errors: Value,
}

impl Resolution {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: empty(),
        }
    }

    fn with_errors(mut self, errors: Value) -> Self {
        self.errors = errors;
        self
    }
}

/// A rule resolves only when its capability is present on the failure
struct Rule {
    kind: FailureKind,
    resolve: fn(&dyn Failure) -> Option<Resolution>,
}

const RULES: [Rule; 8] = [
    Rule {
        kind: FailureKind::ApplicationError,
        resolve: application_error,
    },
    Rule {
        kind: FailureKind::Unauthenticated,
        resolve: unauthenticated,
    },
    Rule {
        kind: FailureKind::ValidationFailed,
        resolve: validation_failed,
    },
    Rule {
        kind: FailureKind::ModelNotFound,
        resolve: model_not_found,
    },
    Rule {
        kind: FailureKind::RouteNotFound,
        resolve: route_not_found,
    },
    Rule {
        kind: FailureKind::MethodNotAllowed,
        resolve: method_not_allowed,
    },
    Rule {
        kind: FailureKind::RateLimited,
        resolve: rate_limited,
    },
    Rule {
        kind: FailureKind::Forbidden,
        resolve: forbidden,
    },
];

/// Classify a raised failure
///
/// Generates the failure's error id. Debug details are attached only when
/// `debug` is enabled.
pub fn classify(raised: &Raised, debug: DebugMode) -> ClassifiedFailure {
    let failure = raised.failure();

    let (kind, resolution) = RULES
        .iter()
        .find_map(|rule| (rule.resolve)(failure).map(|resolution| (rule.kind, resolution)))
        .unwrap_or_else(|| (FailureKind::Unclassified, unclassified(raised, debug)));

    ClassifiedFailure {
        kind,
        status: resolution.status,
        public_message: resolution.message,
        errors: resolution.errors,
        error_id: ErrorId::generate(),
        debug: debug.is_enabled().then(|| debug_info(raised, kind)),
    }
}

/// Status for failures no rule recognized
///
/// Transport status first, then the explicit `status()` capability, then
/// 500. Codes outside the 4xx/5xx range are ignored.
pub fn fallback_status(failure: &dyn Failure) -> StatusCode {
    failure
        .transport_status()
        .or_else(|| failure.status().and_then(|code| StatusCode::from_u16(code).ok()))
        .filter(|status| status.is_client_error() || status.is_server_error())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn application_error(failure: &dyn Failure) -> Option<Resolution> {
    let app = failure.as_app_error()?;
    let details = serde_json::to_value(app.details()).unwrap_or_else(|_| empty());

    Some(Resolution::new(app.status(), app.message()).with_errors(details))
}

fn unauthenticated(failure: &dyn Failure) -> Option<Resolution> {
    failure
        .is_unauthenticated()
        .then(|| Resolution::new(StatusCode::UNAUTHORIZED, message_or(failure, UNAUTHENTICATED)))
}

fn validation_failed(failure: &dyn Failure) -> Option<Resolution> {
    let validation = failure.validation()?;
    let errors = serde_json::to_value(validation.errors()).unwrap_or_else(|_| empty());

    Some(Resolution::new(StatusCode::UNPROCESSABLE_ENTITY, VALIDATION_FAILED).with_errors(errors))
}

fn model_not_found(failure: &dyn Failure) -> Option<Resolution> {
    let model = failure.missing_model()?;
    Some(Resolution::new(StatusCode::NOT_FOUND, format!("{model} not found")))
}

fn route_not_found(failure: &dyn Failure) -> Option<Resolution> {
    failure
        .is_route_not_found()
        .then(|| Resolution::new(StatusCode::NOT_FOUND, ROUTE_NOT_FOUND))
}

fn method_not_allowed(failure: &dyn Failure) -> Option<Resolution> {
    failure
        .is_method_not_allowed()
        .then(|| Resolution::new(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED))
}

fn rate_limited(failure: &dyn Failure) -> Option<Resolution> {
    let limit = failure.rate_limit()?;
    Some(
        Resolution::new(StatusCode::TOO_MANY_REQUESTS, TOO_MANY_REQUESTS)
            .with_errors(json!({ "retry_after": limit.retry_after })),
    )
}

fn forbidden(failure: &dyn Failure) -> Option<Resolution> {
    failure
        .is_forbidden()
        .then(|| Resolution::new(StatusCode::FORBIDDEN, message_or(failure, FORBIDDEN)))
}

fn unclassified(raised: &Raised, debug: DebugMode) -> Resolution {
    let message = if debug.is_enabled() {
        message_or(raised.failure(), SERVER_ERROR)
    } else {
        SERVER_ERROR.to_owned()
    };

    Resolution::new(fallback_status(raised.failure()), message)
}

fn debug_info(raised: &Raised, kind: FailureKind) -> DebugInfo {
    let failed_rules = match (kind, raised.failure().validation()) {
        (FailureKind::ValidationFailed, Some(validation)) => serde_json::to_value(validation.failed_rules()).ok(),
        _ => None,
    };

    DebugInfo {
        exception: raised.type_name().to_owned(),
        file: raised.origin().file.clone(),
        line: raised.origin().line,
        trace: trace::frames(raised.backtrace()),
        failed_rules,
    }
}

fn message_or(failure: &dyn Failure, default: &str) -> String {
    let message = failure.to_string();
    if message.trim().is_empty() {
        default.to_owned()
    } else {
        message
    }
}

fn empty() -> Value {
    Value::Object(Map::new())
}
