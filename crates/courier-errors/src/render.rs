use axum::Json;
use axum::response::{IntoResponse, Response};
use http::{HeaderValue, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::{ClassifiedFailure, DebugInfo, ErrorId};

/// Header carrying the error id on every failure response
pub const ERROR_ID_HEADER: &str = "x-error-id";

/// JSON body returned for every failure kind
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    pub error_id: ErrorId,
    pub errors: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugInfo>,
}

/// Status plus envelope, ready to be written as an `application/json` response
#[derive(Debug, Clone)]
pub struct Rendered {
    pub status: StatusCode,
    pub envelope: Envelope,
}

/// Turn a classified failure into its response envelope
pub fn render(failure: ClassifiedFailure) -> Rendered {
    Rendered {
        status: failure.status,
        envelope: Envelope {
            success: false,
            message: failure.public_message,
            error_id: failure.error_id,
            errors: failure.errors,
            debug: failure.debug,
        },
    }
}

impl IntoResponse for Rendered {
    fn into_response(self) -> Response {
        let error_id = self.envelope.error_id;
        let mut response = (self.status, Json(self.envelope)).into_response();

        if let Ok(value) = HeaderValue::from_str(&error_id.to_string()) {
            response.headers_mut().insert(ERROR_ID_HEADER, value);
        }

        response
    }
}
