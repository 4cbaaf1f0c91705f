use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use courier_core::{Raised, expects_json};
use courier_errors::{ERROR_ID_HEADER, ErrorHandler, Rendered};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};

/// Everything the failure boundary needs per request
#[derive(Clone)]
pub struct Boundary {
    handler: ErrorHandler,
    api_prefix: Arc<str>,
}

impl Boundary {
    pub fn new(handler: ErrorHandler, api_prefix: &str) -> Self {
        Self {
            handler,
            api_prefix: Arc::from(api_prefix),
        }
    }
}

/// Turn a [`Raised`] parked in the response into the rendered failure
///
/// Responses without one pass through untouched. JSON callers get the
/// envelope; everyone else gets the public message as plain text. Both
/// carry the error id header, and headers set by inner layers (such as
/// `retry-after`) survive.
pub async fn error_boundary(boundary: Boundary, request: Request, next: Next) -> Response {
    let wants_json = expects_json(request.headers(), request.uri().path(), &boundary.api_prefix);

    let mut response = next.run(request).await;
    let Some(raised) = response.extensions_mut().remove::<Raised>() else {
        return response;
    };

    let rendered = boundary.handler.handle(&raised);
    let mut rendered = if wants_json {
        rendered.into_response()
    } else {
        plain_text(rendered)
    };

    carry_headers(response.headers(), rendered.headers_mut());
    rendered
}

fn plain_text(rendered: Rendered) -> Response {
    let error_id = rendered.envelope.error_id.to_string();
    let mut response = (rendered.status, rendered.envelope.message).into_response();

    if let Ok(value) = HeaderValue::from_str(&error_id) {
        response.headers_mut().insert(ERROR_ID_HEADER, value);
    }

    response
}

fn carry_headers(from: &HeaderMap, to: &mut HeaderMap) {
    for (name, value) in from {
        if name == CONTENT_TYPE || name == CONTENT_LENGTH || to.contains_key(name) {
            continue;
        }
        to.append(name.clone(), value.clone());
    }
}
