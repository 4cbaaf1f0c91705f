//! Extractors whose rejections flow through the failure boundary

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use courier_core::{Raised, TransportError, ValidationErrors};
use http::request::Parts;

/// JSON request body; malformed bodies are validation failures on `body`
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Raised;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// Path parameters; unparsable segments are validation failures on `path`
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = Raised;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(Raised::new(ValidationErrors::new().with(
                "path",
                "path",
                rejection.body_text(),
            ))),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> Raised {
    match rejection {
        JsonRejection::JsonDataError(e) => Raised::new(ValidationErrors::new().with("body", "json", e.body_text())),
        JsonRejection::JsonSyntaxError(e) => {
            Raised::new(ValidationErrors::new().with("body", "json_syntax", e.body_text()))
        }
        other => Raised::new(TransportError::new(other.status(), other.body_text())),
    }
}
