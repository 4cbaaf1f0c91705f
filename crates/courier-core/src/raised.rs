use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use crate::Failure;

/// Type-erased failure captured where it was raised
///
/// Records the concrete type name, the source location of the raise site
/// and a backtrace alongside the error itself. Conversion from any
/// [`Failure`] goes through `#[track_caller]`, so `?` in a handler records
/// the handler line rather than this module.
///
/// Cloning is cheap; clones share the captured error.
#[derive(Clone)]
pub struct Raised {
    inner: Arc<Inner>,
}

struct Inner {
    error: Box<dyn Failure>,
    type_name: &'static str,
    origin: Origin,
    backtrace: Backtrace,
}

/// Source location a failure was raised from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub file: String,
    pub line: u32,
}

impl Origin {
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }
}

impl From<&Location<'_>> for Origin {
    fn from(location: &Location<'_>) -> Self {
        Self {
            file: location.file().to_owned(),
            line: location.line(),
        }
    }
}

impl Raised {
    /// Capture `error` at the caller's location
    #[track_caller]
    pub fn new<E: Failure>(error: E) -> Self {
        Self::with_origin(error, Origin::caller())
    }

    /// Capture `error` with an origin recorded elsewhere (e.g. by a panic hook)
    pub fn with_origin<E: Failure>(error: E, origin: Origin) -> Self {
        Self {
            inner: Arc::new(Inner {
                error: Box::new(error),
                type_name: std::any::type_name::<E>(),
                origin,
                backtrace: Backtrace::force_capture(),
            }),
        }
    }

    pub fn failure(&self) -> &dyn Failure {
        self.inner.error.as_ref()
    }

    /// Fully qualified type name of the wrapped error
    pub fn type_name(&self) -> &'static str {
        self.inner.type_name
    }

    pub fn origin(&self) -> &Origin {
        &self.inner.origin
    }

    /// Backtrace captured at the raise site
    ///
    /// Always captured, regardless of `RUST_BACKTRACE`. Only platforms
    /// without unwinding support yield an empty backtrace.
    pub fn backtrace(&self) -> &Backtrace {
        &self.inner.backtrace
    }

    /// Raw message of the wrapped error (never sent to clients as-is)
    pub fn message(&self) -> String {
        self.inner.error.to_string()
    }

    /// Messages of the wrapped error's `source()` chain, outermost first
    pub fn causes(&self) -> Vec<String> {
        let mut causes = Vec::new();
        let mut next = self.inner.error.source();
        while let Some(cause) = next {
            causes.push(cause.to_string());
            next = cause.source();
        }
        causes
    }
}

impl<E: Failure> From<E> for Raised {
    #[track_caller]
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl fmt::Debug for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raised")
            .field("type", &self.inner.type_name)
            .field("message", &self.message())
            .field("origin", &self.inner.origin)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner.error, f)
    }
}

/// Handlers return `Result<_, Raised>`; the error is parked in the response
/// extensions for the boundary middleware to classify and render
#[cfg(feature = "http")]
impl axum::response::IntoResponse for Raised {
    fn into_response(self) -> axum::response::Response {
        let mut response = http::StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(self);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AppError, ModelNotFound};

    fn lookup() -> Result<(), Raised> {
        Err::<(), _>(ModelNotFound::new("Order", 42))?;
        Ok(())
    }

    #[test]
    fn question_mark_records_raise_site() {
        let raised = lookup().unwrap_err();
        assert!(raised.origin().file.ends_with("raised.rs"));
        assert!(raised.type_name().ends_with("ModelNotFound"));
        assert_eq!(raised.failure().missing_model(), Some("Order"));
    }

    #[test]
    fn collects_cause_chain() {
        let io = std::io::Error::other("connection reset");
        let raised = Raised::new(AppError::new("bank verification failed").with_source(io));
        assert_eq!(raised.message(), "bank verification failed");
        assert_eq!(raised.causes(), vec!["connection reset".to_owned()]);
    }

    #[cfg(feature = "http")]
    #[test]
    fn into_response_parks_error_in_extensions() {
        use axum::response::IntoResponse;

        let response = Raised::new(AppError::new("boom")).into_response();
        let parked = response.extensions().get::<Raised>().unwrap();
        assert_eq!(parked.message(), "boom");
    }
}
