use http::StatusCode;
use indexmap::IndexMap;
use thiserror::Error;

/// Structured error payload: field or category name to its messages
pub type Details = IndexMap<String, Vec<String>>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error raised deliberately by business logic
///
/// Carries the status the raiser wants the client to see together with a
/// structured payload. The optional source is kept for logging only and
/// never reaches the response.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AppError {
    message: String,
    details: Details,
    status: StatusCode,
    #[source]
    source: Option<BoxError>,
}

impl AppError {
    /// Create an application error with status 500 and no details
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Details::new(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            source: None,
        }
    }

    /// 409 shorthand for state conflicts
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(message).with_status(StatusCode::CONFLICT)
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: Details) -> Self {
        self.details = details;
        self
    }

    /// Append one message under `field`
    #[must_use]
    pub fn with_detail(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.details.entry(field.into()).or_default().push(message.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn details(&self) -> &Details {
        &self.details
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }
}
