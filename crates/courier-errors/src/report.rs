//! Structured failure logging

use std::panic::{AssertUnwindSafe, catch_unwind};

use courier_core::Raised;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::{ClassifiedFailure, FailureKind};

/// Log channel every failure record is written to
pub const CHANNEL: &str = "courier::errors";

/// Target for problems with the failure log itself
pub const SINK_CHANNEL: &str = "courier::errors::sink";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// One structured log entry describing a failure
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub channel: &'static str,
    pub severity: Severity,
    pub message: String,
    pub context: Map<String, Value>,
}

impl LogRecord {
    /// Error id recorded in the context
    pub fn error_id(&self) -> Option<&str> {
        self.context.get("error_id").and_then(Value::as_str)
    }
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("log sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for failure log records
///
/// Must tolerate concurrent writes. A write that fails is dropped; it
/// never changes the response sent to the client.
pub trait LogSink: Send + Sync {
    /// Write one record
    ///
    /// # Errors
    ///
    /// Returns an error when the record could not be written
    fn write(&self, record: &LogRecord) -> Result<(), SinkError>;
}

/// Sink that emits records as `tracing` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write(&self, record: &LogRecord) -> Result<(), SinkError> {
        let error_id = record.error_id().unwrap_or_default();
        let exception = record.context.get("exception").and_then(Value::as_str).unwrap_or_default();
        let code = record.context.get("code").and_then(Value::as_u64).unwrap_or_default();
        let context = Value::Object(record.context.clone());

        match record.severity {
            Severity::Warning => tracing::warn!(
                target: CHANNEL,
                error_id,
                exception,
                code,
                %context,
                "{}",
                record.message
            ),
            Severity::Error => tracing::error!(
                target: CHANNEL,
                error_id,
                exception,
                code,
                %context,
                "{}",
                record.message
            ),
        }

        Ok(())
    }
}

/// Build the log record for a classified failure
pub fn record(raised: &Raised, failure: &ClassifiedFailure) -> LogRecord {
    let severity = match failure.kind {
        FailureKind::ApplicationError => Severity::Warning,
        _ => Severity::Error,
    };

    let message = raised.message();
    let mut context = Map::new();
    context.insert("error_id".to_owned(), json!(failure.error_id));
    context.insert("kind".to_owned(), json!(failure.kind));
    context.insert("exception".to_owned(), json!(raised.type_name()));
    context.insert("message".to_owned(), json!(message));
    context.insert("code".to_owned(), json!(failure.status.as_u16()));
    context.insert("file".to_owned(), json!(raised.origin().file));
    context.insert("line".to_owned(), json!(raised.origin().line));
    context.insert("trace".to_owned(), json!(raised.backtrace().to_string()));

    let causes = raised.causes();
    if !causes.is_empty() {
        context.insert("causes".to_owned(), json!(causes));
    }

    if let Some(app) = raised.failure().as_app_error() {
        context.insert("details".to_owned(), json!(app.details()));
    }

    LogRecord {
        channel: CHANNEL,
        severity,
        message: if message.is_empty() {
            failure.kind.as_str().to_owned()
        } else {
            message
        },
        context,
    }
}

/// Hand a record to the sink, swallowing failures and panics
pub fn emit(sink: &dyn LogSink, record: &LogRecord) {
    match catch_unwind(AssertUnwindSafe(|| sink.write(record))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(
            target: SINK_CHANNEL,
            error_id = record.error_id().unwrap_or("-"),
            error = %e,
            "failed to write failure log"
        ),
        Err(_) => tracing::warn!(
            target: SINK_CHANNEL,
            error_id = record.error_id().unwrap_or("-"),
            "log sink panicked while writing failure log"
        ),
    }
}
