//! Failure boundary for Courier
//!
//! Classifies raised errors into a fixed set of kinds, logs each one once
//! with a correlation id, and renders the uniform JSON error envelope.

mod classify;
mod debug;
mod error_id;
mod failure;
mod render;
mod report;
mod trace;

use std::sync::Arc;

use courier_core::Raised;

pub use classify::{classify, fallback_status};
pub use debug::DebugMode;
pub use error_id::ErrorId;
pub use failure::{ClassifiedFailure, DebugInfo, FailureKind, Frame};
pub use render::{ERROR_ID_HEADER, Envelope, Rendered, render};
pub use report::{CHANNEL, LogRecord, LogSink, SINK_CHANNEL, Severity, SinkError, TracingSink};

/// Classifies, logs and renders failures
///
/// Holds the debug switch and the log sink; both are fixed at
/// construction. Cheap to clone.
#[derive(Clone)]
pub struct ErrorHandler {
    debug: DebugMode,
    sink: Arc<dyn LogSink>,
}

impl ErrorHandler {
    /// Handler logging through [`TracingSink`]
    pub fn new(debug: DebugMode) -> Self {
        Self::with_sink(debug, Arc::new(TracingSink))
    }

    pub fn with_sink(debug: DebugMode, sink: Arc<dyn LogSink>) -> Self {
        Self { debug, sink }
    }

    pub const fn debug(&self) -> DebugMode {
        self.debug
    }

    /// Classify without logging
    pub fn classify(&self, raised: &Raised) -> ClassifiedFailure {
        classify(raised, self.debug)
    }

    /// Write the single log record for a classified failure
    ///
    /// Sink errors are swallowed.
    pub fn report(&self, raised: &Raised, failure: &ClassifiedFailure) {
        report::emit(self.sink.as_ref(), &report::record(raised, failure));
    }

    /// Classify, log once, and render
    pub fn handle(&self, raised: &Raised) -> Rendered {
        let failure = self.classify(raised);
        self.report(raised, &failure);
        render(failure)
    }
}

impl std::fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorHandler").field("debug", &self.debug).finish_non_exhaustive()
    }
}
