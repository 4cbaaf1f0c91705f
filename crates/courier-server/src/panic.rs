use std::any::Any;
use std::cell::RefCell;
use std::sync::Once;

use axum::response::{IntoResponse, Response};
use courier_core::{Failure, Origin, Raised};
use thiserror::Error;

thread_local! {
    static PANIC_ORIGIN: RefCell<Option<Origin>> = const { RefCell::new(None) };
}

static HOOK: Once = Once::new();

/// A handler or middleware panicked
#[derive(Debug, Error)]
#[error("{message}")]
pub struct Panicked {
    message: String,
}

impl Failure for Panicked {}

/// Chain a panic hook that remembers where the panic happened
///
/// The location is stored per thread and picked up by [`panic_response`],
/// which runs on the same thread right after the unwind is caught.
pub fn install_hook() {
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            if let Some(location) = info.location() {
                PANIC_ORIGIN.with(|origin| *origin.borrow_mut() = Some(Origin::from(location)));
            }
            previous(info);
        }));
    });
}

/// `CatchPanicLayer` handler: park the panic as a [`Raised`] failure
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| payload.downcast_ref::<&str>().map(|s| (*s).to_owned()))
        .unwrap_or_else(|| "panic with a non-string payload".to_owned());

    let origin = PANIC_ORIGIN
        .with(|origin| origin.borrow_mut().take())
        .unwrap_or_else(Origin::caller);

    tracing::debug!(file = %origin.file, line = origin.line, "request panicked");

    Raised::with_origin(Panicked { message }, origin).into_response()
}
