//! Shared error capabilities and request context for Courier
//!
//! Domain crates raise errors implementing [`Failure`]; the server boundary
//! classifies them without knowing their concrete types.

mod app_error;
mod context;
mod errors;
mod failure;
mod raised;
mod validation;

pub use app_error::{AppError, Details};
pub use context::{Partner, expects_json};
pub use errors::{Forbidden, MethodNotAllowed, ModelNotFound, RouteNotFound, TransportError, Unauthenticated};
pub use failure::{Failure, RateLimited};
pub use raised::{Origin, Raised};
pub use validation::ValidationErrors;
