//! Framework-level errors raised by the request pipeline itself

use http::{Method, StatusCode};
use thiserror::Error;

use crate::Failure;

/// Request carried no valid credential
#[derive(Debug, Default, Error)]
#[error("{message}")]
pub struct Unauthenticated {
    message: String,
}

impl Unauthenticated {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl Failure for Unauthenticated {
    fn is_unauthenticated(&self) -> bool {
        true
    }
}

/// Authenticated caller is not allowed to perform the action
#[derive(Debug, Default, Error)]
#[error("{message}")]
pub struct Forbidden {
    message: String,
}

impl Forbidden {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl Failure for Forbidden {
    fn is_forbidden(&self) -> bool {
        true
    }
}

/// A lookup by identifier found no matching record
#[derive(Debug, Error)]
#[error("no query results for model [{model}] {id}")]
pub struct ModelNotFound {
    model: &'static str,
    id: String,
}

impl ModelNotFound {
    pub fn new(model: &'static str, id: impl ToString) -> Self {
        Self {
            model,
            id: id.to_string(),
        }
    }

    pub const fn model(&self) -> &'static str {
        self.model
    }
}

impl Failure for ModelNotFound {
    fn missing_model(&self) -> Option<&str> {
        Some(self.model)
    }
}

/// No route matched the request path
#[derive(Debug, Error)]
#[error("no route for {path}")]
pub struct RouteNotFound {
    path: String,
}

impl RouteNotFound {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Failure for RouteNotFound {
    fn is_route_not_found(&self) -> bool {
        true
    }
}

/// The route exists but not for this method
#[derive(Debug, Error)]
#[error("method {method} is not supported for {path}")]
pub struct MethodNotAllowed {
    method: Method,
    path: String,
}

impl MethodNotAllowed {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

impl Failure for MethodNotAllowed {
    fn is_method_not_allowed(&self) -> bool {
        true
    }
}

/// HTTP transport-level failure with a well-known status
/// (unsupported media type, oversized body, and the like)
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    status: StatusCode,
    message: String,
}

impl TransportError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl Failure for TransportError {
    fn transport_status(&self) -> Option<StatusCode> {
        Some(self.status)
    }
}
