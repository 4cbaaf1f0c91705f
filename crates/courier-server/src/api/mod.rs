//! Partner-facing JSON API

mod bank_account;
mod company;
mod orders;
mod profile;

use axum::Json;
use axum::Router;
use axum::routing::{get, post};
use serde::Serialize;

use crate::auth::{self, PartnerDirectory};
use crate::fallback::method_not_allowed;
use crate::state::AppState;

/// Body of every successful API response
#[derive(Debug, Serialize)]
pub struct Success<T> {
    success: bool,
    data: T,
}

pub fn success<T: Serialize>(data: T) -> Json<Success<T>> {
    Json(Success { success: true, data })
}

/// Routes mounted under the API prefix
///
/// Everything except company information requires a partner token.
pub fn router(state: AppState, partners: PartnerDirectory) -> Router {
    let protected = Router::new()
        .route("/profile", get(profile::show))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/accept", post(orders::accept))
        .route("/bank-account", get(bank_account::show).post(bank_account::store))
        .method_not_allowed_fallback(method_not_allowed)
        .route_layer(axum::middleware::from_fn(move |req, next| {
            let partners = partners.clone();
            async move { auth::auth_middleware(partners, req, next).await }
        }));

    Router::new()
        .route("/company", get(company::show))
        .method_not_allowed_fallback(method_not_allowed)
        .merge(protected)
        .with_state(state)
}
