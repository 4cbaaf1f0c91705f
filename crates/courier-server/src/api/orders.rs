use axum::extract::State;
use axum::{Extension, Json};
use courier_core::{Partner, Raised};

use super::{Success, success};
use crate::auth::require_active;
use crate::extract::PathParam;
use crate::state::{AppState, Order};

pub async fn show(
    State(state): State<AppState>,
    Extension(partner): Extension<Partner>,
    PathParam(id): PathParam<u64>,
) -> Result<Json<Success<Order>>, Raised> {
    let order = state.orders.assigned(id, &partner)?;
    Ok(success(order))
}

/// Accept a pending order; inactive partners cannot take work
pub async fn accept(
    State(state): State<AppState>,
    Extension(partner): Extension<Partner>,
    PathParam(id): PathParam<u64>,
) -> Result<Json<Success<Order>>, Raised> {
    require_active(&partner)?;
    let order = state.orders.accept(id, &partner)?;
    Ok(success(order))
}
