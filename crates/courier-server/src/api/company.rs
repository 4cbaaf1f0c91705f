use axum::Json;
use axum::extract::State;
use courier_config::CompanyConfig;

use super::{Success, success};
use crate::state::AppState;

pub async fn show(State(state): State<AppState>) -> Json<Success<CompanyConfig>> {
    success(state.company.as_ref().clone())
}
