use axum::{Extension, Json};
use courier_core::Partner;

use super::{Success, success};

pub async fn show(Extension(partner): Extension<Partner>) -> Json<Success<Partner>> {
    success(partner)
}
