use axum::{extract::Extension, response::Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::Identity;

#[derive(ToSchema, Serialize, Debug)]
pub struct Dashboard {
    username: String,
    message: String,
}

#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard for the signed-in user", body = Dashboard),
        (status = 303, description = "No valid session, redirect to login")
    ),
    tag = "tessera"
)]
pub async fn dashboard(identity: Extension<Identity>) -> Json<Dashboard> {
    let username = identity.id().to_string();
    Json(Dashboard {
        message: format!("Welcome, {username}"),
        username,
    })
}
