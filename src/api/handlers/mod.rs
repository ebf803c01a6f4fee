//! Route handlers for the tessera HTTP surface.

pub mod auth;
pub mod dashboard;
pub mod health;

use axum::response::Redirect;

use crate::auth::DEFAULT_LOGIN_PATH;

/// `/` has nothing to show; send visitors to the login page.
pub async fn root() -> Redirect {
    Redirect::to(DEFAULT_LOGIN_PATH)
}
