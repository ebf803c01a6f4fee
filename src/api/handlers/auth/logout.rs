//! Logout entry point. Mounted behind the session guard.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap},
    response::{IntoResponse, Redirect},
};
use std::sync::Arc;
use tracing::error;

use super::{
    session::{clear_session_cookie, extract_session_token},
    state::AuthState,
};
use crate::auth::{Identity, DEFAULT_LOGIN_PATH};

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 303, description = "Session cookie cleared, redirect to login")
    ),
    tag = "auth"
)]
pub async fn logout(
    identity: Extension<Identity>,
    headers: HeaderMap,
    auth_state: Extension<Arc<AuthState>>,
) -> impl IntoResponse {
    let token = extract_session_token(&headers).unwrap_or_default();
    let discard = auth_state.flow().logout(&identity.0, &token);

    let mut response_headers = HeaderMap::new();
    match clear_session_cookie(auth_state.config(), discard) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build clearing cookie: {err}"),
    }
    (response_headers, Redirect::to(DEFAULT_LOGIN_PATH))
}
