//! Applies the authorization guard to every route of the protected router.

use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use super::{session::extract_session_token, state::AuthState};
use crate::auth::Denied;

/// Resolve the caller and hand the [`crate::auth::Identity`] to the handler
/// through request extensions, or redirect to the login page.
pub async fn require_session(
    auth_state: Extension<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = extract_session_token(request.headers());
    let guarded = auth_state.guard().guard(token.as_deref(), |identity| {
        request.extensions_mut().insert(identity);
        next.run(request)
    });
    match guarded {
        Ok(response) => response.await,
        Err(denied) => denied.into_response(),
    }
}

impl IntoResponse for Denied {
    fn into_response(self) -> Response {
        Redirect::to(&self.redirect_to).into_response()
    }
}
