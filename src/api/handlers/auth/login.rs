//! Login entry point.

use axum::{
    extract::{rejection::FormRejection, Extension, Form},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use utoipa::ToSchema;

use super::{session::session_cookie, state::AuthState};
use crate::auth::{CredentialSubmission, LoginError};

pub(crate) const DASHBOARD_PATH: &str = "/dashboard";
const MISSING_FIELDS_MESSAGE: &str = "Missing username or password";

const LOGIN_PAGE: &str = r#"<!doctype html>
<html>
  <head><title>Login</title></head>
  <body>
    <form method="post" action="/login">
      <label>Username <input type="text" name="username"></label>
      <label>Password <input type="password" name="password"></label>
      <button type="submit">Login</button>
    </form>
  </body>
</html>
"#;

#[derive(ToSchema, Deserialize)]
pub struct LoginForm {
    username: Option<String>,
    password: Option<String>,
}

impl From<LoginForm> for CredentialSubmission {
    fn from(form: LoginForm) -> Self {
        Self {
            username: form.username,
            password: form.password.map(SecretString::from),
        }
    }
}

#[utoipa::path(
    get,
    path = "/login",
    responses(
        (status = 200, description = "Login form", body = String, content_type = "text/html")
    ),
    tag = "auth"
)]
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Logged in, redirect to the dashboard with a session cookie"),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Invalid username or password")
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    auth_state: Extension<Arc<AuthState>>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let submission = match form {
        Ok(Form(form)) => CredentialSubmission::from(form),
        Err(rejection) => {
            debug!("Unreadable login form: {rejection}");
            CredentialSubmission::default()
        }
    };

    match auth_state.flow().login(submission) {
        Ok(outcome) => match session_cookie(auth_state.config(), &outcome.token) {
            Ok(cookie) => {
                let mut headers = HeaderMap::new();
                headers.insert(SET_COOKIE, cookie);
                (headers, Redirect::to(DASHBOARD_PATH)).into_response()
            }
            Err(err) => {
                error!("Failed to build session cookie: {err}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
        Err(LoginError::Malformed(err)) => {
            debug!("Malformed login request: {err}");
            (StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE).into_response()
        }
        Err(LoginError::Invalid(err)) => (StatusCode::UNAUTHORIZED, err.to_string()).into_response(),
        Err(LoginError::Issue(err)) => {
            error!("Failed to issue session token: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
