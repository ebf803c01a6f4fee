//! Session carrier handling (cookie and bearer) and the session status endpoint.

use axum::{
    extract::Extension,
    http::{
        header::{InvalidHeaderValue, AUTHORIZATION, COOKIE},
        HeaderMap, HeaderValue,
    },
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::state::{AuthConfig, AuthState};
use crate::auth::{Anonymous, Discard, SessionToken, UserIdentity};

pub(crate) const SESSION_COOKIE_NAME: &str = "tessera_session";

#[derive(ToSchema, Serialize, Debug, PartialEq, Eq)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl SessionResponse {
    fn from_user(user: &dyn UserIdentity) -> Self {
        Self {
            authenticated: user.is_authenticated(),
            id: user
                .is_authenticated()
                .then(|| user.id().to_string()),
        }
    }
}

#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "Current session state", body = SessionResponse)
    ),
    tag = "auth"
)]
pub async fn session(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    let token = extract_session_token(&headers);
    let response = match auth_state.sessions().resolve(token.as_deref()) {
        Ok(identity) => SessionResponse::from_user(&identity),
        Err(_) => SessionResponse::from_user(&Anonymous),
    };
    Json(response)
}

/// Build a secure `HttpOnly` cookie for the session token.
pub(super) fn session_cookie(
    config: &AuthConfig,
    token: &SessionToken,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={}; Path=/; HttpOnly; SameSite=Lax",
        token.as_str()
    );
    if let Some(ttl_seconds) = config.session_ttl_seconds() {
        cookie.push_str(&format!("; Max-Age={ttl_seconds}"));
    }
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Expire the session cookie on the client.
pub(super) fn clear_session_cookie(
    config: &AuthConfig,
    _discard: Discard,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Bearer header first, then the session cookie.
pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_bearer_token(headers) {
        return Some(token);
    }
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let Some((key, val)) = pair.trim().split_once('=') else {
                continue;
            };
            if key.trim() == SESSION_COOKIE_NAME {
                let val = val.trim();
                return (!val.is_empty()).then(|| val.to_string());
            }
        }
    }
    None
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::auth::{Identity, SessionManager, SigningKey};
    use secrecy::SecretString;

    fn token() -> (SessionManager, SessionToken) {
        let key = SigningKey::new(&SecretString::from("cookie-test-key-0123456789".to_string()))
            .unwrap();
        let sessions = SessionManager::new(key);
        let token = sessions.issue(&Identity::new("user1")).unwrap();
        (sessions, token)
    }

    #[test]
    fn session_cookie_defaults_to_browser_session() {
        let (_, token) = token();
        let cookie = session_cookie(&AuthConfig::new(), &token).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with(&format!("tessera_session={}", token.as_str())));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Max-Age"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn session_cookie_carries_ttl_and_secure_flag() {
        let (_, token) = token();
        let config = AuthConfig::new()
            .with_session_ttl_seconds(Some(900))
            .with_cookie_secure(true);
        let cookie = session_cookie(&config, &token).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.contains("Max-Age=900"));
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let (sessions, token) = token();
        let discard = sessions.revoke(token.as_str());
        let cookie = clear_session_cookie(&AuthConfig::new(), discard).unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            "tessera_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"
        );
    }

    #[test]
    fn extracts_token_from_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; tessera_session=v1.abc.def; lang=en"),
        );
        assert_eq!(
            extract_session_token(&headers),
            Some("v1.abc.def".to_string())
        );
    }

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer v1.bearer.sig"));
        headers.insert(COOKIE, HeaderValue::from_static("tessera_session=v1.cookie.sig"));
        assert_eq!(
            extract_session_token(&headers),
            Some("v1.bearer.sig".to_string())
        );
    }

    #[test]
    fn missing_or_empty_carrier_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_session_token(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("tessera_session="));
        assert_eq!(extract_session_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_session_token(&headers), None);
    }

    #[test]
    fn session_response_reflects_authentication() {
        assert_eq!(
            SessionResponse::from_user(&Identity::new("user1")),
            SessionResponse {
                authenticated: true,
                id: Some("user1".to_string())
            }
        );
        assert_eq!(
            SessionResponse::from_user(&Anonymous),
            SessionResponse {
                authenticated: false,
                id: None
            }
        );
    }
}
