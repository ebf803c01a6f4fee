//! Auth state and configuration shared by the HTTP handlers.

use std::{sync::Arc, time::Duration};

use crate::auth::{
    Authenticator, AuthorizationGuard, CredentialStore, LoginFlow, SessionManager, SigningKey,
    DEFAULT_LOGIN_PATH,
};

#[derive(Clone, Debug, Default)]
pub struct AuthConfig {
    session_ttl_seconds: Option<u64>,
    cookie_secure: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` (the default) issues sessions that never expire.
    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: Option<u64>) -> Self {
        self.session_ttl_seconds = seconds.filter(|seconds| *seconds > 0);
        self
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn session_ttl_seconds(&self) -> Option<u64> {
        self.session_ttl_seconds
    }

    pub(super) fn session_cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}

/// Everything the handlers need, constructed once at startup.
#[derive(Debug)]
pub struct AuthState {
    config: AuthConfig,
    flow: LoginFlow,
    guard: AuthorizationGuard,
    sessions: Arc<SessionManager>,
}

impl AuthState {
    pub fn new(config: AuthConfig, store: Arc<dyn CredentialStore>, key: SigningKey) -> Self {
        let sessions = Arc::new(
            SessionManager::new(key)
                .with_ttl(config.session_ttl_seconds().map(Duration::from_secs)),
        );
        let guard = AuthorizationGuard::new(sessions.clone(), DEFAULT_LOGIN_PATH);
        let flow = LoginFlow::new(Authenticator::new(store), sessions.clone());
        Self {
            config,
            flow,
            guard,
            sessions,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn flow(&self) -> &LoginFlow {
        &self.flow
    }

    #[must_use]
    pub fn guard(&self) -> &AuthorizationGuard {
        &self.guard
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{AuthConfig, AuthState};
    use crate::auth::{Identity, InMemoryCredentialStore, SigningKey};
    use secrecy::SecretString;
    use std::{sync::Arc, time::Duration};

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new();
        assert_eq!(config.session_ttl_seconds(), None);
        assert!(!config.session_cookie_secure());

        let config = config
            .with_session_ttl_seconds(Some(3600))
            .with_cookie_secure(true);
        assert_eq!(config.session_ttl_seconds(), Some(3600));
        assert!(config.session_cookie_secure());
    }

    #[test]
    fn zero_ttl_means_no_expiry() {
        let config = AuthConfig::new().with_session_ttl_seconds(Some(0));
        assert_eq!(config.session_ttl_seconds(), None);
    }

    #[test]
    fn auth_state_wires_ttl_into_sessions() {
        let key = SigningKey::new(&SecretString::from("state-test-key-0123456789".to_string()))
            .unwrap();
        let state = AuthState::new(
            AuthConfig::new().with_session_ttl_seconds(Some(60)),
            Arc::new(InMemoryCredentialStore::demo()),
            key,
        );
        assert_eq!(state.sessions().ttl(), Some(Duration::from_secs(60)));
        assert_eq!(state.guard().login_path(), "/login");

        let token = state.sessions().issue(&Identity::new("user1")).unwrap();
        let identity = state.guard().guard(Some(token.as_str()), |identity| identity);
        assert_eq!(identity.unwrap().id(), "user1");
    }
}
