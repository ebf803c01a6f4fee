//! Authorization guard: the single enforcement point for protected operations.

use std::sync::Arc;
use tracing::debug;

use super::{error::Denied, identity::Identity, session::SessionManager};

pub const DEFAULT_LOGIN_PATH: &str = "/login";

#[derive(Clone, Debug)]
pub struct AuthorizationGuard {
    sessions: Arc<SessionManager>,
    login_path: String,
}

impl AuthorizationGuard {
    pub fn new(sessions: Arc<SessionManager>, login_path: impl Into<String>) -> Self {
        Self {
            sessions,
            login_path: login_path.into(),
        }
    }

    #[must_use]
    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Resolve the caller from `token` and run `operation` with that identity.
    ///
    /// `operation` runs at most once and only for a valid session. It may
    /// return a future; the guard decides before anything is polled.
    ///
    /// # Errors
    /// Returns [`Denied`] with the login path when the session does not
    /// resolve. `operation` is not invoked in that case.
    pub fn guard<T, F>(&self, token: Option<&str>, operation: F) -> Result<T, Denied>
    where
        F: FnOnce(Identity) -> T,
    {
        match self.sessions.resolve(token) {
            Ok(identity) => Ok(operation(identity)),
            Err(_) => {
                debug!(redirect_to = %self.login_path, "access denied");
                Err(self.denied())
            }
        }
    }

    fn denied(&self) -> Denied {
        Denied {
            redirect_to: self.login_path.clone(),
        }
    }
}
