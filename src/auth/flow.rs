//! Login and logout orchestration over the auth core.

use secrecy::SecretString;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use super::{
    authenticator::Authenticator,
    error::{AuthFailure, IssueError, MalformedRequest},
    identity::Identity,
    session::{Discard, SessionManager, SessionToken},
};

/// Raw credential submission. Either field may be absent.
#[derive(Debug, Default)]
pub struct CredentialSubmission {
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error(transparent)]
    Malformed(#[from] MalformedRequest),
    #[error(transparent)]
    Invalid(#[from] AuthFailure),
    #[error(transparent)]
    Issue(#[from] IssueError),
}

#[derive(Debug)]
pub struct LoginOutcome {
    pub identity: Identity,
    pub token: SessionToken,
}

#[derive(Debug)]
pub struct LoginFlow {
    authenticator: Authenticator,
    sessions: Arc<SessionManager>,
}

impl LoginFlow {
    pub fn new(authenticator: Authenticator, sessions: Arc<SessionManager>) -> Self {
        Self {
            authenticator,
            sessions,
        }
    }

    /// Verify a submission and issue a session for it.
    ///
    /// # Errors
    /// - [`LoginError::Malformed`] when a field is missing; the authenticator
    ///   is not consulted.
    /// - [`LoginError::Invalid`] for any credential mismatch.
    /// - [`LoginError::Issue`] if the token cannot be encoded.
    pub fn login(&self, submission: CredentialSubmission) -> Result<LoginOutcome, LoginError> {
        let username = submission
            .username
            .ok_or(MalformedRequest { field: "username" })?;
        let password = submission
            .password
            .ok_or(MalformedRequest { field: "password" })?;

        let identity = self
            .authenticator
            .authenticate(&username, &password)
            .map_err(|err| {
                warn!("login rejected");
                err
            })?;
        let token = self.sessions.issue(&identity)?;
        info!(user = identity.id(), "login succeeded");

        Ok(LoginOutcome { identity, token })
    }

    /// End the session of an already authenticated caller.
    pub fn logout(&self, identity: &Identity, token: &str) -> Discard {
        info!(user = identity.id(), "logout");
        self.sessions.revoke(token)
    }
}
