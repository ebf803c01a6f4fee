//! Outcome types for the auth core.
//!
//! None of these are fatal: each one is an expected result that the HTTP layer
//! turns into a response. `AuthFailure` and `SessionInvalid` are single values
//! on purpose so callers cannot tell the underlying cause apart.

use thiserror::Error;

/// A required credential field was absent from the submission.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("missing required field: {field}")]
pub struct MalformedRequest {
    pub field: &'static str,
}

/// Unknown user or wrong secret.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("Invalid username or password")]
pub struct AuthFailure;

/// Missing, malformed, unsigned, forged or expired session token.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("session is not valid")]
pub struct SessionInvalid;

/// The guard refused to run a protected operation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("access denied, redirect to {redirect_to}")]
pub struct Denied {
    pub redirect_to: String,
}

/// Startup-time signing key problems.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("signing key must be at least {min} bytes, got {len}")]
    TooShort { min: usize, len: usize },
    #[error("invalid signing key length")]
    InvalidLength,
    #[error("failed to generate signing key")]
    Generate(#[from] rand::Error),
}

/// A session token could not be produced.
#[derive(Debug, Error)]
#[error("failed to encode session token")]
pub struct IssueError(#[from] serde_json::Error);

/// Credential file problems, reported at startup.
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("invalid credentials json")]
    Json(#[from] serde_json::Error),
    #[error("failed to read credentials file")]
    Io(#[from] std::io::Error),
    #[error("username must not be empty")]
    EmptyUsername,
}

/// Why a token failed verification. Only ever logged, never returned.
#[derive(Debug, Error)]
pub(crate) enum TokenError {
    #[error("invalid token format")]
    Format,
    #[error("unsupported token version")]
    Version,
    #[error("invalid base64url encoding")]
    Base64,
    #[error("invalid signature")]
    Signature,
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
    #[error("empty subject")]
    EmptySubject,
    #[error("token expired")]
    Expired,
    #[error("token issued in the future")]
    InvalidIat,
}
