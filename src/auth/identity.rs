//! The verified user value carried through the auth flow.

use serde::Serialize;
use utoipa::ToSchema;

/// Capabilities every user representation must offer.
pub trait UserIdentity {
    /// Stable identifier; for this service the username.
    fn id(&self) -> &str;

    fn is_authenticated(&self) -> bool {
        true
    }
}

/// A user that has proven who they are, either by credentials or by a valid
/// session token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct Identity {
    id: String,
}

impl Identity {
    /// Only the authenticator and session manager mint identities.
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl UserIdentity for Identity {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Stand-in for a caller without a valid session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Anonymous;

impl UserIdentity for Anonymous {
    fn id(&self) -> &str {
        ""
    }

    fn is_authenticated(&self) -> bool {
        false
    }
}
