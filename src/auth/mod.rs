//! Authentication and session core.
//!
//! Flow Overview:
//! - [`Authenticator`] checks a username/secret pair against a
//!   [`CredentialStore`] and yields an [`Identity`].
//! - [`SessionManager`] signs that identity into a [`SessionToken`] and later
//!   resolves presented tokens back into identities.
//! - [`AuthorizationGuard`] wraps every protected operation and either runs it
//!   with the resolved identity or returns [`Denied`].
//!
//! Security boundaries: no session state is kept server side. Credential
//! failures and session failures each collapse into one outcome value so
//! responses never reveal which usernames exist or why a token was refused.

pub mod authenticator;
pub mod credentials;
pub mod error;
pub mod flow;
pub mod guard;
pub mod identity;
pub mod session;

pub use authenticator::Authenticator;
pub use credentials::{CredentialStore, InMemoryCredentialStore};
pub use error::{AuthFailure, Denied, MalformedRequest, SessionInvalid};
pub use flow::{CredentialSubmission, LoginError, LoginFlow, LoginOutcome};
pub use guard::{AuthorizationGuard, DEFAULT_LOGIN_PATH};
pub use identity::{Anonymous, Identity, UserIdentity};
pub use session::{Discard, SessionManager, SessionToken, SigningKey};
