//! Auth handlers and supporting modules.
//!
//! Sessions are carried in the `tessera_session` cookie (or an
//! `Authorization: Bearer` header). Routes behind [`require_session`] only run
//! for callers whose token resolves; everyone else is redirected to `/login`.
//!
//! > **Warning:** Changing the signing key invalidates every issued session.

mod guard;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod session;
mod state;

pub use guard::require_session;
pub use state::{AuthConfig, AuthState};
