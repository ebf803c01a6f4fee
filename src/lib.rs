//! # Tessera (session authentication and route authorization)
//!
//! `tessera` authenticates users against a credential store, hands out signed
//! session tokens, and gates protected routes on those tokens.
//!
//! ## Sessions
//!
//! Session tokens are self-verifying: an HMAC-SHA256 signature over the
//! username (and issue time) with a process-wide signing key. The server keeps
//! no session table.
//!
//! - **Logout** clears the client cookie. A copy of the token replayed before
//!   it was discarded still verifies; there is no server-side blacklist.
//! - **Expiry** is off unless `--session-ttl-seconds` is set.
//! - **Key rotation** (a new `--signing-key`, or a restart without one)
//!   invalidates every outstanding session.
//!
//! ## Enumeration Resistance
//!
//! Unknown usernames and wrong passwords produce the same failure, and every
//! kind of bad session token produces the same redirect to `/login`.

pub mod api;
pub mod auth;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
