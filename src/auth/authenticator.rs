//! Credential verification.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use std::sync::Arc;
use tracing::debug;

use super::{credentials::CredentialStore, error::AuthFailure, identity::Identity};

type HmacSha256 = Hmac<Sha256>;

// Both sides are run through the same MAC so the final comparison is over
// fixed-length tags and uses `verify_slice`, which is constant time.
const COMPARE_KEY: &[u8] = b"tessera.credential-compare.v1";

// Compared against when the username is unknown so both failure paths do the
// same amount of work.
const DUMMY_SECRET: &str = "tessera-unknown-user-placeholder";

pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Verify a username/secret pair.
    ///
    /// Unknown users and wrong secrets yield the same [`AuthFailure`].
    ///
    /// # Errors
    /// Returns [`AuthFailure`] when the pair does not match a stored record.
    pub fn authenticate(
        &self,
        username: &str,
        secret: &SecretString,
    ) -> Result<Identity, AuthFailure> {
        let stored = self.store.lookup(username);
        let expected = stored
            .as_ref()
            .map_or(DUMMY_SECRET, |stored| stored.expose_secret());

        let matches = secrets_match(expected, secret.expose_secret());

        if stored.is_some() && matches {
            debug!(username, "credentials accepted");
            Ok(Identity::new(username))
        } else {
            debug!(username, "credentials rejected");
            Err(AuthFailure)
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator").finish_non_exhaustive()
    }
}

fn secret_tag(secret: &str) -> Option<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(COMPARE_KEY).ok()?;
    mac.update(secret.as_bytes());
    Some(mac.finalize().into_bytes().to_vec())
}

fn secrets_match(expected: &str, supplied: &str) -> bool {
    let Some(expected_tag) = secret_tag(expected) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(COMPARE_KEY) else {
        return false;
    };
    mac.update(supplied.as_bytes());
    mac.verify_slice(&expected_tag).is_ok()
}
