//! Stateless, signed session tokens.
//!
//! Token layout: `v1.<payload>.<signature>` where `payload` is the
//! base64url (unpadded) JSON claims and `signature` is the base64url
//! HMAC-SHA256 over `v1.<payload>` as transmitted.
//!
//! Nothing is stored server side. A token is valid for as long as it verifies
//! against the signing key (and, when configured, is younger than the TTL).
//! Revocation therefore only asks the client to forget the token; a copy
//! replayed before that still verifies.

use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

use super::{
    error::{IssueError, KeyError, SessionInvalid, TokenError},
    identity::Identity,
};

type HmacSha256 = Hmac<Sha256>;

const TOKEN_PREFIX: &str = "v1.";
pub const MIN_KEY_LEN: usize = 16;
const GENERATED_KEY_LEN: usize = 32;
// Tolerated clock drift for `iat` when a TTL is enforced.
const MAX_CLOCK_SKEW_SECONDS: u64 = 60;

/// Process-wide key used to sign and verify every session token.
#[derive(Clone)]
pub struct SigningKey {
    mac: HmacSha256,
}

impl SigningKey {
    /// Build a key from configured secret material.
    ///
    /// # Errors
    /// Returns an error when the secret is shorter than [`MIN_KEY_LEN`] bytes.
    pub fn new(secret: &SecretString) -> Result<Self, KeyError> {
        let bytes = secret.expose_secret().as_bytes();
        if bytes.len() < MIN_KEY_LEN {
            return Err(KeyError::TooShort {
                min: MIN_KEY_LEN,
                len: bytes.len(),
            });
        }
        let mac = HmacSha256::new_from_slice(bytes).map_err(|_| KeyError::InvalidLength)?;
        Ok(Self { mac })
    }

    /// Random key for deployments without a configured one. Tokens signed
    /// with it do not survive a restart.
    ///
    /// # Errors
    /// Returns an error if the OS random source fails.
    pub fn generate() -> Result<Self, KeyError> {
        let mut bytes = [0u8; GENERATED_KEY_LEN];
        OsRng.try_fill_bytes(&mut bytes)?;
        Self::new(&SecretString::from(Base64UrlUnpadded::encode_string(&bytes)))
    }

    fn mac(&self) -> HmacSha256 {
        self.mac.clone()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(***)")
    }
}

/// Opaque token handed to the client.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Instruction for the client-facing layer to drop the session carrier.
#[must_use = "the session carrier is only discarded if the client is told to drop it"]
#[derive(Debug, PartialEq, Eq)]
pub struct Discard {
    _private: (),
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    iat: u64,
}

/// Issues and verifies session tokens. Holds no per-session state.
#[derive(Debug)]
pub struct SessionManager {
    key: SigningKey,
    ttl: Option<Duration>,
}

impl SessionManager {
    #[must_use]
    pub fn new(key: SigningKey) -> Self {
        Self { key, ttl: None }
    }

    /// Reject tokens older than `ttl`. `None` keeps sessions valid until the
    /// client discards them.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Sign a token binding `identity`.
    ///
    /// # Errors
    /// Returns an error if the claims cannot be encoded.
    pub fn issue(&self, identity: &Identity) -> Result<SessionToken, IssueError> {
        self.issue_at(identity, now_unix_seconds())
    }

    pub(crate) fn issue_at(
        &self,
        identity: &Identity,
        issued_at: u64,
    ) -> Result<SessionToken, IssueError> {
        let claims = SessionClaims {
            sub: identity.id().to_string(),
            iat: issued_at,
        };
        let payload = serde_json::to_vec(&claims)?;
        Ok(SessionToken(self.sign(&payload)))
    }

    /// Turn a presented token back into the identity it was issued for.
    ///
    /// Every failure, including an absent token, is the same
    /// [`SessionInvalid`]; the reason is only logged.
    ///
    /// # Errors
    /// Returns [`SessionInvalid`] when the token is missing or does not verify.
    pub fn resolve(&self, token: Option<&str>) -> Result<Identity, SessionInvalid> {
        self.resolve_at(token, now_unix_seconds())
    }

    pub(crate) fn resolve_at(
        &self,
        token: Option<&str>,
        now: u64,
    ) -> Result<Identity, SessionInvalid> {
        let Some(token) = token else {
            debug!("no session token presented");
            return Err(SessionInvalid);
        };
        self.verify(token, now).map_err(|err| {
            debug!(error = %err, "session token rejected");
            SessionInvalid
        })
    }

    /// Logically end a session. The token itself stays verifiable; the
    /// returned [`Discard`] must be relayed so the client drops it.
    pub fn revoke(&self, _token: &str) -> Discard {
        debug!("session revoked, instructing client to discard token");
        Discard { _private: () }
    }

    fn sign(&self, payload: &[u8]) -> String {
        let payload_b64 = Base64UrlUnpadded::encode_string(payload);
        let mut mac = self.key.mac();
        mac.update(TOKEN_PREFIX.as_bytes());
        mac.update(payload_b64.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_b64 = Base64UrlUnpadded::encode_string(&signature);
        format!("{TOKEN_PREFIX}{payload_b64}.{signature_b64}")
    }

    fn verify(&self, token: &str, now: u64) -> Result<Identity, TokenError> {
        let body = token.strip_prefix(TOKEN_PREFIX).ok_or(TokenError::Version)?;
        let (payload_b64, signature_b64) = body.split_once('.').ok_or(TokenError::Format)?;

        let signature = decode_canonical(signature_b64)?;
        let mut mac = self.key.mac();
        mac.update(TOKEN_PREFIX.as_bytes());
        mac.update(payload_b64.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::Signature)?;

        let payload = decode_canonical(payload_b64)?;
        let claims: SessionClaims = serde_json::from_slice(&payload)?;
        if claims.sub.is_empty() {
            return Err(TokenError::EmptySubject);
        }

        if let Some(ttl) = self.ttl {
            if claims.iat > now.saturating_add(MAX_CLOCK_SKEW_SECONDS) {
                return Err(TokenError::InvalidIat);
            }
            if claims.iat.saturating_add(ttl.as_secs()) <= now {
                return Err(TokenError::Expired);
            }
        }

        Ok(Identity::new(claims.sub))
    }
}

/// Decode base64url and insist the input was the canonical encoding, so two
/// different strings never verify as the same token.
fn decode_canonical(segment: &str) -> Result<Vec<u8>, TokenError> {
    let bytes = Base64UrlUnpadded::decode_vec(segment).map_err(|_| TokenError::Base64)?;
    if Base64UrlUnpadded::encode_string(&bytes) != segment {
        return Err(TokenError::Base64);
    }
    Ok(bytes)
}

fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
