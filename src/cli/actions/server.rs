use crate::{
    api::{self, AuthConfig, AuthState},
    auth::{CredentialStore, InMemoryCredentialStore, SigningKey},
    cli::telemetry,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{fmt, path::PathBuf, sync::Arc};
use tracing::{info, warn};

pub struct Args {
    pub port: u16,
    pub signing_key: Option<SecretString>,
    pub credentials_file: Option<PathBuf>,
    pub session_ttl_seconds: Option<u64>,
    pub cookie_secure: bool,
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("port", &self.port)
            .field(
                "signing_key",
                &self.signing_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("credentials_file", &self.credentials_file)
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

/// Execute the server action.
/// # Errors
/// Returns an error if the signing key or credentials are unusable, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let port = args.port;
    let auth_state = Arc::new(build_auth_state(args)?);

    let result = api::new(port, auth_state).await;

    telemetry::shutdown_tracer();

    result
}

/// Assemble the shared auth state from CLI arguments.
///
/// # Errors
/// Returns an error if the signing key is too short, the key cannot be
/// generated, or the credentials file cannot be loaded.
pub fn build_auth_state(args: Args) -> Result<AuthState> {
    let key = match &args.signing_key {
        Some(secret) => SigningKey::new(secret).context("Invalid signing key")?,
        None => {
            warn!("No signing key configured, generated a random one; sessions will not survive a restart");
            SigningKey::generate().context("Failed to generate signing key")?
        }
    };

    let store = match &args.credentials_file {
        Some(path) => {
            let store = InMemoryCredentialStore::from_file(path).with_context(|| {
                format!("Failed to load credentials file: {}", path.display())
            })?;
            info!(users = store.len(), "Loaded credentials");
            store
        }
        None => {
            warn!("No credentials file configured, using built-in demo users");
            InMemoryCredentialStore::demo()
        }
    };
    let store: Arc<dyn CredentialStore> = Arc::new(store);

    let config = AuthConfig::new()
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_cookie_secure(args.cookie_secure);

    Ok(AuthState::new(config, store, key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{CredentialSubmission, UserIdentity};
    use std::io::Write;

    fn args() -> Args {
        Args {
            port: 8080,
            signing_key: None,
            credentials_file: None,
            session_ttl_seconds: None,
            cookie_secure: false,
        }
    }

    fn submission(username: &str, password: &str) -> CredentialSubmission {
        CredentialSubmission {
            username: Some(username.to_string()),
            password: Some(SecretString::from(password.to_string())),
        }
    }

    #[test]
    fn defaults_use_demo_users() {
        let state = build_auth_state(args()).expect("state");
        let outcome = state
            .flow()
            .login(submission("user1", "password1"))
            .expect("demo login");
        assert_eq!(outcome.identity.id(), "user1");
        assert!(outcome.identity.is_authenticated());
    }

    #[test]
    fn short_signing_key_is_rejected() {
        let result = build_auth_state(Args {
            signing_key: Some(SecretString::from("short".to_string())),
            ..args()
        });
        assert!(result.is_err());
    }

    #[test]
    fn missing_credentials_file_is_rejected() {
        let result = build_auth_state(Args {
            credentials_file: Some(PathBuf::from("/nonexistent/tessera/users.json")),
            ..args()
        });
        assert!(result.is_err());
    }

    #[test]
    fn credentials_file_replaces_demo_users() {
        let path = std::env::temp_dir().join(format!("tessera-users-{}.json", ulid::Ulid::new()));
        {
            let mut file = std::fs::File::create(&path).expect("create");
            file.write_all(br#"{"alice": {"password": "wonderland"}}"#)
                .expect("write");
        }

        let state = build_auth_state(Args {
            credentials_file: Some(path.clone()),
            session_ttl_seconds: Some(60),
            ..args()
        })
        .expect("state");
        let _ = std::fs::remove_file(&path);

        assert!(state.flow().login(submission("alice", "wonderland")).is_ok());
        assert!(state.flow().login(submission("user1", "password1")).is_err());
        assert_eq!(state.config().session_ttl_seconds(), Some(60));
    }

    #[test]
    fn configured_key_is_stable_across_states() {
        let key = "0123456789abcdef0123456789abcdef";
        let first = build_auth_state(Args {
            signing_key: Some(SecretString::from(key.to_string())),
            ..args()
        })
        .expect("first");
        let second = build_auth_state(Args {
            signing_key: Some(SecretString::from(key.to_string())),
            ..args()
        })
        .expect("second");

        let outcome = first
            .flow()
            .login(submission("user2", "password2"))
            .expect("login");
        let identity = second
            .sessions()
            .resolve(Some(outcome.token.as_str()))
            .expect("resolve with same key");
        assert_eq!(identity.id(), "user2");
    }

    #[test]
    fn debug_redacts_signing_key() {
        let rendered = format!(
            "{:?}",
            Args {
                signing_key: Some(SecretString::from("super-secret-key-material".to_string())),
                ..args()
            }
        );
        assert!(!rendered.contains("super-secret-key-material"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
