//! Read-only username to secret lookup.

use secrecy::SecretString;
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path};

use super::error::CredentialsError;

/// Source of stored secrets. Implementations must not mutate on lookup.
pub trait CredentialStore: Send + Sync {
    /// Returns `None` for unknown usernames.
    fn lookup(&self, username: &str) -> Option<SecretString>;
}

#[derive(Deserialize)]
struct CredentialEntry {
    password: String,
}

/// Credential store held entirely in memory, fixed after construction.
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    records: HashMap<String, SecretString>,
}

impl InMemoryCredentialStore {
    /// Build a store from `(username, secret)` pairs.
    ///
    /// # Errors
    /// Returns an error if any username is empty.
    pub fn from_pairs<I, U, S>(pairs: I) -> Result<Self, CredentialsError>
    where
        I: IntoIterator<Item = (U, S)>,
        U: Into<String>,
        S: Into<String>,
    {
        let mut records = HashMap::new();
        for (username, secret) in pairs {
            let username = username.into();
            if username.is_empty() {
                return Err(CredentialsError::EmptyUsername);
            }
            records.insert(username, SecretString::from(secret.into()));
        }
        Ok(Self { records })
    }

    /// Parse `{"user": {"password": "secret"}, ...}`.
    ///
    /// # Errors
    /// Returns an error on invalid JSON or an empty username.
    pub fn from_json(json: &str) -> Result<Self, CredentialsError> {
        let entries: HashMap<String, CredentialEntry> = serde_json::from_str(json)?;
        Self::from_pairs(
            entries
                .into_iter()
                .map(|(username, entry)| (username, entry.password)),
        )
    }

    /// Load the JSON layout accepted by [`Self::from_json`] from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CredentialsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The two sample accounts used when no credentials file is configured.
    #[must_use]
    pub fn demo() -> Self {
        let records = [("user1", "password1"), ("user2", "password2")]
            .into_iter()
            .map(|(username, secret)| {
                (
                    username.to_string(),
                    SecretString::from(secret.to_string()),
                )
            })
            .collect();
        Self { records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn lookup(&self, username: &str) -> Option<SecretString> {
        self.records.get(username).cloned()
    }
}

impl std::fmt::Debug for InMemoryCredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut usernames: Vec<&str> = self.records.keys().map(String::as_str).collect();
        usernames.sort_unstable();
        f.debug_struct("InMemoryCredentialStore")
            .field("usernames", &usernames)
            .field("secrets", &"***")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn lookup_returns_secret_for_known_user() {
        let store = InMemoryCredentialStore::demo();
        let secret = store.lookup("user1").unwrap();
        assert_eq!(secret.expose_secret(), "password1");
    }

    #[test]
    fn lookup_returns_none_for_unknown_user() {
        let store = InMemoryCredentialStore::demo();
        assert!(store.lookup("mallory").is_none());
        assert!(store.lookup("").is_none());
    }

    #[test]
    fn from_json_reads_nested_password() {
        let store = InMemoryCredentialStore::from_json(
            r#"{"alice": {"password": "wonderland"}, "bob": {"password": "builder"}}"#,
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.lookup("bob").unwrap().expose_secret(), "builder");
    }

    #[test]
    fn from_json_rejects_empty_username() {
        let result = InMemoryCredentialStore::from_json(r#"{"": {"password": "x"}}"#);
        assert!(matches!(result, Err(CredentialsError::EmptyUsername)));
    }

    #[test]
    fn from_json_rejects_missing_password() {
        let result = InMemoryCredentialStore::from_json(r#"{"alice": {}}"#);
        assert!(matches!(result, Err(CredentialsError::Json(_))));
    }

    #[test]
    fn from_file_reports_missing_file() {
        let result = InMemoryCredentialStore::from_file("/nonexistent/tessera/credentials.json");
        assert!(matches!(result, Err(CredentialsError::Io(_))));
    }

    #[test]
    fn debug_never_prints_secrets() {
        let store = InMemoryCredentialStore::demo();
        let printed = format!("{store:?}");
        assert!(printed.contains("user1"));
        assert!(!printed.contains("password1"));
    }
}
