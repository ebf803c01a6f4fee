use clap::{Arg, ArgAction, ArgMatches, Command};
use secrecy::SecretString;
use std::path::PathBuf;

pub const ARG_SIGNING_KEY: &str = "signing-key";
pub const ARG_CREDENTIALS_FILE: &str = "credentials-file";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";

pub struct Options {
    pub signing_key: Option<SecretString>,
    pub credentials_file: Option<PathBuf>,
    pub session_ttl_seconds: Option<u64>,
    pub cookie_secure: bool,
}

impl Options {
    /// Parse session arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the signing key is present but blank.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let signing_key = match matches.get_one::<String>(ARG_SIGNING_KEY) {
            Some(key) if key.trim().is_empty() => {
                return Err(anyhow::anyhow!(
                    "invalid argument: --{ARG_SIGNING_KEY} must not be blank"
                ));
            }
            Some(key) => Some(SecretString::from(key.clone())),
            None => None,
        };

        Ok(Self {
            signing_key,
            credentials_file: matches.get_one::<PathBuf>(ARG_CREDENTIALS_FILE).cloned(),
            session_ttl_seconds: matches.get_one::<u64>(ARG_SESSION_TTL_SECONDS).copied(),
            cookie_secure: matches.get_flag(ARG_COOKIE_SECURE),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SIGNING_KEY)
                .long(ARG_SIGNING_KEY)
                .help("Secret used to sign session tokens (at least 16 bytes)")
                .long_help(
                    "Secret used to sign session tokens (at least 16 bytes). When omitted a random key is generated at startup and sessions do not survive a restart.",
                )
                .env("TESSERA_SIGNING_KEY")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_CREDENTIALS_FILE)
                .long(ARG_CREDENTIALS_FILE)
                .help("JSON file of users: {\"name\": {\"password\": \"...\"}}")
                .env("TESSERA_CREDENTIALS_FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Session lifetime in seconds (default: no expiry)")
                .env("TESSERA_SESSION_TTL_SECONDS")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long(ARG_COOKIE_SECURE)
                .help("Mark the session cookie Secure (serve over HTTPS)")
                .env("TESSERA_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
}
